//! Datastore persistence.
//!
//! The whole dataset is read on every operation and rewritten on every
//! mutation. Handlers only see the [`DataStore`] trait, so the flat file can
//! be swapped for another backend without touching them.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::StoreError;
use crate::model::Datastore;

/// Load/save access to the full dataset.
pub trait DataStore: Send + Sync {
    /// Read and deserialize the whole dataset.
    ///
    /// # Errors
    ///
    /// Returns `FileNotFound`/`Io` if the backing data cannot be read and
    /// `Parse` if it is not a valid dataset.
    fn load(&self) -> Result<Datastore, StoreError>;

    /// Replace the persisted dataset with `data`.
    ///
    /// # Errors
    ///
    /// Returns `Io` or `Parse` if the dataset cannot be written.
    fn save(&self, data: &Datastore) -> Result<(), StoreError>;

    /// Human-readable location, for logs.
    fn describe(&self) -> String;
}

/// Dataset stored as one pretty-printed JSON object in a file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Create an empty dataset file, including missing parent directories.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyExists` if the file exists and `force` is false,
    /// or `Io` on write failure.
    pub fn init(&self, force: bool) -> Result<(), StoreError> {
        if self.exists() && !force {
            return Err(StoreError::AlreadyExists(self.path.clone()));
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        self.save(&Datastore::new())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl DataStore for JsonFileStore {
    fn load(&self) -> Result<Datastore, StoreError> {
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StoreError::FileNotFound(self.path.clone())
            } else {
                StoreError::Io(e)
            }
        })?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Writes to a sibling temp file and renames it over the target.
    fn save(&self, data: &Datastore) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(data)?;

        let tmp_path = self.tmp_path();
        let written = fs::File::create(&tmp_path).and_then(|mut file| {
            file.write_all(json.as_bytes())?;
            file.write_all(b"\n")?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|()| fs::rename(&tmp_path, &self.path)) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Dataset held in process memory. Nothing survives a restart.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Mutex<Datastore>,
}

impl InMemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_data(data: Datastore) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

impl DataStore for InMemoryStore {
    fn load(&self) -> Result<Datastore, StoreError> {
        self.data
            .lock()
            .map(|guard| guard.clone())
            .map_err(|e| StoreError::Task(e.to_string()))
    }

    fn save(&self, data: &Datastore) -> Result<(), StoreError> {
        let mut guard = self
            .data
            .lock()
            .map_err(|e| StoreError::Task(e.to_string()))?;
        guard.clone_from(data);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
