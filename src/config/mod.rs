//! Configuration management for `issuetrack`.
//!
//! Configuration is layered, later layers winning:
//! - Built-in defaults
//! - YAML file (`--config <path>`, or `./issuetrack.yaml` when present)
//! - Environment variable overrides (`ISSUETRACK_*`, plus `PORT`)
//! - Command-line overrides

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, Result};

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "issuetrack.yaml";

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Path of the JSON datastore file.
    pub data_file: PathBuf,
    /// Write an empty datastore at startup if the file is missing.
    pub create_if_missing: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    /// Emit JSON log lines instead of human-readable ones.
    pub json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("data").join("db.json"),
            create_if_missing: true,
        }
    }
}

/// Values supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub config: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub data: Option<PathBuf>,
    pub log_json: Option<bool>,
}

impl Config {
    /// Resolve configuration from file, process environment and CLI.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit config file is missing, a file fails
    /// to parse, or an environment value is invalid.
    pub fn load(overrides: &CliOverrides) -> Result<Self> {
        Self::load_with_env(overrides, |key| std::env::var(key).ok())
    }

    /// Like [`Config::load`] with an injectable environment lookup.
    ///
    /// # Errors
    ///
    /// See [`Config::load`].
    pub fn load_with_env<F>(overrides: &CliOverrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match overrides.config.as_deref() {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env(env)?;
        config.apply_cli(overrides);
        Ok(config)
    }

    /// Parse a YAML config file. Missing sections keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `ConfigFile` if it is not
    /// valid configuration.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&raw).map_err(|e| AppError::ConfigFile {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = env("ISSUETRACK_HOST") {
            self.server.host = host;
        }
        if let Some((key, raw)) = env("ISSUETRACK_PORT")
            .map(|v| ("ISSUETRACK_PORT", v))
            .or_else(|| env("PORT").map(|v| ("PORT", v)))
        {
            self.server.port = raw
                .trim()
                .parse()
                .map_err(|_| AppError::config(format!("{key} must be a port number, got {raw:?}")))?;
        }
        if let Some(data) = env("ISSUETRACK_DATA") {
            self.storage.data_file = PathBuf::from(data);
        }
        if let Some(raw) = env("ISSUETRACK_LOG_JSON") {
            self.log.json = parse_bool(&raw).ok_or_else(|| {
                AppError::config(format!("ISSUETRACK_LOG_JSON must be a boolean, got {raw:?}"))
            })?;
        }
        Ok(())
    }

    fn apply_cli(&mut self, overrides: &CliOverrides) {
        if let Some(ref host) = overrides.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(ref data) = overrides.data {
            self.storage.data_file.clone_from(data);
        }
        if let Some(json) = overrides.log_json {
            self.log.json = json;
        }
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}
