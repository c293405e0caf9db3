use issuetrack_lib::JsonFileStore;
use tracing::info;

use crate::config::Config;
use crate::error::Result;

/// Execute the init command.
///
/// # Errors
///
/// Returns an error if the datastore already exists (without `force`) or
/// cannot be written.
pub fn execute(config: &Config, force: bool) -> Result<()> {
    let store = JsonFileStore::new(&config.storage.data_file);
    let existed = store.exists();
    store.init(force)?;

    let shown = dunce::canonicalize(store.path()).unwrap_or_else(|_| store.path().to_path_buf());
    if existed {
        info!(path = %shown.display(), "datastore reset to empty");
    } else {
        info!(path = %shown.display(), "datastore created");
    }
    println!("Initialized empty datastore at {}", shown.display());
    Ok(())
}
