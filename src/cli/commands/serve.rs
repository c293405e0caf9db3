//! Serve command: bootstrap the datastore and run the HTTP server.

use std::sync::Arc;

use issuetrack_lib::JsonFileStore;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::http::{AppState, build_router};

/// Prepare the datastore file according to `create_if_missing`.
///
/// A missing file is not fatal when creation is disabled: requests will
/// fail with a storage error until the file appears.
///
/// # Errors
///
/// Returns an error if the file is missing and cannot be created.
pub fn prepare_store(config: &Config) -> Result<JsonFileStore> {
    let store = JsonFileStore::new(&config.storage.data_file);
    if !store.exists() {
        if config.storage.create_if_missing {
            store.init(false)?;
            info!(path = %store.path().display(), "created empty datastore");
        } else {
            warn!(
                path = %store.path().display(),
                "datastore missing; requests will fail until it is created"
            );
        }
    }
    Ok(store)
}

/// Execute the serve command. Runs until SIGINT/SIGTERM.
///
/// # Errors
///
/// Returns an error if the datastore cannot be prepared, the address cannot
/// be bound, or the server fails.
pub async fn execute(config: &Config) -> Result<()> {
    let store = prepare_store(config)?;
    let shown = dunce::canonicalize(store.path()).unwrap_or_else(|_| store.path().to_path_buf());

    let app = build_router(AppState::new(Arc::new(store)));
    let listener = TcpListener::bind((config.server.host.as_str(), config.server.port)).await?;
    let addr = listener.local_addr()?;
    info!(%addr, datastore = %shown.display(), "issuetrack listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await?;
    info!("issuetrack stopped");
    Ok(())
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {}
                    _ = tokio::signal::ctrl_c() => {}
                }
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable; waiting for Ctrl-C only");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("shutdown signal received");
}
