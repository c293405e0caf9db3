//! `issuetrack` - project-scoped issue tracker REST API.
//!
//! Issues are grouped by project name and persisted to a single JSON file.
//! The issue operations themselves live in `issuetrack-lib`; this crate
//! wires them to HTTP and the command line.
//!
//! # Architecture
//!
//! - [`cli`] - Command-line interface using clap (`serve`, `init`, `version`)
//! - [`config`] - Layered configuration (defaults, YAML, env, CLI)
//! - [`error`] - Error types for bootstrap and configuration
//! - [`http`] - axum router, handlers and error responses
//! - [`logging`] - tracing subscriber setup

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod config;
pub mod error;
pub mod http;
pub mod logging;

pub use error::{AppError, Result};
pub use http::{AppState, build_router};

/// Run the CLI application.
///
/// This is the main entry point called from `main()`.
///
/// # Errors
///
/// Returns an error if command execution fails.
pub fn run() -> anyhow::Result<()> {
    cli::run()
}
