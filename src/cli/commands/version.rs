//! Version command implementation.

use crate::cli::VersionArgs;
use crate::error::Result;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
}

fn build_kind() -> &'static str {
    if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    }
}

/// Render version information without printing it.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(args: &VersionArgs) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");

    if args.short {
        return Ok(version.to_string());
    }

    let build = build_kind();
    if args.json {
        let output = VersionOutput { version, build };
        return Ok(serde_json::to_string_pretty(&output)?);
    }

    Ok(format!("issuetrack version {version} ({build})"))
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(args: &VersionArgs) -> Result<()> {
    println!("{}", render(args)?);
    Ok(())
}
