//! `issuetrack` - project-scoped issue tracker REST API.
//!
//! Serves `/api/issues/:project` over a single JSON datastore file.

use issuetrack::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}
