use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Scratch directory the binary runs in, isolated from any local config.
pub struct Workspace {
    pub root: PathBuf,
    _dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp workspace");
        Self {
            root: dir.path().to_path_buf(),
            _dir: dir,
        }
    }

    pub fn data_file(&self) -> PathBuf {
        self.root.join("data").join("db.json")
    }
}

/// `issuetrack` command rooted in `workspace` with a clean environment.
pub fn issuetrack(workspace: &Workspace) -> Command {
    let mut cmd = Command::cargo_bin("issuetrack").expect("binary built");
    cmd.current_dir(&workspace.root)
        .env_remove("RUST_LOG")
        .env_remove("PORT")
        .env_remove("ISSUETRACK_CONFIG")
        .env_remove("ISSUETRACK_HOST")
        .env_remove("ISSUETRACK_PORT")
        .env_remove("ISSUETRACK_DATA")
        .env_remove("ISSUETRACK_LOG_JSON");
    cmd
}
