use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use issuetrack::{AppState, build_router};
use issuetrack_lib::JsonFileStore;
use serde_json::Value;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

pub const PROJECT_PATH: &str = "/api/issues/apitest";

/// A server bound to an ephemeral port over a datastore in a temp dir.
pub struct TestServer {
    pub addr: SocketAddr,
    pub data_file: PathBuf,
    _dir: TempDir,
}

#[derive(Debug)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("response is not JSON ({e}): {}", self.body))
    }
}

impl TestServer {
    /// Start with an empty datastore.
    pub async fn start() -> Self {
        Self::start_with(Some("{}")).await
    }

    /// Start with the given datastore contents, or no file at all.
    pub async fn start_with(initial: Option<&str>) -> Self {
        issuetrack::logging::init_test_logging();
        let dir = tempfile::tempdir().expect("tempdir");
        let data_file = dir.path().join("db.json");
        if let Some(contents) = initial {
            std::fs::write(&data_file, contents).expect("seed datastore");
        }

        let state = AppState::new(Arc::new(JsonFileStore::new(&data_file)));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind listener");
        let addr = listener.local_addr().expect("listener addr");
        tokio::spawn(async move {
            axum::serve(listener, build_router(state))
                .await
                .expect("serve router");
        });

        Self {
            addr,
            data_file,
            _dir: dir,
        }
    }

    pub async fn send_raw(
        &self,
        method: &str,
        path: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> Reply {
        let mut stream = tokio::net::TcpStream::connect(self.addr)
            .await
            .expect("connect server");
        let content_type = content_type
            .map(|ct| format!("Content-Type: {ct}\r\n"))
            .unwrap_or_default();
        let req = format!(
            "{method} {path} HTTP/1.1\r\nHost: {}\r\nConnection: close\r\n{content_type}Content-Length: {}\r\n\r\n{body}",
            self.addr,
            body.len()
        );
        stream
            .write_all(req.as_bytes())
            .await
            .expect("write request");
        let mut response = String::new();
        stream
            .read_to_string(&mut response)
            .await
            .expect("read response");
        let (head, body) = response
            .split_once("\r\n\r\n")
            .expect("http response must have separator");
        let status = head
            .lines()
            .next()
            .and_then(|line| line.split_whitespace().nth(1))
            .and_then(|code| code.parse().ok())
            .expect("status line");
        Reply {
            status,
            body: body.to_string(),
        }
    }

    pub async fn get(&self, path: &str) -> Reply {
        self.send_raw("GET", path, None, "").await
    }

    pub async fn send_json(&self, method: &str, path: &str, body: &Value) -> Reply {
        self.send_raw(method, path, Some("application/json"), &body.to_string())
            .await
    }

    pub async fn send_form(&self, method: &str, path: &str, body: &str) -> Reply {
        self.send_raw(
            method,
            path,
            Some("application/x-www-form-urlencoded"),
            body,
        )
        .await
    }

    /// Current datastore file contents as JSON.
    pub fn stored(&self) -> Value {
        let raw = std::fs::read_to_string(&self.data_file).expect("read datastore");
        serde_json::from_str(&raw).expect("datastore is JSON")
    }
}
