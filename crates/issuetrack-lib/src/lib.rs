//! `issuetrack-lib` - project-scoped issue records over a flat JSON datastore.
//!
//! The dataset is a map from project name to an ordered list of issues. Every
//! operation reads the whole dataset and every mutation writes it back.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use issuetrack_lib::{IssueService, JsonFileStore, ListFilters, NewIssue};
//!
//! # async fn demo() -> issuetrack_lib::Result<()> {
//! let service = IssueService::new(Arc::new(JsonFileStore::new("data/db.json")));
//!
//! let issue = service
//!     .create(
//!         "apitest",
//!         NewIssue {
//!             issue_title: Some("Broken link".into()),
//!             issue_text: Some("The docs link 404s".into()),
//!             created_by: Some("alice".into()),
//!             ..Default::default()
//!         },
//!     )
//!     .await?;
//!
//! let open = service
//!     .list("apitest", &ListFilters::new().with("open", "true"))
//!     .await?;
//! assert!(open.iter().any(|i| i.id == issue.id));
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod model;
pub mod query;
pub mod service;
pub mod store;
pub mod util;

pub use error::{IssueError, Result, StoreError};
pub use model::{Datastore, Issue};
pub use query::{IssueRef, IssueUpdate, ListFilters, NewIssue};
pub use service::IssueService;
pub use store::{DataStore, InMemoryStore, JsonFileStore};
