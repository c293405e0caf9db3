//! HTTP surface: one resource route per project plus a health probe.

pub mod handlers;
pub mod response;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use issuetrack_lib::{DataStore, IssueService};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IssueService>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            service: Arc::new(IssueService::new(store)),
        }
    }
}

#[must_use]
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz_handler))
        .route(
            "/api/issues/:project",
            get(handlers::list_issues_handler)
                .post(handlers::create_issue_handler)
                .put(handlers::update_issue_handler)
                .delete(handlers::delete_issue_handler),
        )
        .fallback(handlers::not_found_handler)
        .with_state(state)
}
