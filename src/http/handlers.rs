//! Handlers for `/api/issues/:project` and the health probe.

use axum::Json;
use axum::extract::{Path, Query, State};
use issuetrack_lib::{Issue, IssueRef, IssueUpdate, ListFilters, NewIssue};
use serde_json::{Value, json};

use super::AppState;
use super::response::{Ack, ApiError, Payload};

pub async fn healthz_handler() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

/// `GET`: issues of the project, narrowed by exact-match query filters.
pub async fn list_issues_handler(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Query(filters): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<Issue>>, ApiError> {
    let filters = ListFilters::from(filters);
    let issues = state.service.list(&project, &filters).await?;
    Ok(Json(issues))
}

/// `POST`: create an issue and echo the stored record.
pub async fn create_issue_handler(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Payload(input): Payload<NewIssue>,
) -> Result<Json<Issue>, ApiError> {
    let issue = state.service.create(&project, input).await?;
    Ok(Json(issue))
}

/// `PUT`: merge the sent fields into the issue named by `_id`.
pub async fn update_issue_handler(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Payload(update): Payload<IssueUpdate>,
) -> Result<Json<Ack>, ApiError> {
    let id = state.service.update(&project, update).await?;
    Ok(Json(Ack::updated(id)))
}

/// `DELETE`: remove the issue named by `_id`.
pub async fn delete_issue_handler(
    State(state): State<AppState>,
    Path(project): Path<String>,
    Payload(target): Payload<IssueRef>,
) -> Result<Json<Ack>, ApiError> {
    let id = state.service.delete(&project, target).await?;
    Ok(Json(Ack::deleted(id)))
}

pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound
}
