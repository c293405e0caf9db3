//! Response bodies, error mapping and the request body extractor.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Form, FromRequest, Request};
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use issuetrack_lib::IssueError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{error, warn};

/// Acknowledgement returned by successful update and delete.
#[derive(Debug, Clone, Serialize)]
pub struct Ack {
    pub result: &'static str,
    #[serde(rename = "_id")]
    pub id: String,
}

impl Ack {
    #[must_use]
    pub const fn updated(id: String) -> Self {
        Self {
            result: "successfully updated",
            id,
        }
    }

    #[must_use]
    pub const fn deleted(id: String) -> Self {
        Self {
            result: "successfully deleted",
            id,
        }
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<String>,
}

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    Issue(IssueError),
    /// Body could not be decoded as JSON or a form.
    InvalidBody(String),
    NotFound,
}

impl From<IssueError> for ApiError {
    fn from(err: IssueError) -> Self {
        Self::Issue(err)
    }
}

impl ApiError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Issue(err) if err.is_validation() => StatusCode::BAD_REQUEST,
            Self::Issue(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            Self::Issue(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InvalidBody(_) => StatusCode::BAD_REQUEST,
            Self::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Issue(IssueError::Store(err)) => {
                error!(error = %err, "datastore failure");
                ErrorBody {
                    error: "storage unavailable".to_string(),
                    id: None,
                }
            }
            Self::Issue(err) => ErrorBody {
                error: err.to_string(),
                id: err.issue_id().map(str::to_string),
            },
            Self::InvalidBody(reason) => {
                warn!(%reason, "rejected request body");
                ErrorBody {
                    error: "invalid request body".to_string(),
                    id: None,
                }
            }
            Self::NotFound => ErrorBody {
                error: "not found".to_string(),
                id: None,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Request body decoded from JSON or `application/x-www-form-urlencoded`.
///
/// An empty body decodes as an empty object, so a bare `DELETE` reaches the
/// handler and gets the contract's `missing _id` answer.
#[derive(Debug)]
pub struct Payload<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| ApiError::InvalidBody(e.body_text()))?;
            return Ok(Self(value));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::InvalidBody(e.body_text()))?;
        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };
        serde_json::from_slice(raw)
            .map(Self)
            .map_err(|e| ApiError::InvalidBody(e.to_string()))
    }
}
