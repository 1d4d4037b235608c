use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use promptforge_core::{ErrorKind, PipelineError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Pipeline(err) => {
                let status = status_for(err.kind);
                if status.is_server_error() {
                    tracing::error!("pipeline error: {}", err);
                } else {
                    tracing::warn!("pipeline error: {}", err);
                }
                (status, err.message)
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

/// Map the internal failure kind onto the small external status set:
/// too-many-requests, service-unavailable, internal-error.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        ErrorKind::Connection => StatusCode::SERVICE_UNAVAILABLE,
        ErrorKind::UnknownStrategy
        | ErrorKind::TemplateError
        | ErrorKind::MalformedOutput
        | ErrorKind::Provider
        | ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
