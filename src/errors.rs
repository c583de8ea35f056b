use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde_json::json;
use thiserror::Error;

/// Request-level failures of the HTTP handlers.
///
/// Optimizer failures are not here: the dispatcher reports them in the
/// response body alongside the notifications.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
