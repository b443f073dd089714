use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Agent has not linked a calendar account")]
    NotAuthorized,

    #[error("Failed to refresh calendar credential")]
    CredentialRefresh(String),

    #[error("Remote calendar call failed")]
    RemoteCalendar(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Datastore error: {0}")]
    Datastore(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            AppError::NotAuthorized => {
                (StatusCode::UNAUTHORIZED, "not_authorized", self.to_string())
            }
            AppError::CredentialRefresh(e) => {
                tracing::error!("Credential refresh failed: {e}");
                (StatusCode::BAD_GATEWAY, "credential_refresh_failed", self.to_string())
            }
            AppError::RemoteCalendar(e) => {
                tracing::error!("Remote calendar error: {e}");
                (StatusCode::BAD_GATEWAY, "remote_calendar_error", self.to_string())
            }
            AppError::NotFound(_) => {
                (StatusCode::NOT_FOUND, "not_found", self.to_string())
            }
            AppError::Validation(msg) => {
                (StatusCode::BAD_REQUEST, "validation_error", msg.clone())
            }
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", msg.clone())
            }
            AppError::Datastore(e) => {
                tracing::error!("Datastore error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal server error".to_string())
            }
            AppError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", "Internal server error".to_string())
            }
            AppError::HttpClient(e) => {
                tracing::error!("HTTP client error: {e}");
                (StatusCode::BAD_GATEWAY, "upstream_error", "External provider error".to_string())
            }
        };

        let body = json!({
            "error": error_type,
            "message": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
