use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

/// Application-specific error types.
///
/// Only `AuthUnavailable`, `NotFound`, `ServiceUnavailable` and `BadRequest`
/// are user-visible outcomes of a query. Enrichment and persistence failures
/// are degraded silently by their callers and never become blocking errors;
/// `ExternalApiError` exists for those internal paths and for collaborator
/// plumbing.
#[derive(Debug, Clone)]
pub enum AppError {
    /// The sign-in collaborator refused or failed to issue a token.
    /// The lookup is never attempted without one.
    AuthUnavailable(String),
    /// The lookup service answered but the record does not exist.
    /// User-correctable; the displayed record is cleared, no retry.
    NotFound(String),
    /// The lookup service is down, timed out or answered 5xx. Transient;
    /// the user may retry manually, no automatic retry is performed.
    ServiceUnavailable(String),
    /// Invalid input (missing identity or benefit number).
    BadRequest(String),
    /// Error interacting with a non-critical external collaborator.
    ExternalApiError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::AuthUnavailable(msg) => write!(f, "Auth unavailable: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::ExternalApiError(msg) => write!(f, "External API error: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    /// Converts the error into an HTTP response.
    ///
    /// Maps each error variant to an appropriate HTTP status code and JSON
    /// body, logging by severity.
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::AuthUnavailable(msg) => {
                tracing::error!("Auth unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Authentication service unavailable".to_string(),
                )
            }
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::ServiceUnavailable(msg) => {
                tracing::error!("Lookup service unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Lookup service unavailable".to_string(),
                )
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::ExternalApiError(msg) => {
                tracing::error!("External API error: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    "External service error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<reqwest::Error> for AppError {
    /// Network-level failures from collaborators default to the transient
    /// bucket; a collaborator timeout is treated identically to a network
    /// failure.
    fn from(err: reqwest::Error) -> Self {
        AppError::ServiceUnavailable(err.to_string())
    }
}
