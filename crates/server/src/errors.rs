use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use service::auth::errors::TokenError;
use service::errors::ServiceError;

/// JSON error body: `{"error": <title>, "code": <kind>, "detail"?: <message>}`.
#[derive(Debug, Serialize)]
pub struct JsonApiError {
    #[serde(skip)]
    pub status: StatusCode,
    #[serde(rename = "error")]
    pub title: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl JsonApiError {
    pub fn new(status: StatusCode, code: &'static str, title: impl Into<String>) -> Self {
        Self { status, title: title.into(), code, detail: None }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl IntoResponse for JsonApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<ServiceError> for JsonApiError {
    fn from(e: ServiceError) -> Self {
        let code = e.kind();
        match e {
            ServiceError::Validation(msg) => {
                JsonApiError::new(StatusCode::BAD_REQUEST, code, "validation failed").with_detail(msg)
            }
            ServiceError::DuplicateUsername | ServiceError::DuplicateEmail => {
                JsonApiError::new(StatusCode::BAD_REQUEST, code, e.to_string())
            }
            ServiceError::InvalidCredentials => JsonApiError::new(StatusCode::UNAUTHORIZED, code, "invalid credentials"),
            // Only expiry is distinguishable; every other token failure reads the same.
            ServiceError::Token(TokenError::Expired) => JsonApiError::new(StatusCode::UNAUTHORIZED, code, "token expired"),
            ServiceError::Token(_) => JsonApiError::new(StatusCode::UNAUTHORIZED, code, "token invalid"),
            ServiceError::Unauthenticated => {
                JsonApiError::new(StatusCode::UNAUTHORIZED, code, "authentication credentials were not provided or are invalid")
            }
            ServiceError::NotFound => JsonApiError::new(StatusCode::NOT_FOUND, code, "not found"),
            ServiceError::StoreUnavailable(msg) => {
                error!(error = %msg, "store unavailable");
                JsonApiError::new(StatusCode::SERVICE_UNAVAILABLE, code, "service temporarily unavailable")
            }
            ServiceError::Internal(msg) => {
                error!(error = %msg, "internal error");
                JsonApiError::new(StatusCode::INTERNAL_SERVER_ERROR, code, "internal server error")
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("database unavailable: {0}")]
    Database(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}
