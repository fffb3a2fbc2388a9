use thiserror::Error;

use models::errors::ModelError;

use crate::auth::errors::TokenError;

/// Engine-wide failure taxonomy. Store and hashing internals are folded into
/// `StoreUnavailable` / `Internal` before they reach a caller.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("username already exists")]
    DuplicateUsername,
    #[error("email already in use")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("token rejected: {0}")]
    Token(#[from] TokenError),
    #[error("not authenticated")]
    Unauthenticated,
    #[error("not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self { Self::Validation(msg.into()) }

    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            ServiceError::Validation(_) => 1001,
            ServiceError::DuplicateUsername => 1002,
            ServiceError::DuplicateEmail => 1003,
            ServiceError::InvalidCredentials => 1004,
            ServiceError::Token(_) => 1005,
            ServiceError::Unauthenticated => 1006,
            ServiceError::NotFound => 1007,
            ServiceError::StoreUnavailable(_) => 1200,
            ServiceError::Internal(_) => 1300,
        }
    }

    /// Stable machine-readable kind, safe to expose to clients.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "validation_error",
            ServiceError::DuplicateUsername => "duplicate_username",
            ServiceError::DuplicateEmail => "duplicate_email",
            ServiceError::InvalidCredentials => "invalid_credentials",
            ServiceError::Token(TokenError::Expired) => "token_expired",
            ServiceError::Token(_) => "token_invalid",
            ServiceError::Unauthenticated => "not_authenticated",
            ServiceError::NotFound => "not_found",
            ServiceError::StoreUnavailable(_) => "store_unavailable",
            ServiceError::Internal(_) => "internal_error",
        }
    }
}

impl From<ModelError> for ServiceError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::Validation(msg) => ServiceError::Validation(msg),
            ModelError::UniqueViolation(msg) if msg.contains("uniq_account_email") => ServiceError::DuplicateEmail,
            ModelError::UniqueViolation(msg) if msg.contains("uniq_account_username") => ServiceError::DuplicateUsername,
            ModelError::UniqueViolation(msg) => ServiceError::Internal(format!("unexpected unique violation: {msg}")),
            ModelError::Db(msg) => ServiceError::StoreUnavailable(msg),
        }
    }
}
