use thiserror::Error;

/// Why a token failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("token malformed")]
    Malformed,
    #[error("token has the wrong type")]
    WrongType,
    #[error("token signature invalid")]
    BadSignature,
}
