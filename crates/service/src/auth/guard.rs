use std::sync::Arc;

use tracing::debug;

use super::domain::Identity;
use super::token::{TokenIssuer, TokenType};
use crate::errors::ServiceError;

/// Extract the token from an `Authorization: Bearer <token>` header value.
/// The scheme is matched case-insensitively.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    let (scheme, token) = header_value.trim().split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Turns a presented access token into an [`Identity`].
///
/// Every failure is reported as `Unauthenticated`; which check failed is only
/// visible in debug logs.
#[derive(Clone)]
pub struct AccessGuard {
    issuer: Arc<TokenIssuer>,
}

impl AccessGuard {
    pub fn new(issuer: Arc<TokenIssuer>) -> Self { Self { issuer } }

    pub fn authorize(&self, raw_token: &str) -> Result<Identity, ServiceError> {
        let claims = self.issuer.validate(raw_token, TokenType::Access).map_err(|e| {
            debug!(reason = %e, "access token rejected");
            ServiceError::Unauthenticated
        })?;
        let account_id = claims.account_id().map_err(|_| {
            debug!("access token subject is not an account id");
            ServiceError::Unauthenticated
        })?;
        Ok(Identity {
            account_id,
            username: claims.username.unwrap_or_default(),
            email: claims.email.unwrap_or_default(),
        })
    }

    /// Authorize from a raw `Authorization` header value, if any.
    pub fn authorize_header(&self, header_value: Option<&str>) -> Result<Identity, ServiceError> {
        let token = header_value.and_then(bearer_token).ok_or_else(|| {
            debug!("missing or non-bearer Authorization header");
            ServiceError::Unauthenticated
        })?;
        self.authorize(token)
    }
}
