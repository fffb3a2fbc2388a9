//! Signed token issuance and validation (JWT, HS256).
//!
//! Access and refresh tokens share one claim layout and differ in
//! `token_type`, lifetime and, optionally, signing secret. Validation pins the
//! algorithm to HS256, so `alg: none` or RS/ES headers are rejected outright.

use chrono::Utc;
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use super::domain::{Identity, TokenPair};
use super::errors::TokenError;
use crate::errors::ServiceError;

const ALGORITHM: Algorithm = Algorithm::HS256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    fn other(self) -> Self {
        match self {
            TokenType::Access => TokenType::Refresh,
            TokenType::Refresh => TokenType::Access,
        }
    }
}

/// Claims carried by every token. Timestamps are seconds since the epoch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Account id, as a decimal string.
    pub sub: String,
    pub token_type: TokenType,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Claims {
    pub fn account_id(&self) -> Result<i64, TokenError> {
        self.sub.parse::<i64>().map_err(|_| TokenError::Malformed)
    }
}

/// HMAC keys for both token types, loaded once at startup.
pub struct SigningKeys {
    access_enc: EncodingKey,
    access_dec: DecodingKey,
    refresh_enc: EncodingKey,
    refresh_dec: DecodingKey,
    distinct: bool,
}

impl SigningKeys {
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self {
            access_enc: EncodingKey::from_secret(access_secret),
            access_dec: DecodingKey::from_secret(access_secret),
            refresh_enc: EncodingKey::from_secret(refresh_secret),
            refresh_dec: DecodingKey::from_secret(refresh_secret),
            distinct: access_secret != refresh_secret,
        }
    }

    /// Same secret for both token types.
    pub fn shared(secret: &[u8]) -> Self {
        Self::new(secret, secret)
    }

    fn encoding(&self, t: TokenType) -> &EncodingKey {
        match t {
            TokenType::Access => &self.access_enc,
            TokenType::Refresh => &self.refresh_enc,
        }
    }

    fn decoding(&self, t: TokenType) -> &DecodingKey {
        match t {
            TokenType::Access => &self.access_dec,
            TokenType::Refresh => &self.refresh_dec,
        }
    }
}

/// Lifetimes in seconds.
#[derive(Debug, Clone, Copy)]
pub struct TokenSettings {
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
    pub leeway_secs: u64,
}

impl Default for TokenSettings {
    fn default() -> Self {
        Self { access_ttl_secs: 300, refresh_ttl_secs: 86_400, leeway_secs: 0 }
    }
}

impl From<&configs::AuthConfig> for TokenSettings {
    fn from(cfg: &configs::AuthConfig) -> Self {
        Self {
            access_ttl_secs: i64::try_from(cfg.access_ttl_secs).unwrap_or(i64::MAX),
            refresh_ttl_secs: i64::try_from(cfg.refresh_ttl_secs).unwrap_or(i64::MAX),
            leeway_secs: cfg.leeway_secs,
        }
    }
}

/// Mints and validates token pairs. Stateless: nothing is stored per token.
pub struct TokenIssuer {
    keys: SigningKeys,
    settings: TokenSettings,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(keys: SigningKeys, settings: TokenSettings) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = settings.leeway_secs;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self { keys, settings, validation }
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        let keys = SigningKeys::new(cfg.access_secret.as_bytes(), cfg.effective_refresh_secret().as_bytes());
        Self::new(keys, TokenSettings::from(cfg))
    }

    pub fn settings(&self) -> TokenSettings { self.settings }

    pub fn issue_access_token(&self, identity: &Identity) -> Result<String, ServiceError> {
        self.issue_access_token_at(identity, Utc::now().timestamp())
    }

    pub fn issue_refresh_token(&self, identity: &Identity) -> Result<String, ServiceError> {
        self.issue_refresh_token_at(identity, Utc::now().timestamp())
    }

    pub fn issue_pair(&self, identity: &Identity) -> Result<TokenPair, ServiceError> {
        self.issue_pair_at(identity, Utc::now().timestamp())
    }

    /// Access token carrying username and email, issued at `issued_at`.
    pub fn issue_access_token_at(&self, identity: &Identity, issued_at: i64) -> Result<String, ServiceError> {
        let claims = Claims {
            sub: identity.account_id.to_string(),
            token_type: TokenType::Access,
            iat: issued_at,
            exp: issued_at.saturating_add(self.settings.access_ttl_secs),
            jti: Uuid::new_v4().to_string(),
            username: Some(identity.username.clone()),
            email: Some(identity.email.clone()),
        };
        self.sign(&claims)
    }

    /// Refresh token with subject only, issued at `issued_at`.
    pub fn issue_refresh_token_at(&self, identity: &Identity, issued_at: i64) -> Result<String, ServiceError> {
        let claims = Claims {
            sub: identity.account_id.to_string(),
            token_type: TokenType::Refresh,
            iat: issued_at,
            exp: issued_at.saturating_add(self.settings.refresh_ttl_secs),
            jti: Uuid::new_v4().to_string(),
            username: None,
            email: None,
        };
        self.sign(&claims)
    }

    pub fn issue_pair_at(&self, identity: &Identity, issued_at: i64) -> Result<TokenPair, ServiceError> {
        Ok(TokenPair {
            access: self.issue_access_token_at(identity, issued_at)?,
            refresh: self.issue_refresh_token_at(identity, issued_at)?,
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, ServiceError> {
        encode(&Header::new(ALGORITHM), claims, self.keys.encoding(claims.token_type))
            .map_err(|e| ServiceError::Internal(format!("token signing failed: {e}")))
    }

    /// Verify signature, expiry and type.
    ///
    /// When the two token types use different secrets, a token of the other
    /// type fails signature verification under the expected key; it is
    /// re-checked against the other key so the caller sees `WrongType`
    /// rather than `BadSignature`.
    pub fn validate(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        match self.decode_with(token, expected) {
            Ok(claims) if claims.token_type == expected => Ok(claims),
            Ok(_) => Err(TokenError::WrongType),
            Err(TokenError::BadSignature) if self.keys.distinct => {
                match self.decode_with(token, expected.other()) {
                    Ok(claims) if claims.token_type != expected => Err(TokenError::WrongType),
                    Err(TokenError::Expired) => Err(TokenError::WrongType),
                    _ => Err(TokenError::BadSignature),
                }
            }
            Err(e) => Err(e),
        }
    }

    fn decode_with(&self, token: &str, key_type: TokenType) -> Result<Claims, TokenError> {
        decode::<Claims>(token, self.keys.decoding(key_type), &self.validation)
            .map(|data| data.claims)
            .map_err(|e| {
                let mapped = match e.kind() {
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    ErrorKind::InvalidSignature
                    | ErrorKind::InvalidAlgorithm
                    | ErrorKind::InvalidAlgorithmName => TokenError::BadSignature,
                    _ => TokenError::Malformed,
                };
                debug!(error = %e, ?mapped, "token decode failed");
                mapped
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{alice, test_issuer};

    fn now() -> i64 { Utc::now().timestamp() }

    #[test]
    fn access_token_round_trips_claims() {
        let issuer = test_issuer();
        let token = issuer.issue_access_token(&alice()).unwrap();
        let claims = issuer.validate(&token, TokenType::Access).unwrap();
        assert_eq!(claims.account_id().unwrap(), 1);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.username.as_deref(), Some("alice"));
        assert_eq!(claims.email.as_deref(), Some("alice@x.com"));
        assert_eq!(claims.exp - claims.iat, 300);
    }

    #[test]
    fn refresh_token_has_longer_lifetime_and_no_profile_claims() {
        let issuer = test_issuer();
        let pair = issuer.issue_pair(&alice()).unwrap();
        let claims = issuer.validate(&pair.refresh, TokenType::Refresh).unwrap();
        assert_eq!(claims.exp - claims.iat, 86_400);
        assert!(claims.username.is_none());
        assert!(claims.email.is_none());
    }

    #[test]
    fn wrong_type_is_rejected_both_ways() {
        let issuer = test_issuer();
        let pair = issuer.issue_pair(&alice()).unwrap();
        assert_eq!(issuer.validate(&pair.access, TokenType::Refresh), Err(TokenError::WrongType));
        assert_eq!(issuer.validate(&pair.refresh, TokenType::Access), Err(TokenError::WrongType));
    }

    #[test]
    fn wrong_type_is_reported_with_a_shared_secret_too() {
        let issuer = TokenIssuer::new(SigningKeys::shared(b"one-secret"), TokenSettings::default());
        let pair = issuer.issue_pair(&alice()).unwrap();
        assert_eq!(issuer.validate(&pair.access, TokenType::Refresh), Err(TokenError::WrongType));
        assert_eq!(issuer.validate(&pair.refresh, TokenType::Access), Err(TokenError::WrongType));
    }

    #[test]
    fn expired_token_with_valid_signature_is_expired() {
        let issuer = test_issuer();
        let token = issuer.issue_access_token_at(&alice(), now() - 3_600).unwrap();
        assert_eq!(issuer.validate(&token, TokenType::Access), Err(TokenError::Expired));
    }

    #[test]
    fn leeway_tolerates_small_clock_skew() {
        let settings = TokenSettings { leeway_secs: 120, ..TokenSettings::default() };
        let issuer = TokenIssuer::new(SigningKeys::shared(b"s"), settings);
        // expired 60s ago
        let token = issuer.issue_access_token_at(&alice(), now() - 360).unwrap();
        assert!(issuer.validate(&token, TokenType::Access).is_ok());
    }

    #[test]
    fn foreign_secret_is_bad_signature() {
        let issuer = test_issuer();
        let other = TokenIssuer::new(SigningKeys::new(b"x", b"y"), TokenSettings::default());
        let token = other.issue_access_token(&alice()).unwrap();
        assert_eq!(issuer.validate(&token, TokenType::Access), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_is_malformed() {
        let issuer = test_issuer();
        assert_eq!(issuer.validate("not-a-token", TokenType::Access), Err(TokenError::Malformed));
        assert_eq!(issuer.validate("", TokenType::Access), Err(TokenError::Malformed));
    }

    #[test]
    fn other_algorithms_are_not_trusted() {
        let issuer = test_issuer();
        let claims = Claims {
            sub: "1".into(),
            token_type: TokenType::Access,
            iat: now(),
            exp: now() + 300,
            jti: "j".into(),
            username: None,
            email: None,
        };
        // Same secret, different HMAC algorithm in the header.
        let token = encode(&Header::new(Algorithm::HS512), &claims, &EncodingKey::from_secret(b"test-access-secret")).unwrap();
        assert_eq!(issuer.validate(&token, TokenType::Access), Err(TokenError::BadSignature));

        // Unsigned token: header `{"alg":"none"}`, empty signature.
        let header = "eyJhbGciOiJub25lIiwidHlwIjoiSldUIn0";
        let body = token.split('.').nth(1).unwrap();
        let unsigned = format!("{header}.{body}.");
        assert!(issuer.validate(&unsigned, TokenType::Access).is_err());
    }

    #[test]
    fn non_numeric_subject_is_malformed() {
        let claims = Claims {
            sub: "alice".into(),
            token_type: TokenType::Access,
            iat: 0,
            exp: 0,
            jti: String::new(),
            username: None,
            email: None,
        };
        assert_eq!(claims.account_id(), Err(TokenError::Malformed));
    }
}
