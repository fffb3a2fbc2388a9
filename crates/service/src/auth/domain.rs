use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registration input. Every field is optional on the wire so that missing
/// fields surface as validation errors instead of body rejections.
///
/// `name` is accepted as an alias source for the username.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
}

/// Login input. The identifier travels as `username` but may hold an email;
/// a bare `email` field is accepted too.
#[derive(Clone, Default, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl LoginInput {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: Some(identifier.into()), email: None, password: Some(password.into()) }
    }

    /// `username` wins over `email` when both are sent.
    pub fn identifier(&self) -> Option<&str> {
        self.username
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.email.as_deref().filter(|s| !s.trim().is_empty()))
    }
}

// Keeps the plaintext password out of logs and panics.
impl std::fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginInput")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Stored account (business view), including the password hash.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Column values for an account about to be inserted.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub password_algorithm: String,
    pub first_name: String,
    pub last_name: String,
}

/// Authenticated principal threaded through every protected operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub account_id: i64,
    pub username: String,
    pub email: String,
}

impl From<&Account> for Identity {
    fn from(a: &Account) -> Self {
        Self { account_id: a.id, username: a.username.clone(), email: a.email.clone() }
    }
}

/// Public account view returned by registration.
#[derive(Debug, Clone, Serialize)]
pub struct AccountSummary {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<Account> for AccountSummary {
    fn from(a: Account) -> Self {
        Self { id: a.id, username: a.username, email: a.email, first_name: a.first_name, last_name: a.last_name }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Login result (session)
#[derive(Debug, Clone)]
pub struct LoginSession {
    pub identity: Identity,
    pub tokens: TokenPair,
}
