//! Login identifier resolution.
//!
//! The identifier arrives in a field called `username` but may be an email.
//! Resolution order is fixed: exact username match first, then email match.
//! A username that happens to look like an email therefore shadows another
//! account whose email equals that string.

use super::domain::Account;
use super::repository::AccountRepository;
use crate::errors::ServiceError;

/// Which lookup produced the account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedBy {
    Username,
    Email,
}

impl ResolvedBy {
    pub fn as_str(self) -> &'static str {
        match self {
            ResolvedBy::Username => "username",
            ResolvedBy::Email => "email",
        }
    }
}

/// Resolve a login identifier to at most one account.
///
/// Store failures propagate unchanged so callers can tell an outage apart
/// from a failed login.
pub async fn resolve_account<R>(repo: &R, identifier: &str) -> Result<Option<(Account, ResolvedBy)>, ServiceError>
where
    R: AccountRepository + ?Sized,
{
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Ok(None);
    }
    if let Some(account) = repo.find_by_username(identifier).await? {
        return Ok(Some((account, ResolvedBy::Username)));
    }
    Ok(repo.find_by_email(identifier).await?.map(|a| (a, ResolvedBy::Email)))
}
