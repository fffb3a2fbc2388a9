use async_trait::async_trait;

use super::domain::{Account, NewAccount};
use crate::errors::ServiceError;

/// Credential store contract.
///
/// `create_account` must enforce username and email uniqueness atomically
/// (a store-level constraint, never a lookup followed by an insert) and report
/// collisions as `DuplicateUsername` / `DuplicateEmail`. Any other storage
/// fault is `StoreUnavailable`.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create_account(&self, new: NewAccount) -> Result<Account, ServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, ServiceError>;
    /// Case-insensitive.
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, ServiceError>;
}

/// In-memory repository for tests and doc examples
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    #[derive(Default)]
    struct Tables {
        next_id: i64,
        accounts: HashMap<i64, Account>,
        by_username: HashMap<String, i64>,
        by_email: HashMap<String, i64>, // key: lower-cased email
    }

    #[derive(Default)]
    pub struct InMemoryAccountRepository {
        tables: Mutex<Tables>,
        unavailable: AtomicBool,
    }

    impl InMemoryAccountRepository {
        pub fn new() -> Self { Self::default() }

        /// Simulate a store outage: every call fails with `StoreUnavailable` while set.
        pub fn set_unavailable(&self, down: bool) {
            self.unavailable.store(down, Ordering::SeqCst);
        }

        /// Flip an account's active flag (accounts are never deleted).
        pub fn set_active(&self, id: i64, active: bool) -> Result<(), ServiceError> {
            let mut t = self.lock()?;
            let acc = t.accounts.get_mut(&id).ok_or(ServiceError::NotFound)?;
            acc.is_active = active;
            Ok(())
        }

        fn lock(&self) -> Result<MutexGuard<'_, Tables>, ServiceError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(ServiceError::StoreUnavailable("in-memory store marked unavailable".into()));
            }
            self.tables
                .lock()
                .map_err(|_| ServiceError::StoreUnavailable("in-memory store lock poisoned".into()))
        }
    }

    #[async_trait]
    impl AccountRepository for InMemoryAccountRepository {
        async fn create_account(&self, new: NewAccount) -> Result<Account, ServiceError> {
            models::account::validate_username(&new.username)?;
            models::account::validate_email(&new.email)?;
            let username = new.username.trim().to_string();
            let email = models::account::normalize_email(&new.email);

            // Check and insert under one lock, like a unique index would.
            let mut t = self.lock()?;
            if t.by_username.contains_key(&username) {
                return Err(ServiceError::DuplicateUsername);
            }
            if t.by_email.contains_key(&email) {
                return Err(ServiceError::DuplicateEmail);
            }
            t.next_id += 1;
            let account = Account {
                id: t.next_id,
                username: username.clone(),
                email: email.clone(),
                password_hash: new.password_hash,
                first_name: new.first_name,
                last_name: new.last_name,
                is_active: true,
                created_at: Utc::now(),
            };
            t.by_username.insert(username, account.id);
            t.by_email.insert(email, account.id);
            t.accounts.insert(account.id, account.clone());
            Ok(account)
        }

        async fn find_by_username(&self, username: &str) -> Result<Option<Account>, ServiceError> {
            let t = self.lock()?;
            Ok(t.by_username.get(username.trim()).and_then(|id| t.accounts.get(id)).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError> {
            let t = self.lock()?;
            let key = models::account::normalize_email(email);
            Ok(t.by_email.get(&key).and_then(|id| t.accounts.get(id)).cloned())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Account>, ServiceError> {
            let t = self.lock()?;
            Ok(t.accounts.get(&id).cloned())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn new_account(username: &str, email: &str) -> NewAccount {
            NewAccount {
                username: username.into(),
                email: email.into(),
                password_hash: "hash".into(),
                password_algorithm: "argon2id".into(),
                first_name: String::new(),
                last_name: String::new(),
            }
        }

        #[tokio::test]
        async fn duplicate_username_and_email_are_rejected() {
            let repo = InMemoryAccountRepository::new();
            repo.create_account(new_account("alice", "alice@x.com")).await.unwrap();

            let err = repo.create_account(new_account("alice", "other@x.com")).await.unwrap_err();
            assert!(matches!(err, ServiceError::DuplicateUsername));

            let err = repo.create_account(new_account("bob", "ALICE@x.com")).await.unwrap_err();
            assert!(matches!(err, ServiceError::DuplicateEmail));
        }

        #[tokio::test]
        async fn email_lookup_is_case_insensitive() {
            let repo = InMemoryAccountRepository::new();
            let a = repo.create_account(new_account("alice", "Alice@X.com")).await.unwrap();
            assert_eq!(a.email, "alice@x.com");
            let found = repo.find_by_email("ALICE@x.COM").await.unwrap().unwrap();
            assert_eq!(found.id, a.id);
            assert!(repo.find_by_username("Alice").await.unwrap().is_none());
        }

        #[tokio::test]
        async fn outage_is_reported_as_store_unavailable() {
            let repo = InMemoryAccountRepository::new();
            repo.set_unavailable(true);
            let err = repo.find_by_username("alice").await.unwrap_err();
            assert!(matches!(err, ServiceError::StoreUnavailable(_)));
        }
    }
}
