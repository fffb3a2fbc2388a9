use sea_orm::DatabaseConnection;

use crate::auth::domain::{Account, NewAccount};
use crate::auth::repository::AccountRepository;
use crate::errors::ServiceError;

/// Postgres-backed credential store. Uniqueness comes from the
/// `uniq_account_username` / `uniq_account_email` indexes.
pub struct SeaOrmAccountRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_domain(m: models::account::Model) -> Account {
    Account {
        id: m.id,
        username: m.username,
        email: m.email,
        password_hash: m.password_hash,
        first_name: m.first_name,
        last_name: m.last_name,
        is_active: m.is_active,
        created_at: m.created_at.into(),
    }
}

#[async_trait::async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn create_account(&self, new: NewAccount) -> Result<Account, ServiceError> {
        let row = models::account::NewAccount {
            username: new.username,
            email: new.email,
            password_hash: new.password_hash,
            password_algorithm: new.password_algorithm,
            first_name: new.first_name,
            last_name: new.last_name,
        };
        let created = models::account::create(&self.db, row).await?;
        Ok(to_domain(created))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<Account>, ServiceError> {
        Ok(models::account::find_by_username(&self.db, username).await?.map(to_domain))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, ServiceError> {
        Ok(models::account::find_by_email(&self.db, email).await?.map(to_domain))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, ServiceError> {
        Ok(models::account::find_by_id(&self.db, id).await?.map(to_domain))
    }
}
