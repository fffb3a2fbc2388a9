//! sea-orm entities for accounts and bookings, plus the row-level helpers
//! the service layer builds on.

pub mod errors;
pub mod db;
pub mod account;
pub mod booking;

#[cfg(test)]
mod db_tests {
    use migration::MigratorTrait;

    use crate::{account, booking, db, errors::ModelError};

    // Runs only against a real Postgres: `DATABASE_URL=postgres://... cargo test`.
    #[tokio::test]
    async fn unique_indexes_reject_duplicates() -> anyhow::Result<()> {
        if std::env::var("DATABASE_URL").is_err() {
            return Ok(());
        }
        let db = db::connect().await?;
        migration::Migrator::up(&db, None).await?;

        let tag = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
        let new = account::NewAccount {
            username: format!("model_{tag}"),
            email: format!("model_{tag}@example.com"),
            password_hash: "$argon2id$placeholder".into(),
            password_algorithm: "argon2id".into(),
            first_name: String::new(),
            last_name: String::new(),
        };
        let created = account::create(&db, new.clone()).await?;

        let dup_email = account::NewAccount { username: format!("other_{tag}"), ..new.clone() };
        match account::create(&db, dup_email).await {
            Err(ModelError::UniqueViolation(msg)) => assert!(msg.contains("uniq_account_email")),
            other => panic!("expected unique violation, got {other:?}"),
        }

        let today = chrono::Utc::now().date_naive();
        let b = booking::create(&db, created.id, "Paris", today, 2).await?;
        assert!(booking::find_owned(&db, created.id, b.id).await?.is_some());
        assert!(booking::find_owned(&db, created.id + 1_000_000, b.id).await?.is_none());
        assert!(booking::delete_owned(&db, created.id, b.id).await?);
        Ok(())
    }
}
