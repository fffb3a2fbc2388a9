//! Create `account` table.
//!
//! Username and email each carry a named unique index; the service layer maps
//! violations of `uniq_account_username` / `uniq_account_email` to duplicate
//! errors, so these names are part of the contract.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Account::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Account::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(string_len(Account::Username, 254).not_null())
                    .col(string_len(Account::Email, 254).not_null())
                    .col(string_len(Account::PasswordHash, 255).not_null())
                    .col(string_len(Account::PasswordAlgorithm, 64).not_null())
                    .col(string_len(Account::FirstName, 150).not_null().default(""))
                    .col(string_len(Account::LastName, 150).not_null().default(""))
                    .col(boolean(Account::IsActive).not_null().default(true))
                    .col(timestamp_with_time_zone(Account::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Account::UpdatedAt).not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_account_username")
                    .table(Account::Table)
                    .col(Account::Username)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uniq_account_email")
                    .table(Account::Table)
                    .col(Account::Email)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Account::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Account {
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    PasswordAlgorithm,
    FirstName,
    LastName,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
