use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Booking: owner listing ordered by creation time
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_owner_created")
                    .table(Booking::Table)
                    .col(Booking::OwnerId)
                    .col(Booking::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_booking_owner_created").table(Booking::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Booking { Table, OwnerId, CreatedAt }
