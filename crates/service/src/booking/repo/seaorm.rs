use sea_orm::DatabaseConnection;

use crate::booking::domain::{Booking, BookingChanges, NewBooking};
use crate::booking::repository::BookingRepository;
use crate::errors::ServiceError;

pub struct SeaOrmBookingRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn to_domain(m: models::booking::Model) -> Booking {
    Booking {
        id: m.id,
        owner_id: m.owner_id,
        destination: m.destination,
        date: m.date,
        guests: m.guests,
        created_at: m.created_at.into(),
    }
}

#[async_trait::async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn insert(&self, new: NewBooking) -> Result<Booking, ServiceError> {
        let m = models::booking::create(&self.db, new.owner_id, &new.destination, new.date, new.guests).await?;
        Ok(to_domain(m))
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Booking>, ServiceError> {
        let rows = models::booking::list_by_owner(&self.db, owner_id).await?;
        Ok(rows.into_iter().map(to_domain).collect())
    }

    async fn find_owned(&self, owner_id: i64, id: i64) -> Result<Option<Booking>, ServiceError> {
        Ok(models::booking::find_owned(&self.db, owner_id, id).await?.map(to_domain))
    }

    async fn update_owned(&self, owner_id: i64, id: i64, changes: BookingChanges) -> Result<Option<Booking>, ServiceError> {
        let updated = models::booking::update_owned(
            &self.db,
            owner_id,
            id,
            changes.destination.as_deref(),
            changes.date,
            changes.guests,
        )
        .await?;
        Ok(updated.map(to_domain))
    }

    async fn delete_owned(&self, owner_id: i64, id: i64) -> Result<bool, ServiceError> {
        Ok(models::booking::delete_owned(&self.db, owner_id, id).await?)
    }
}
