use async_trait::async_trait;

use super::domain::{Booking, BookingChanges, NewBooking};
use crate::errors::ServiceError;

/// Booking store contract. Every lookup is filtered by owner, so a booking
/// that belongs to someone else looks exactly like a missing one.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, new: NewBooking) -> Result<Booking, ServiceError>;
    /// Oldest first (`created_at`, then `id`).
    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Booking>, ServiceError>;
    async fn find_owned(&self, owner_id: i64, id: i64) -> Result<Option<Booking>, ServiceError>;
    async fn update_owned(&self, owner_id: i64, id: i64, changes: BookingChanges) -> Result<Option<Booking>, ServiceError>;
    /// `false` when nothing owned by `owner_id` had that id.
    async fn delete_owned(&self, owner_id: i64, id: i64) -> Result<bool, ServiceError>;
}

pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Mutex, MutexGuard};

    use chrono::Utc;

    #[derive(Default)]
    struct Rows {
        next_id: i64,
        bookings: BTreeMap<i64, Booking>,
    }

    #[derive(Default)]
    pub struct InMemoryBookingRepository {
        rows: Mutex<Rows>,
        unavailable: AtomicBool,
    }

    impl InMemoryBookingRepository {
        pub fn new() -> Self { Self::default() }

        pub fn set_unavailable(&self, down: bool) {
            self.unavailable.store(down, Ordering::SeqCst);
        }

        fn lock(&self) -> Result<MutexGuard<'_, Rows>, ServiceError> {
            if self.unavailable.load(Ordering::SeqCst) {
                return Err(ServiceError::StoreUnavailable("in-memory store marked unavailable".into()));
            }
            self.rows
                .lock()
                .map_err(|_| ServiceError::StoreUnavailable("in-memory store lock poisoned".into()))
        }
    }

    #[async_trait]
    impl BookingRepository for InMemoryBookingRepository {
        async fn insert(&self, new: NewBooking) -> Result<Booking, ServiceError> {
            let mut r = self.lock()?;
            r.next_id += 1;
            let booking = Booking {
                id: r.next_id,
                owner_id: new.owner_id,
                destination: new.destination,
                date: new.date,
                guests: new.guests,
                created_at: Utc::now(),
            };
            r.bookings.insert(booking.id, booking.clone());
            Ok(booking)
        }

        async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Booking>, ServiceError> {
            let r = self.lock()?;
            let mut out: Vec<Booking> = r.bookings.values().filter(|b| b.owner_id == owner_id).cloned().collect();
            out.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
            Ok(out)
        }

        async fn find_owned(&self, owner_id: i64, id: i64) -> Result<Option<Booking>, ServiceError> {
            let r = self.lock()?;
            Ok(r.bookings.get(&id).filter(|b| b.owner_id == owner_id).cloned())
        }

        async fn update_owned(&self, owner_id: i64, id: i64, changes: BookingChanges) -> Result<Option<Booking>, ServiceError> {
            let mut r = self.lock()?;
            let Some(b) = r.bookings.get_mut(&id).filter(|b| b.owner_id == owner_id) else {
                return Ok(None);
            };
            if let Some(d) = changes.destination { b.destination = d; }
            if let Some(d) = changes.date { b.date = d; }
            if let Some(g) = changes.guests { b.guests = g; }
            Ok(Some(b.clone()))
        }

        async fn delete_owned(&self, owner_id: i64, id: i64) -> Result<bool, ServiceError> {
            let mut r = self.lock()?;
            let owned = r.bookings.get(&id).is_some_and(|b| b.owner_id == owner_id);
            if owned {
                r.bookings.remove(&id);
            }
            Ok(owned)
        }
    }
}
