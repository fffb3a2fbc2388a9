use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, instrument};

use super::domain::{Booking, BookingChanges, CreateBookingInput, NewBooking, UpdateBookingInput};
use super::repository::BookingRepository;
use crate::auth::domain::Identity;
use crate::errors::ServiceError;
use models::booking::{parse_date, validate_destination, validate_guests};

/// Owner-scoped booking operations.
pub struct BookingService<R: BookingRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: BookingRepository + ?Sized> BookingService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    #[instrument(skip_all, fields(owner_id = caller.account_id))]
    pub async fn list(&self, caller: &Identity) -> Result<Vec<Booking>, ServiceError> {
        self.repo.list_by_owner(caller.account_id).await
    }

    /// Create a booking owned by `caller`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::auth::domain::Identity;
    /// use service::booking::domain::CreateBookingInput;
    /// use service::booking::repository::memory::InMemoryBookingRepository;
    /// use service::booking::BookingService;
    /// let svc = BookingService::new(Arc::new(InMemoryBookingRepository::new()));
    /// let alice = Identity { account_id: 1, username: "alice".into(), email: "alice@x.com".into() };
    /// let input = CreateBookingInput {
    ///     destination: Some("Paris".into()),
    ///     date: Some("2099-01-01".into()),
    ///     guests: Some(2),
    /// };
    /// let b = tokio_test::block_on(svc.create(&alice, input)).unwrap();
    /// assert_eq!(b.owner_id, alice.account_id);
    /// ```
    #[instrument(skip_all, fields(owner_id = caller.account_id))]
    pub async fn create(&self, caller: &Identity, input: CreateBookingInput) -> Result<Booking, ServiceError> {
        let destination = input.destination.unwrap_or_default();
        validate_destination(&destination)?;
        let raw_date = input.date.ok_or_else(|| ServiceError::validation("date required"))?;
        let date = parse_date(&raw_date, today())?;
        let guests = input.guests.ok_or_else(|| ServiceError::validation("guests required"))?;
        validate_guests(guests)?;

        let booking = self
            .repo
            .insert(NewBooking { owner_id: caller.account_id, destination: destination.trim().to_string(), date, guests })
            .await?;
        info!(booking_id = booking.id, "booking_created");
        Ok(booking)
    }

    pub async fn get(&self, caller: &Identity, id: i64) -> Result<Booking, ServiceError> {
        self.repo.find_owned(caller.account_id, id).await?.ok_or(ServiceError::NotFound)
    }

    #[instrument(skip_all, fields(owner_id = caller.account_id, booking_id = id))]
    pub async fn update(&self, caller: &Identity, id: i64, input: UpdateBookingInput) -> Result<Booking, ServiceError> {
        let changes = validate_changes(input, today())?;
        if changes.is_empty() {
            return self.get(caller, id).await;
        }
        let updated = self
            .repo
            .update_owned(caller.account_id, id, changes)
            .await?
            .ok_or(ServiceError::NotFound)?;
        info!("booking_updated");
        Ok(updated)
    }

    #[instrument(skip_all, fields(owner_id = caller.account_id, booking_id = id))]
    pub async fn delete(&self, caller: &Identity, id: i64) -> Result<(), ServiceError> {
        if !self.repo.delete_owned(caller.account_id, id).await? {
            return Err(ServiceError::NotFound);
        }
        info!("booking_deleted");
        Ok(())
    }
}

fn today() -> NaiveDate { Utc::now().date_naive() }

fn validate_changes(input: UpdateBookingInput, today: NaiveDate) -> Result<BookingChanges, ServiceError> {
    let destination = match input.destination {
        Some(d) => {
            validate_destination(&d)?;
            Some(d.trim().to_string())
        }
        None => None,
    };
    let date = input.date.map(|raw| parse_date(&raw, today)).transpose()?;
    if let Some(g) = input.guests {
        validate_guests(g)?;
    }
    Ok(BookingChanges { destination, date, guests: input.guests })
}
