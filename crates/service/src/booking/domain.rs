use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: i64,
    pub owner_id: i64,
    pub destination: String,
    pub date: NaiveDate,
    pub guests: i32,
    pub created_at: DateTime<Utc>,
}

/// Client payload for a new booking. There is no owner field: an `owner` or
/// `owner_id` key sent by the client is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateBookingInput {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub guests: Option<i32>,
}

/// Partial update; absent fields stay unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookingInput {
    #[serde(default)]
    pub destination: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub guests: Option<i32>,
}

/// Validated row ready for insertion.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub owner_id: i64,
    pub destination: String,
    pub date: NaiveDate,
    pub guests: i32,
}

/// Validated changes for an update.
#[derive(Debug, Clone, Default)]
pub struct BookingChanges {
    pub destination: Option<String>,
    pub date: Option<NaiveDate>,
    pub guests: Option<i32>,
}

impl BookingChanges {
    pub fn is_empty(&self) -> bool {
        self.destination.is_none() && self.date.is_none() && self.guests.is_none()
    }
}
