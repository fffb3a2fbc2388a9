//! Booking module: owner-scoped CRUD over the `booking` table.
//!
//! Every operation takes the caller's [`Identity`](crate::auth::domain::Identity);
//! the owner of a booking is never read from client input.

pub mod domain;
pub mod repository;
pub mod repo;
pub mod service;

pub use service::BookingService;
