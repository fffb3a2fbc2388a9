//! Service layer: the credential authentication and token issuance engine,
//! and the owner-scoped booking manager that consumes its identities.
//! - Separates business logic from data access (repository traits per aggregate).
//! - Reuses validation and entity definitions in `models` crate.
//! - Every failure leaves the crate as a [`errors::ServiceError`].

pub mod errors;
pub mod auth;
pub mod booking;
pub mod metrics;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
