//! Fixtures shared by unit tests, doc tests, benches and the server's
//! integration tests: cheap hashing, fixed signing keys and in-memory stores.

use std::sync::Arc;

use crate::auth::domain::Identity;
use crate::auth::password::{CredentialHasher, PasswordParams};
use crate::auth::repository::memory::InMemoryAccountRepository;
use crate::auth::service::{AuthService, RegistrationPolicy};
use crate::auth::token::{SigningKeys, TokenIssuer, TokenSettings};
use crate::booking::repository::memory::InMemoryBookingRepository;
use crate::booking::BookingService;

pub const TEST_ACCESS_SECRET: &str = "test-access-secret";
pub const TEST_REFRESH_SECRET: &str = "test-refresh-secret";

/// Smallest argon2 cost argon2 accepts; only for tests.
pub fn fast_password_params() -> PasswordParams {
    PasswordParams { memory_kib: 64, iterations: 1, parallelism: 1 }
}

pub fn test_issuer() -> TokenIssuer {
    TokenIssuer::new(
        SigningKeys::new(TEST_ACCESS_SECRET.as_bytes(), TEST_REFRESH_SECRET.as_bytes()),
        TokenSettings::default(),
    )
}

pub fn alice() -> Identity {
    Identity { account_id: 1, username: "alice".into(), email: "alice@x.com".into() }
}

/// Auth config matching [`test_issuer`] with cheap hashing.
pub fn test_auth_config() -> configs::AuthConfig {
    let p = fast_password_params();
    configs::AuthConfig {
        access_secret: TEST_ACCESS_SECRET.into(),
        refresh_secret: TEST_REFRESH_SECRET.into(),
        argon2_memory_kib: p.memory_kib,
        argon2_iterations: p.iterations,
        argon2_parallelism: p.parallelism,
        ..configs::AuthConfig::default()
    }
}

/// In-memory auth service; the repository handle is returned for outage
/// simulation and account deactivation.
pub fn in_memory_auth(
    policy: RegistrationPolicy,
) -> (AuthService<InMemoryAccountRepository>, Arc<InMemoryAccountRepository>) {
    let repo = Arc::new(InMemoryAccountRepository::new());
    let hasher = CredentialHasher::new(fast_password_params()).expect("fast argon2 params are valid");
    let svc = AuthService::new(repo.clone(), Arc::new(hasher), Arc::new(test_issuer()), policy);
    (svc, repo)
}

pub fn in_memory_bookings() -> BookingService<InMemoryBookingRepository> {
    BookingService::new(Arc::new(InMemoryBookingRepository::new()))
}
