//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Credential store contract, password hashing, identifier resolution, token
//! issuance and the access guard used by protected endpoints.

pub mod domain;
pub mod errors;
pub mod guard;
pub mod password;
pub mod repository;
pub mod repo;
pub mod resolver;
pub mod service;
pub mod token;

pub use guard::AccessGuard;
pub use service::AuthService;
pub use token::TokenIssuer;
