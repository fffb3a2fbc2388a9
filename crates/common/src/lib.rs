//! Types and helpers shared by the service, server and binary crates.

pub mod types;
pub mod utils;
