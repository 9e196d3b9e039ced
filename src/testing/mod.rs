//! Test support
//!
//! Ships with the crate so integration tests and downstream adapters can
//! verify [`crate::domain::user::UserRepository`] implementations against
//! the shared contract.

pub mod repository_contract;
