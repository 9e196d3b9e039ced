//! User infrastructure module
//!
//! This module provides the storage adapters (PostgreSQL, MySQL, in-memory),
//! bcrypt password hashing and the user service that orchestrates them.

mod in_memory;
mod mysql_repository;
mod password;
mod postgres_repository;
mod service;
mod sql;

pub use in_memory::InMemoryUserRepository;
pub use mysql_repository::MySqlUserRepository;
pub use password::BcryptHasher;
pub use postgres_repository::PostgresUserRepository;
pub use service::{ChangePasswordRequest, RegisterUserRequest, UserService};
