//! Identity Core
//!
//! The identity and user-persistence core of a CRUD backend:
//! - Self-validating value objects (email, username, passwords, role,
//!   status, country)
//! - A `User` aggregate constructible only through controlled factory paths
//! - An async `UserRepository` port with PostgreSQL, MySQL and in-memory
//!   adapters
//! - A bcrypt `PasswordHasher` port and a `UserService` orchestrating
//!   registration, authentication and the account lifecycle
//! - A repository contract suite (`testing`) every adapter must pass

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod testing;

pub use config::AppConfig;
pub use domain::user::{
    Continent, CountryCode, Email, HashedPassword, NewUser, PasswordHasher, PlainPassword, Role,
    User, UserId, UserPatch, UserRepository, UserStatus, Username, ValidationError,
};
pub use domain::{DomainError, UniqueField};
pub use infrastructure::user::{
    BcryptHasher, ChangePasswordRequest, InMemoryUserRepository, MySqlUserRepository,
    PostgresUserRepository, RegisterUserRequest, UserService,
};
