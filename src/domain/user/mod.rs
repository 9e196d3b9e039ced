//! User identity domain
//!
//! This module provides the value objects, the user aggregate and the
//! storage/hashing ports. Everything here is engine-agnostic: concrete
//! adapters live in the infrastructure layer.

mod country;
mod email;
mod entity;
mod hasher;
mod password;
mod repository;
mod role;
mod status;
mod username;
mod validation;

pub use country::{Continent, CountryCode};
pub use email::Email;
pub use entity::{User, UserId, UserPatch, UserRecord};
pub use hasher::PasswordHasher;
pub use password::{HashedPassword, PlainPassword, BCRYPT_MAX_COST, BCRYPT_MIN_COST};
pub use repository::{NewUser, UserRepository};
pub use role::Role;
pub use status::UserStatus;
pub use username::Username;
pub use validation::ValidationError;

#[cfg(test)]
pub use hasher::MockPasswordHasher;
