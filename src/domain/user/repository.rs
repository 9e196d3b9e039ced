//! User repository port

use std::collections::HashMap;
use std::fmt::Debug;

use async_trait::async_trait;

use super::country::{Continent, CountryCode};
use super::email::Email;
use super::entity::{User, UserId, UserPatch};
use super::password::HashedPassword;
use super::role::Role;
use super::username::Username;
use crate::domain::DomainError;

/// Field bundle for inserting a new account.
///
/// Every member is an already-validated value object. The id, status and
/// timestamps are produced by [`User::create`] inside the adapter.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub password_hash: HashedPassword,
    pub role: Role,
    pub country: Option<CountryCode>,
}

/// Storage port for user accounts.
///
/// Absent rows surface as `Ok(None)`, never as an error. Email and username
/// uniqueness is enforced by the backing store and surfaces as
/// [`DomainError::Conflict`] carrying the offending field. Deleting an id
/// that does not exist succeeds: the post-condition already holds.
#[async_trait]
pub trait UserRepository: Send + Sync + Debug {
    /// Insert a new account, generating its identity
    async fn create(&self, data: NewUser) -> Result<User, DomainError>;

    /// Get a user by id
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError>;

    /// Get a user by email
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError>;

    /// Get a user by username
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, DomainError>;

    /// Apply a partial update, refreshing `updated_at`. Returns `None` when
    /// the id does not exist.
    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>, DomainError>;

    /// Remove a user. Idempotent.
    async fn delete(&self, id: &UserId) -> Result<(), DomainError>;

    /// Total number of stored users
    async fn count_users(&self) -> Result<u64, DomainError>;

    /// All users holding the given role, oldest first
    async fn find_users_by_role(&self, role: Role) -> Result<Vec<User>, DomainError>;

    /// All users registered from the given country, oldest first
    async fn find_users_by_country(&self, country: &CountryCode)
        -> Result<Vec<User>, DomainError>;

    /// All users whose primary continent matches, oldest first.
    /// Transcontinental codes resolve through the same override policy the
    /// value object uses.
    async fn find_users_by_continent(&self, continent: Continent)
        -> Result<Vec<User>, DomainError>;

    /// User counts keyed by primary continent. Users without a country are
    /// not counted.
    async fn user_stats_by_continent(&self) -> Result<HashMap<Continent, u64>, DomainError>;

    /// User counts keyed by country code. Users without a country are not
    /// counted.
    async fn user_stats_by_country(&self) -> Result<HashMap<CountryCode, u64>, DomainError>;

    /// Check whether an email is already taken
    async fn exists_by_email(&self, email: &Email) -> Result<bool, DomainError> {
        Ok(self.find_by_email(email).await?.is_some())
    }

    /// Check whether a username is already taken
    async fn exists_by_username(&self, username: &Username) -> Result<bool, DomainError> {
        Ok(self.find_by_username(username).await?.is_some())
    }
}
