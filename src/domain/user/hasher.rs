//! Password hashing port

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::password::{HashedPassword, PlainPassword};
use crate::domain::DomainError;

/// Port for producing and checking password hashes.
///
/// `hash` salts per call, so hashing the same password twice yields two
/// different strings; `verify` is deterministic for fixed inputs. Failures
/// surface as [`DomainError::Hashing`] and never carry the plain text.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hash a plain password with a fresh salt
    async fn hash(&self, password: &PlainPassword) -> Result<HashedPassword, DomainError>;

    /// Check a plain password against a stored hash
    async fn verify(
        &self,
        password: &PlainPassword,
        hash: &HashedPassword,
    ) -> Result<bool, DomainError>;
}
