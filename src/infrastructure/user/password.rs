//! Password hashing using bcrypt

use async_trait::async_trait;
use bcrypt::DEFAULT_COST;
use tokio::task;
use tracing::warn;

use crate::domain::user::{
    HashedPassword, PasswordHasher, PlainPassword, ValidationError, BCRYPT_MAX_COST,
    BCRYPT_MIN_COST,
};
use crate::domain::DomainError;

/// Bcrypt-based implementation of [`PasswordHasher`].
///
/// Hashing runs on the blocking thread pool so a cost-12 computation does not
/// stall the async executor.
#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    /// Create a hasher with the bcrypt default cost
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Create a hasher with a specific cost factor. Tests use low costs to
    /// stay fast; anything outside the bcrypt range is rejected.
    pub fn with_cost(cost: u32) -> Result<Self, DomainError> {
        if !(BCRYPT_MIN_COST..=BCRYPT_MAX_COST).contains(&cost) {
            return Err(
                ValidationError::HashCostOutOfRange(cost, BCRYPT_MIN_COST, BCRYPT_MAX_COST).into(),
            );
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PasswordHasher for BcryptHasher {
    async fn hash(&self, password: &PlainPassword) -> Result<HashedPassword, DomainError> {
        let cost = self.cost;
        let password = password.as_str().to_string();

        let digest = task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| {
                warn!("bcrypt hashing task failed to complete: {e}");
                DomainError::Hashing
            })?
            .map_err(|e| {
                warn!("bcrypt hashing failed: {e}");
                DomainError::Hashing
            })?;

        Ok(HashedPassword::new(digest)?)
    }

    async fn verify(
        &self,
        password: &PlainPassword,
        hash: &HashedPassword,
    ) -> Result<bool, DomainError> {
        let password = password.as_str().to_string();
        let hash = hash.as_str().to_string();

        task::spawn_blocking(move || bcrypt::verify(password, &hash))
            .await
            .map_err(|e| {
                warn!("bcrypt verification task failed to complete: {e}");
                DomainError::Hashing
            })?
            .map_err(|e| {
                warn!("bcrypt verification failed: {e}");
                DomainError::Hashing
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password() -> PlainPassword {
        PlainPassword::new("Str0ng!Password").unwrap()
    }

    fn fast_hasher() -> BcryptHasher {
        BcryptHasher::with_cost(BCRYPT_MIN_COST).unwrap()
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = fast_hasher();

        let hash = hasher.hash(&password()).await.unwrap();

        assert!(hasher.verify(&password(), &hash).await.unwrap());

        let wrong = PlainPassword::new("Other!Passw0rd").unwrap();
        assert!(!hasher.verify(&wrong, &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_is_salted_per_call() {
        let hasher = fast_hasher();

        let first = hasher.hash(&password()).await.unwrap();
        let second = hasher.hash(&password()).await.unwrap();

        assert_ne!(first.as_str(), second.as_str());
        assert!(hasher.verify(&password(), &first).await.unwrap());
        assert!(hasher.verify(&password(), &second).await.unwrap());
    }

    #[tokio::test]
    async fn test_hash_embeds_configured_cost() {
        let hasher = fast_hasher();
        let hash = hasher.hash(&password()).await.unwrap();
        assert_eq!(hash.cost(), BCRYPT_MIN_COST);
    }

    #[test]
    fn test_rejects_cost_outside_bcrypt_range() {
        assert!(BcryptHasher::with_cost(3).is_err());
        assert!(BcryptHasher::with_cost(32).is_err());
        assert!(BcryptHasher::with_cost(4).is_ok());
    }

    #[test]
    fn test_default_uses_bcrypt_default_cost() {
        assert_eq!(BcryptHasher::new().cost(), DEFAULT_COST);
    }
}
