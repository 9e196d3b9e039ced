//! In-memory user repository

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::user::{
    Continent, CountryCode, Email, NewUser, Role, User, UserId, UserPatch, UserRepository,
    Username,
};
use crate::domain::{DomainError, UniqueField};

#[derive(Debug, Default)]
struct Store {
    users: HashMap<String, User>,
    by_email: HashMap<String, String>,
    by_username: HashMap<String, String>,
}

impl Store {
    fn index(&mut self, user: &User) {
        let id = user.id().as_str().to_string();
        self.by_email
            .insert(user.email().as_str().to_string(), id.clone());
        self.by_username
            .insert(user.username().as_str().to_string(), id);
    }

    fn unindex(&mut self, user: &User) {
        self.by_email.remove(user.email().as_str());
        self.by_username.remove(user.username().as_str());
    }

    /// First unique field `user` would collide on, ignoring the row with
    /// `own_id` so updates do not conflict with themselves.
    fn collision(&self, user: &User, own_id: Option<&str>) -> Option<UniqueField> {
        let taken_by_other = |existing: Option<&String>| {
            existing.is_some_and(|id| own_id != Some(id.as_str()))
        };

        if taken_by_other(self.by_email.get(user.email().as_str())) {
            Some(UniqueField::Email)
        } else if taken_by_other(self.by_username.get(user.username().as_str())) {
            Some(UniqueField::Username)
        } else {
            None
        }
    }
}

/// Hash-map backed implementation of [`UserRepository`].
///
/// Behaves like the SQL adapters from the caller's point of view and backs
/// the unit tests that do not want a database.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    store: RwLock<Store>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every stored user
    pub async fn clear(&self) {
        let mut store = self.store.write().await;
        store.users.clear();
        store.by_email.clear();
        store.by_username.clear();
    }
}

fn oldest_first(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().as_str().cmp(b.id().as_str()))
    });
    users
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, data: NewUser) -> Result<User, DomainError> {
        let mut store = self.store.write().await;

        let user = User::create(
            data.email,
            data.username,
            data.password_hash,
            data.role,
            data.country,
        );

        if let Some(field) = store.collision(&user, None) {
            let value = match field {
                UniqueField::Email => user.email().as_str(),
                UniqueField::Username => user.username().as_str(),
            };
            return Err(DomainError::conflict(field, value));
        }

        store.index(&user);
        store
            .users
            .insert(user.id().as_str().to_string(), user.clone());

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;
        Ok(store.users.get(id.as_str()).cloned())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .by_email
            .get(email.as_str())
            .and_then(|id| store.users.get(id))
            .cloned())
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, DomainError> {
        let store = self.store.read().await;
        Ok(store
            .by_username
            .get(username.as_str())
            .and_then(|id| store.users.get(id))
            .cloned())
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>, DomainError> {
        let mut store = self.store.write().await;

        let current = match store.users.get(id.as_str()) {
            Some(user) => user.clone(),
            None => return Ok(None),
        };

        let updated = current.clone().apply_patch(patch, Utc::now())?;

        if let Some(field) = store.collision(&updated, Some(id.as_str())) {
            let value = match field {
                UniqueField::Email => updated.email().as_str(),
                UniqueField::Username => updated.username().as_str(),
            };
            return Err(DomainError::conflict(field, value));
        }

        store.unindex(&current);
        store.index(&updated);
        store
            .users
            .insert(id.as_str().to_string(), updated.clone());

        Ok(Some(updated))
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        let mut store = self.store.write().await;
        if let Some(user) = store.users.remove(id.as_str()) {
            store.unindex(&user);
        }
        Ok(())
    }

    async fn count_users(&self) -> Result<u64, DomainError> {
        let store = self.store.read().await;
        Ok(store.users.len() as u64)
    }

    async fn find_users_by_role(&self, role: Role) -> Result<Vec<User>, DomainError> {
        let store = self.store.read().await;
        let users = store
            .users
            .values()
            .filter(|user| user.role() == role)
            .cloned()
            .collect();
        Ok(oldest_first(users))
    }

    async fn find_users_by_country(
        &self,
        country: &CountryCode,
    ) -> Result<Vec<User>, DomainError> {
        let store = self.store.read().await;
        let users = store
            .users
            .values()
            .filter(|user| user.country() == Some(country))
            .cloned()
            .collect();
        Ok(oldest_first(users))
    }

    async fn find_users_by_continent(
        &self,
        continent: Continent,
    ) -> Result<Vec<User>, DomainError> {
        let store = self.store.read().await;
        let users = store
            .users
            .values()
            .filter(|user| user.primary_continent() == Some(continent))
            .cloned()
            .collect();
        Ok(oldest_first(users))
    }

    async fn user_stats_by_continent(&self) -> Result<HashMap<Continent, u64>, DomainError> {
        let store = self.store.read().await;
        let mut stats = HashMap::new();
        for user in store.users.values() {
            if let Some(continent) = user.primary_continent() {
                *stats.entry(continent).or_insert(0) += 1;
            }
        }
        Ok(stats)
    }

    async fn user_stats_by_country(&self) -> Result<HashMap<CountryCode, u64>, DomainError> {
        let store = self.store.read().await;
        let mut stats = HashMap::new();
        for user in store.users.values() {
            if let Some(country) = user.country() {
                *stats.entry(country.clone()).or_insert(0) += 1;
            }
        }
        Ok(stats)
    }
}
