//! User service for registration, authentication and account lifecycle

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::user::{
    Continent, CountryCode, Email, NewUser, PasswordHasher, PlainPassword, Role, User, UserId,
    UserPatch, UserRepository, Username, ValidationError,
};
use crate::domain::DomainError;

/// Request for registering a new user
#[derive(Debug, Clone)]
pub struct RegisterUserRequest {
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: Role,
    pub country_code: Option<String>,
}

/// Request for changing a user's password
#[derive(Debug, Clone)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// User service for account management
///
/// Orchestrates the repository and hasher ports. Uniqueness is enforced by
/// the repository itself, so registration carries no check-then-insert race.
#[derive(Debug)]
pub struct UserService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> UserService<R, H> {
    /// Create a new user service
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Register a new account. The account starts in `ConfirmationPending`
    /// and cannot authenticate until its email is confirmed.
    pub async fn register(&self, request: RegisterUserRequest) -> Result<User, DomainError> {
        info!(username = %request.username, role = %request.role, "Registering user");

        let email = Email::new(request.email)?;
        let username = Username::new(request.username)?;
        let password = PlainPassword::new(request.password)?;
        let country = request.country_code.map(CountryCode::new).transpose()?;

        let password_hash = self.hasher.hash(&password).await?;

        self.repository
            .create(NewUser {
                email,
                username,
                password_hash,
                role: request.role,
                country,
            })
            .await
    }

    /// Authenticate with an email or username plus password.
    ///
    /// Every refusal is `Ok(None)`: unknown identifier, wrong password, an
    /// account that cannot log in, or a candidate that does not even satisfy
    /// the password policy. Errors are reserved for storage and hashing
    /// failures. A successful login records `last_login_at`.
    pub async fn authenticate(
        &self,
        identifier: &str,
        password: &str,
    ) -> Result<Option<User>, DomainError> {
        let candidate = match PlainPassword::new(password) {
            Ok(candidate) => candidate,
            Err(_) => return Ok(None),
        };

        let found = if identifier.contains('@') {
            match Email::new(identifier) {
                Ok(email) => self.repository.find_by_email(&email).await?,
                Err(_) => return Ok(None),
            }
        } else {
            match Username::new(identifier) {
                Ok(username) => self.repository.find_by_username(&username).await?,
                Err(_) => return Ok(None),
            }
        };

        let user = match found {
            Some(user) => user,
            None => return Ok(None),
        };

        if !user.can_login() {
            debug!(id = %user.id(), status = %user.status(), "Login rejected for inactive account");
            return Ok(None);
        }

        if !self.hasher.verify(&candidate, user.password_hash()).await? {
            return Ok(None);
        }

        let patch = UserPatch {
            last_login_at: Some(Some(Utc::now())),
            ..UserPatch::default()
        };
        self.repository.update(user.id(), patch).await
    }

    /// Get a user by ID
    pub async fn get(&self, id: &str) -> Result<Option<User>, DomainError> {
        let user_id = UserId::new(id)?;
        self.repository.find_by_id(&user_id).await
    }

    /// Get a user by email
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        let email = Email::new(email)?;
        self.repository.find_by_email(&email).await
    }

    /// Get a user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        let username = Username::new(username)?;
        self.repository.find_by_username(&username).await
    }

    /// Confirm a user's email address, activating the account
    pub async fn confirm_email(&self, id: &str) -> Result<Option<User>, DomainError> {
        info!(id = %id, "Confirming user email");
        self.transition(id, User::confirm).await
    }

    /// Suspend a user
    pub async fn suspend(&self, id: &str) -> Result<Option<User>, DomainError> {
        info!(id = %id, "Suspending user");
        self.transition(id, User::suspend).await
    }

    /// Reactivate a suspended user
    pub async fn reactivate(&self, id: &str) -> Result<Option<User>, DomainError> {
        info!(id = %id, "Reactivating user");
        self.transition(id, User::reactivate).await
    }

    /// Ban a user permanently
    pub async fn ban(&self, id: &str) -> Result<Option<User>, DomainError> {
        info!(id = %id, "Banning user");
        self.transition(id, User::ban).await
    }

    /// Change a user's password after verifying the current one
    pub async fn change_password(
        &self,
        id: &str,
        request: ChangePasswordRequest,
    ) -> Result<Option<User>, DomainError> {
        info!(id = %id, "Changing user password");

        let user_id = UserId::new(id)?;

        let user = match self.repository.find_by_id(&user_id).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        // A current password that fails the policy cannot match a stored
        // hash either, so it reports the same mismatch.
        let current = PlainPassword::new(request.current_password)
            .map_err(|_| ValidationError::CurrentPasswordMismatch)?;

        if !self.hasher.verify(&current, user.password_hash()).await? {
            return Err(ValidationError::CurrentPasswordMismatch.into());
        }

        let new_password = PlainPassword::new(request.new_password)?;
        let new_hash = self.hasher.hash(&new_password).await?;

        let patch = UserPatch {
            password_hash: Some(new_hash),
            ..UserPatch::default()
        };
        self.repository.update(&user_id, patch).await
    }

    /// Delete a user. Succeeds even when the id does not exist.
    pub async fn delete(&self, id: &str) -> Result<(), DomainError> {
        info!(id = %id, "Deleting user");
        let user_id = UserId::new(id)?;
        self.repository.delete(&user_id).await
    }

    /// Count all users
    pub async fn count(&self) -> Result<u64, DomainError> {
        self.repository.count_users().await
    }

    /// List users holding a role, oldest first
    pub async fn list_by_role(&self, role: Role) -> Result<Vec<User>, DomainError> {
        self.repository.find_users_by_role(role).await
    }

    /// List users registered from a country, oldest first
    pub async fn list_by_country(&self, country_code: &str) -> Result<Vec<User>, DomainError> {
        let country = CountryCode::new(country_code)?;
        self.repository.find_users_by_country(&country).await
    }

    /// List users whose primary continent matches, oldest first
    pub async fn list_by_continent(&self, continent: Continent) -> Result<Vec<User>, DomainError> {
        self.repository.find_users_by_continent(continent).await
    }

    /// User counts per primary continent
    pub async fn stats_by_continent(&self) -> Result<HashMap<Continent, u64>, DomainError> {
        self.repository.user_stats_by_continent().await
    }

    /// User counts per country
    pub async fn stats_by_country(&self) -> Result<HashMap<CountryCode, u64>, DomainError> {
        self.repository.user_stats_by_country().await
    }

    async fn transition<F>(&self, id: &str, apply: F) -> Result<Option<User>, DomainError>
    where
        F: FnOnce(User) -> Result<User, ValidationError>,
    {
        let user_id = UserId::new(id)?;

        let user = match self.repository.find_by_id(&user_id).await? {
            Some(user) => user,
            None => return Ok(None),
        };

        let transitioned = apply(user)?;

        let patch = UserPatch {
            status: Some(transitioned.status()),
            ..UserPatch::default()
        };
        self.repository.update(&user_id, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::user::{MockPasswordHasher, UserStatus, BCRYPT_MIN_COST};
    use crate::domain::UniqueField;
    use crate::infrastructure::user::in_memory::InMemoryUserRepository;
    use crate::infrastructure::user::password::BcryptHasher;

    const PASSWORD: &str = "Str0ng!Password";

    fn create_service() -> UserService<InMemoryUserRepository, BcryptHasher> {
        let repository = Arc::new(InMemoryUserRepository::new());
        let hasher = Arc::new(BcryptHasher::with_cost(BCRYPT_MIN_COST).unwrap());
        UserService::new(repository, hasher)
    }

    fn make_request(email: &str, username: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            email: email.to_string(),
            username: username.to_string(),
            password: PASSWORD.to_string(),
            role: Role::Student,
            country_code: Some("ES".to_string()),
        }
    }

    async fn register_active(
        service: &UserService<InMemoryUserRepository, BcryptHasher>,
        email: &str,
        username: &str,
    ) -> User {
        let user = service.register(make_request(email, username)).await.unwrap();
        service
            .confirm_email(user.id().as_str())
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn test_register_user() {
        let service = create_service();

        let user = service
            .register(make_request("maria@example.com", "maria"))
            .await
            .unwrap();

        assert_eq!(user.email().as_str(), "maria@example.com");
        assert_eq!(user.username().as_str(), "maria");
        assert_eq!(user.status(), UserStatus::ConfirmationPending);
        assert_eq!(user.country().unwrap().as_str(), "ES");
        assert_ne!(user.password_hash().as_str(), PASSWORD);
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_email() {
        let service = create_service();

        let request = make_request("not-an-email", "maria");

        assert!(service.register(request).await.is_err());
    }

    #[tokio::test]
    async fn test_register_rejects_weak_password() {
        let service = create_service();

        let mut request = make_request("maria@example.com", "maria");
        request.password = "short".to_string();

        assert!(service.register(request).await.is_err());
    }

    #[tokio::test]
    async fn test_register_duplicate_email_reports_field() {
        let service = create_service();

        service
            .register(make_request("maria@example.com", "maria"))
            .await
            .unwrap();

        let err = service
            .register(make_request("maria@example.com", "other"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::conflict(UniqueField::Email, "maria@example.com")
        );
    }

    #[tokio::test]
    async fn test_register_surfaces_hashing_failure() {
        let repository = Arc::new(InMemoryUserRepository::new());
        let mut hasher = MockPasswordHasher::new();
        hasher.expect_hash().returning(|_| Err(DomainError::Hashing));
        let service = UserService::new(repository, Arc::new(hasher));

        let err = service
            .register(make_request("maria@example.com", "maria"))
            .await
            .unwrap_err();

        assert_eq!(err, DomainError::Hashing);
    }

    #[tokio::test]
    async fn test_pending_account_cannot_authenticate() {
        let service = create_service();

        service
            .register(make_request("maria@example.com", "maria"))
            .await
            .unwrap();

        let result = service.authenticate("maria", PASSWORD).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_by_email_and_username() {
        let service = create_service();
        register_active(&service, "maria@example.com", "maria").await;

        let by_email = service
            .authenticate("maria@example.com", PASSWORD)
            .await
            .unwrap();
        assert!(by_email.is_some());

        let by_username = service.authenticate("maria", PASSWORD).await.unwrap();
        assert!(by_username.is_some());
    }

    #[tokio::test]
    async fn test_authenticate_records_last_login() {
        let service = create_service();
        let user = register_active(&service, "maria@example.com", "maria").await;
        assert!(user.last_login_at().is_none());

        let logged_in = service
            .authenticate("maria", PASSWORD)
            .await
            .unwrap()
            .unwrap();
        assert!(logged_in.last_login_at().is_some());
    }

    #[tokio::test]
    async fn test_authenticate_wrong_password() {
        let service = create_service();
        register_active(&service, "maria@example.com", "maria").await;

        let result = service
            .authenticate("maria", "Wr0ng!Password")
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_authenticate_unknown_identifier() {
        let service = create_service();

        assert!(service
            .authenticate("ghost", PASSWORD)
            .await
            .unwrap()
            .is_none());
        assert!(service
            .authenticate("ghost@example.com", PASSWORD)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_authenticate_malformed_input_is_not_an_error() {
        let service = create_service();

        // Identifier that parses as neither email nor username
        assert!(service
            .authenticate("a@@b", PASSWORD)
            .await
            .unwrap()
            .is_none());

        // Candidate below the password policy
        assert!(service.authenticate("maria", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_suspended_account_cannot_authenticate() {
        let service = create_service();
        let user = register_active(&service, "maria@example.com", "maria").await;

        service.suspend(user.id().as_str()).await.unwrap().unwrap();

        let result = service.authenticate("maria", PASSWORD).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_suspend_and_reactivate() {
        let service = create_service();
        let user = register_active(&service, "maria@example.com", "maria").await;
        let id = user.id().as_str();

        let suspended = service.suspend(id).await.unwrap().unwrap();
        assert_eq!(suspended.status(), UserStatus::Suspended);

        let reactivated = service.reactivate(id).await.unwrap().unwrap();
        assert_eq!(reactivated.status(), UserStatus::Active);
    }

    #[tokio::test]
    async fn test_confirm_twice_fails() {
        let service = create_service();
        let user = register_active(&service, "maria@example.com", "maria").await;

        let err = service
            .confirm_email(user.id().as_str())
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::Validation(ValidationError::InvalidStatusTransition {
                from: UserStatus::Active,
                to: UserStatus::Active,
            })
        );
    }

    #[tokio::test]
    async fn test_ban_is_terminal() {
        let service = create_service();
        let user = register_active(&service, "maria@example.com", "maria").await;
        let id = user.id().as_str();

        let banned = service.ban(id).await.unwrap().unwrap();
        assert_eq!(banned.status(), UserStatus::Banned);

        assert!(service.reactivate(id).await.is_err());
    }

    #[tokio::test]
    async fn test_transition_on_unknown_user_returns_none() {
        let service = create_service();
        let missing = UserId::generate();

        let result = service.suspend(missing.as_str()).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_change_password() {
        let service = create_service();
        let user = register_active(&service, "maria@example.com", "maria").await;

        let request = ChangePasswordRequest {
            current_password: PASSWORD.to_string(),
            new_password: "Fresh3r!Password".to_string(),
        };
        service
            .change_password(user.id().as_str(), request)
            .await
            .unwrap()
            .unwrap();

        assert!(service
            .authenticate("maria", PASSWORD)
            .await
            .unwrap()
            .is_none());
        assert!(service
            .authenticate("maria", "Fresh3r!Password")
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_change_password_wrong_current() {
        let service = create_service();
        let user = register_active(&service, "maria@example.com", "maria").await;

        let request = ChangePasswordRequest {
            current_password: "Wr0ng!Password".to_string(),
            new_password: "Fresh3r!Password".to_string(),
        };
        let err = service
            .change_password(user.id().as_str(), request)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            DomainError::Validation(ValidationError::CurrentPasswordMismatch)
        );
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let service = create_service();
        let user = register_active(&service, "maria@example.com", "maria").await;
        let id = user.id().as_str();

        service.delete(id).await.unwrap();
        assert!(service.get(id).await.unwrap().is_none());

        service.delete(id).await.unwrap();
    }

    #[tokio::test]
    async fn test_catalog_queries() {
        let service = create_service();

        let mut admin = make_request("admin@example.com", "admin");
        admin.role = Role::Admin;
        admin.country_code = Some("JP".to_string());
        service.register(admin).await.unwrap();

        service
            .register(make_request("maria@example.com", "maria"))
            .await
            .unwrap();
        service
            .register(make_request("pablo@example.com", "pablo"))
            .await
            .unwrap();

        assert_eq!(service.count().await.unwrap(), 3);
        assert_eq!(service.list_by_role(Role::Student).await.unwrap().len(), 2);
        assert_eq!(service.list_by_country("ES").await.unwrap().len(), 2);
        assert_eq!(
            service
                .list_by_continent(Continent::Europe)
                .await
                .unwrap()
                .len(),
            2
        );

        let stats = service.stats_by_continent().await.unwrap();
        assert_eq!(stats.get(&Continent::Europe), Some(&2));
        assert_eq!(stats.get(&Continent::Asia), Some(&1));
    }
}
