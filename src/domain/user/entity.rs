//! User aggregate and its factory paths

use chrono::{DateTime, Duration, DurationRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::country::{Continent, CountryCode};
use super::email::Email;
use super::password::HashedPassword;
use super::role::Role;
use super::status::UserStatus;
use super::username::Username;
use super::validation::ValidationError;

/// User identifier, a UUID generated at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Wrap an existing identifier after validation
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into().trim().to_string();
        if id.is_empty() {
            return Err(ValidationError::EmptyUserId);
        }
        Ok(Self(id))
    }

    /// Generate a fresh random identifier
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserId {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw persisted shape of a user row, exactly as storage returns it.
///
/// [`User::from_persistence`] is the only consumer; every field is
/// re-validated there so a corrupted row can never become a live entity.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub username: String,
    pub password_hash: String,
    pub role: String,
    pub status: String,
    pub country_code: Option<String>,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update applied to a stored user.
///
/// Outer `None` means "leave unchanged". For the nullable fields the inner
/// option distinguishes setting a value from clearing it.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<Email>,
    pub username: Option<Username>,
    pub password_hash: Option<HashedPassword>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
    pub country: Option<Option<CountryCode>>,
    pub last_login_at: Option<Option<DateTime<Utc>>>,
}

impl UserPatch {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.username.is_none()
            && self.password_hash.is_none()
            && self.role.is_none()
            && self.status.is_none()
            && self.country.is_none()
            && self.last_login_at.is_none()
    }
}

/// Microsecond precision, the finest granularity every supported storage
/// engine keeps. Normalizing timestamps to it keeps in-process entities
/// byte-identical to their rehydrated counterparts.
fn to_storage_precision(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.duration_trunc(Duration::microseconds(1)).unwrap_or(ts)
}

/// The user aggregate.
///
/// There is no public constructor taking raw fields: new accounts go through
/// [`User::create`], stored rows through [`User::from_persistence`]. All
/// fields are private and every mutation produces a new instance.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    id: UserId,
    email: Email,
    username: Username,
    /// Never exposed in serialization
    #[serde(skip_serializing)]
    password_hash: HashedPassword,
    role: Role,
    status: UserStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    country: Option<CountryCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new account in `ConfirmationPending` with a generated id and
    /// both timestamps set to now.
    pub fn create(
        email: Email,
        username: Username,
        password_hash: HashedPassword,
        role: Role,
        country: Option<CountryCode>,
    ) -> Self {
        let now = Utc::now();

        Self::from_parts(
            UserId::generate(),
            email,
            username,
            password_hash,
            role,
            UserStatus::default(),
            country,
            None,
            now,
            now,
        )
        .expect("freshly generated user satisfies the entity invariants")
    }

    /// Rehydrate from a stored row, re-validating every field. No defaulting:
    /// a row that does not parse is an error, not a repaired entity.
    pub fn from_persistence(record: UserRecord) -> Result<Self, ValidationError> {
        let country = record.country_code.map(CountryCode::new).transpose()?;

        Self::from_parts(
            UserId::new(record.id)?,
            Email::new(record.email)?,
            Username::new(record.username)?,
            HashedPassword::new(record.password_hash)?,
            record.role.parse()?,
            record.status.parse()?,
            country,
            record.last_login_at,
            record.created_at,
            record.updated_at,
        )
    }

    /// The single invariant checkpoint both factories and every mutation
    /// funnel through.
    fn from_parts(
        id: UserId,
        email: Email,
        username: Username,
        password_hash: HashedPassword,
        role: Role,
        status: UserStatus,
        country: Option<CountryCode>,
        last_login_at: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let created_at = to_storage_precision(created_at);
        let updated_at = to_storage_precision(updated_at);

        if updated_at < created_at {
            return Err(ValidationError::UpdatedBeforeCreated);
        }

        Ok(Self {
            id,
            email,
            username,
            password_hash,
            role,
            status,
            country,
            last_login_at: last_login_at.map(to_storage_precision),
            created_at,
            updated_at,
        })
    }

    // Getters

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn password_hash(&self) -> &HashedPassword {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn status(&self) -> UserStatus {
        self.status
    }

    pub fn country(&self) -> Option<&CountryCode> {
        self.country.as_ref()
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    // Delegated queries

    pub fn can_login(&self) -> bool {
        self.status.can_login()
    }

    pub fn can_create_content(&self) -> bool {
        self.role.can_create_content()
    }

    pub fn can_manage_users(&self) -> bool {
        self.role.can_manage_users()
    }

    /// Whether the user's country belongs to `continent`. Users without a
    /// country belong to no continent.
    pub fn is_from(&self, continent: Continent) -> bool {
        self.country
            .as_ref()
            .is_some_and(|country| country.is_in(continent))
    }

    pub fn primary_continent(&self) -> Option<Continent> {
        self.country.as_ref().map(CountryCode::primary_continent)
    }

    // Lifecycle transitions

    /// Confirm the email address, moving the account to `Active`.
    pub fn confirm(self) -> Result<Self, ValidationError> {
        if self.status != UserStatus::ConfirmationPending {
            return Err(ValidationError::InvalidStatusTransition {
                from: self.status,
                to: UserStatus::Active,
            });
        }
        self.transition_to(UserStatus::Active)
    }

    pub fn suspend(self) -> Result<Self, ValidationError> {
        self.transition_to(UserStatus::Suspended)
    }

    /// Bring a suspended account back to `Active`. Not applicable to
    /// unconfirmed accounts, which go through [`User::confirm`].
    pub fn reactivate(self) -> Result<Self, ValidationError> {
        if !self.status.can_reactivate() {
            return Err(ValidationError::InvalidStatusTransition {
                from: self.status,
                to: UserStatus::Active,
            });
        }
        self.transition_to(UserStatus::Active)
    }

    /// Ban the account. Terminal: no transition leaves `Banned`.
    pub fn ban(self) -> Result<Self, ValidationError> {
        self.transition_to(UserStatus::Banned)
    }

    fn transition_to(mut self, target: UserStatus) -> Result<Self, ValidationError> {
        if !self.status.can_transition_to(target) {
            return Err(ValidationError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.updated_at = to_storage_precision(Utc::now());
        Ok(self)
    }

    /// Record a successful authentication.
    pub fn with_last_login(mut self, at: DateTime<Utc>) -> Self {
        self.last_login_at = Some(to_storage_precision(at));
        self
    }

    /// Apply a partial update, refreshing `updated_at` to `now`.
    ///
    /// This is a storage-level operation: it does not run the status state
    /// machine, which belongs to the lifecycle transitions above.
    pub fn apply_patch(self, patch: UserPatch, now: DateTime<Utc>) -> Result<Self, ValidationError> {
        Self::from_parts(
            self.id,
            patch.email.unwrap_or(self.email),
            patch.username.unwrap_or(self.username),
            patch.password_hash.unwrap_or(self.password_hash),
            patch.role.unwrap_or(self.role),
            patch.status.unwrap_or(self.status),
            patch.country.unwrap_or(self.country),
            patch.last_login_at.unwrap_or(self.last_login_at),
            self.created_at,
            now,
        )
    }
}
