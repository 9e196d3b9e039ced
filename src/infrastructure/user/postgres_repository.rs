//! PostgreSQL user repository implementation

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::sql::{conflict_value, map_sqlx_error, unique_conflict};
use crate::config::DatabaseConfig;
use crate::domain::user::{
    Continent, CountryCode, Email, NewUser, Role, User, UserId, UserPatch, UserRecord,
    UserRepository, Username,
};
use crate::domain::DomainError;

/// Schema statements, run in order. Unique constraints carry the names the
/// conflict mapping looks for.
const SCHEMA: [&str; 4] = [
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id VARCHAR(36) PRIMARY KEY,
        email VARCHAR(254) NOT NULL,
        username VARCHAR(30) NOT NULL,
        password_hash VARCHAR(60) NOT NULL,
        role VARCHAR(20) NOT NULL,
        status VARCHAR(30) NOT NULL DEFAULT 'confirmation_pending',
        country_code CHAR(2),
        last_login_at TIMESTAMPTZ,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_users_email ON users (email)",
    "CREATE UNIQUE INDEX IF NOT EXISTS uq_users_username ON users (username)",
    "CREATE INDEX IF NOT EXISTS idx_users_country_code ON users (country_code)",
];

#[derive(Debug, sqlx::FromRow)]
struct PgUserRow {
    id: String,
    email: String,
    username: String,
    password_hash: String,
    role: String,
    status: String,
    country_code: Option<String>,
    last_login_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PgUserRow> for UserRecord {
    fn from(row: PgUserRow) -> Self {
        UserRecord {
            id: row.id,
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            role: row.role,
            status: row.status,
            country_code: row.country_code,
            last_login_at: row.last_login_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn row_to_user(row: PgUserRow) -> Result<User, DomainError> {
    Ok(User::from_persistence(row.into())?)
}

/// PostgreSQL implementation of [`UserRepository`]
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool from configuration and wrap it
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let url = config
            .postgres_url
            .as_deref()
            .ok_or_else(|| DomainError::unavailable("database.postgres_url is not configured"))?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("Failed to connect to PostgreSQL", e))?;

        Ok(Self::new(pool))
    }

    /// The underlying pool, for sharing with other repositories
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the users table and its indexes if they do not exist
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("Failed to create users schema", e))?;
        }
        Ok(())
    }

    async fn country_counts(&self) -> Result<Vec<(String, i64)>, DomainError> {
        sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT country_code, COUNT(*)
            FROM users
            WHERE country_code IS NOT NULL
            GROUP BY country_code
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to aggregate users by country", e))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, data: NewUser) -> Result<User, DomainError> {
        let user = User::create(
            data.email,
            data.username,
            data.password_hash,
            data.role,
            data.country,
        );

        sqlx::query(
            r#"
            INSERT INTO users (id, email, username, password_hash, role, status,
                               country_code, last_login_at, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.email().as_str())
        .bind(user.username().as_str())
        .bind(user.password_hash().as_str())
        .bind(user.role().as_str())
        .bind(user.status().as_str())
        .bind(user.country().map(|country| country.as_str()))
        .bind(user.last_login_at())
        .bind(user.created_at())
        .bind(user.updated_at())
        .execute(&self.pool)
        .await
        .map_err(|e| match unique_conflict(&e) {
            Some(field) => DomainError::conflict(field, conflict_value(&user, field)),
            None => map_sqlx_error("Failed to create user", e),
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, PgUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to get user", e))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, PgUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to get user by email", e))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, PgUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to get user by username", e))?;

        row.map(row_to_user).transpose()
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<Option<User>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Failed to start update transaction", e))?;

        let row = sqlx::query_as::<_, PgUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Failed to get user for update", e))?;

        let current = match row {
            Some(row) => row_to_user(row)?,
            None => return Ok(None),
        };

        let updated = current.apply_patch(patch, Utc::now())?;

        sqlx::query(
            r#"
            UPDATE users
            SET email = $2, username = $3, password_hash = $4, role = $5,
                status = $6, country_code = $7, last_login_at = $8, updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(id.as_str())
        .bind(updated.email().as_str())
        .bind(updated.username().as_str())
        .bind(updated.password_hash().as_str())
        .bind(updated.role().as_str())
        .bind(updated.status().as_str())
        .bind(updated.country().map(|country| country.as_str()))
        .bind(updated.last_login_at())
        .bind(updated.updated_at())
        .execute(&mut *tx)
        .await
        .map_err(|e| match unique_conflict(&e) {
            Some(field) => DomainError::conflict(field, conflict_value(&updated, field)),
            None => map_sqlx_error("Failed to update user", e),
        })?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Failed to commit update", e))?;

        Ok(Some(updated))
    }

    async fn delete(&self, id: &UserId) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to delete user", e))?;

        Ok(())
    }

    async fn count_users(&self) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to count users", e))?;

        Ok(count as u64)
    }

    async fn find_users_by_role(&self, role: Role) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query_as::<_, PgUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE role = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(role.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list users by role", e))?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_users_by_country(
        &self,
        country: &CountryCode,
    ) -> Result<Vec<User>, DomainError> {
        let rows = sqlx::query_as::<_, PgUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE country_code = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(country.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list users by country", e))?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn find_users_by_continent(
        &self,
        continent: Continent,
    ) -> Result<Vec<User>, DomainError> {
        // The continent filter is pushed down as the list of codes whose
        // primary continent matches, so the override policy stays in the
        // domain layer.
        let codes: Vec<String> = CountryCode::codes_with_primary(continent)
            .into_iter()
            .map(String::from)
            .collect();

        let rows = sqlx::query_as::<_, PgUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE country_code = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(codes)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to list users by continent", e))?;

        rows.into_iter().map(row_to_user).collect()
    }

    async fn user_stats_by_continent(&self) -> Result<HashMap<Continent, u64>, DomainError> {
        let mut stats = HashMap::new();
        for (code, count) in self.country_counts().await? {
            let continent = CountryCode::new(code)?.primary_continent();
            *stats.entry(continent).or_insert(0) += count as u64;
        }
        Ok(stats)
    }

    async fn user_stats_by_country(&self) -> Result<HashMap<CountryCode, u64>, DomainError> {
        let mut stats = HashMap::new();
        for (code, count) in self.country_counts().await? {
            stats.insert(CountryCode::new(code)?, count as u64);
        }
        Ok(stats)
    }
}
