//! MySQL user repository implementation

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;

use super::sql::{conflict_value, map_sqlx_error, unique_conflict};
use crate::config::DatabaseConfig;
use crate::domain::user::{
    Continent, CountryCode, Email, NewUser, Role, User, UserId, UserPatch, UserRecord,
    UserRepository, Username,
};
use crate::domain::DomainError;

/// Single-statement schema: MySQL has no `CREATE INDEX IF NOT EXISTS`, so the
/// keys are declared inline. `utf8mb4_bin` keeps username uniqueness
/// case-sensitive, matching PostgreSQL's default index behavior.
const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id VARCHAR(36) PRIMARY KEY,
        email VARCHAR(254) NOT NULL,
        username VARCHAR(30) NOT NULL,
        password_hash VARCHAR(60) NOT NULL,
        role VARCHAR(20) NOT NULL,
        status VARCHAR(30) NOT NULL DEFAULT 'confirmation_pending',
        country_code CHAR(2) NULL,
        last_login_at DATETIME(6) NULL,
        created_at DATETIME(6) NOT NULL,
        updated_at DATETIME(6) NOT NULL,
        UNIQUE KEY uq_users_email (email),
        UNIQUE KEY uq_users_username (username),
        KEY idx_users_country_code (country_code)
    ) CHARACTER SET utf8mb4 COLLATE utf8mb4_bin
"#;

/// MySQL `DATETIME(6)` has no timezone, so timestamps are stored as naive
/// UTC and tagged back on read.
#[derive(Debug, sqlx::FromRow)]
struct MySqlUserRow {
    id: String,
    email: String,
    username: String,
    password_hash: String,
    role: String,
    status: String,
    country_code: Option<String>,
    last_login_at: Option<NaiveDateTime>,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

fn as_utc(naive: NaiveDateTime) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(naive, Utc)
}

impl From<MySqlUserRow> for UserRecord {
    fn from(row: MySqlUserRow) -> Self {
        UserRecord {
            id: row.id,
            email: row.email,
            username: row.username,
            password_hash: row.password_hash,
            role: row.role,
            status: row.status,
            country_code: row.country_code,
            last_login_at: row.last_login_at.map(as_utc),
            created_at: as_utc(row.created_at),
            updated_at: as_utc(row.updated_at),
        }
    }
}

fn row_to_user(row: MySqlUserRow) -> Result<User, DomainError> {
    Ok(User::from_persistence(row.into())?)
}

/// MySQL implementation of [`UserRepository`]
#[derive(Debug, Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    /// Create a new repository with the given connection pool
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Open a pool from configuration and wrap it
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DomainError> {
        let url = config
            .mysql_url
            .as_deref()
            .ok_or_else(|| DomainError::unavailable("database.mysql_url is not configured"))?;

        let pool = MySqlPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(url)
            .await
            .map_err(|e| map_sqlx_error("Failed to connect to MySQL", e))?;

        Ok(Self::new(pool))
    }

    /// The underlying pool, for sharing with other repositories
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }

    /// Create the users table and its keys if they do not exist
    pub async fn ensure_schema(&self) -> Result<(), DomainError> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Failed to create users schema", e))?;
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
impl UserRepository for MySqlUserRepository {
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
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user.id().as_str())
        .bind(user.email().as_str())
        .bind(user.username().as_str())
        .bind(user.password_hash().as_str())
        .bind(user.role().as_str())
        .bind(user.status().as_str())
        .bind(user.country().map(|country| country.as_str()))
        .bind(user.last_login_at().map(|at| at.naive_utc()))
        .bind(user.created_at().naive_utc())
        .bind(user.updated_at().naive_utc())
        .execute(&self.pool)
        .await
        .map_err(|e| match unique_conflict(&e) {
            Some(field) => DomainError::conflict(field, conflict_value(&user, field)),
            None => map_sqlx_error("Failed to create user", e),
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, MySqlUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to get user", e))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, MySqlUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Failed to get user by email", e))?;

        row.map(row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, MySqlUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE username = ?
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

        let row = sqlx::query_as::<_, MySqlUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE id = ?
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
            SET email = ?, username = ?, password_hash = ?, role = ?,
                status = ?, country_code = ?, last_login_at = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(updated.email().as_str())
        .bind(updated.username().as_str())
        .bind(updated.password_hash().as_str())
        .bind(updated.role().as_str())
        .bind(updated.status().as_str())
        .bind(updated.country().map(|country| country.as_str()))
        .bind(updated.last_login_at().map(|at| at.naive_utc()))
        .bind(updated.updated_at().naive_utc())
        .bind(id.as_str())
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
        sqlx::query("DELETE FROM users WHERE id = ?")
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
        let rows = sqlx::query_as::<_, MySqlUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE role = ?
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
        let rows = sqlx::query_as::<_, MySqlUserRow>(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE country_code = ?
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
        // MySQL has no array binding, so the pushed-down code list becomes
        // one placeholder per code.
        let codes = CountryCode::codes_with_primary(continent);
        let placeholders = vec!["?"; codes.len()].join(", ");
        let query = format!(
            r#"
            SELECT id, email, username, password_hash, role, status,
                   country_code, last_login_at, created_at, updated_at
            FROM users
            WHERE country_code IN ({placeholders})
            ORDER BY created_at, id
            "#,
        );

        let mut statement = sqlx::query_as::<_, MySqlUserRow>(&query);
        for code in codes {
            statement = statement.bind(code);
        }

        let rows = statement
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
