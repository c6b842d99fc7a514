//! Database repository for user account operations.
//!
//! Provides the credential store used by the account service: lookups by
//! identifier and username, creation, and username/password updates.

use crate::database::models::{CreateUser, UpdateUser, User};
use crate::errors::{ServiceError, ServiceResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

/// Persistence operations the account service depends on.
///
/// Writes that collide with an existing username must fail with
/// `ServiceError::AlreadyExists` so callers can treat a lost race the same
/// way as a failed lookup-before-insert.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_id(&self, id: i64) -> ServiceResult<Option<User>>;

    async fn get_user_by_username(&self, username: &str) -> ServiceResult<Option<User>>;

    async fn create_user(&self, user: CreateUser) -> ServiceResult<User>;

    async fn update_user(&self, user: UpdateUser) -> ServiceResult<User>;
}

/// Repository for user database operations.
pub struct UserRepository {
    /// Shared SQLite connection pool
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository instance.
    ///
    /// # Arguments
    /// * `pool` - SQLite connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    /// Retrieves a user by their unique identifier.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    async fn get_user_by_id(&self, id: i64) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at, updated_at
            FROM users WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        Ok(user)
    }

    /// Retrieves a user by their username.
    ///
    /// # Returns
    /// `Some(User)` if found, `None` otherwise
    async fn get_user_by_username(&self, username: &str) -> ServiceResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, username, password_hash, created_at, updated_at
            FROM users WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(anyhow::Error::from)?;

        Ok(user)
    }

    /// Creates a new user in the database.
    ///
    /// # Returns
    /// The newly created User with all fields populated
    async fn create_user(&self, user: CreateUser) -> ServiceResult<User> {
        let now = Utc::now();

        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (username, password_hash, created_at, updated_at)
            VALUES (?, ?, ?, ?)
            RETURNING id, username, password_hash, created_at, updated_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.username))
    }

    /// Replaces the username and password hash of an existing user.
    ///
    /// # Errors
    /// `ServiceError::NotFound` if no user has the given id
    async fn update_user(&self, user: UpdateUser) -> ServiceResult<User> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = ?, password_hash = ?, updated_at = ?
            WHERE id = ?
            RETURNING id, username, password_hash, created_at, updated_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(Utc::now())
        .bind(user.id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.username))?
        .ok_or_else(|| ServiceError::not_found("User", user.id))
    }
}

fn write_error(error: sqlx::Error, username: &str) -> ServiceError {
    let unique_violation = error
        .as_database_error()
        .is_some_and(|db_error| db_error.is_unique_violation());

    if unique_violation {
        ServiceError::already_exists("User", username)
    } else {
        ServiceError::from(anyhow::Error::from(error))
    }
}
