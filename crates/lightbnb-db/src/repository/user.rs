//! # User Repository
//!
//! Lookup and registration of users.

use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use lightbnb_core::validation::validate_new_user;
use lightbnb_core::{NewUser, User};

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by email (exact match).
    ///
    /// ## Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No user with that email
    pub async fn get_by_email(&self, email: &str) -> DbResult<Option<User>> {
        debug!(email = %email, "Fetching user by email");

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE email = ?1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<User>> {
        debug!(id = %id, "Fetching user by id");

        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, name, email, password
            FROM users
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Registers a new user.
    ///
    /// ## Returns
    /// * `Ok(User)` - The stored row, including its id
    /// * `Err(DbError::Validation)` - Missing name/password or malformed email
    /// * `Err(DbError::UniqueViolation)` - Email already registered
    pub async fn insert(&self, user: &NewUser) -> DbResult<User> {
        Self::insert_with(&self.pool, user).await
    }

    /// [`insert`](Self::insert) on any executor, e.g. an open transaction.
    pub async fn insert_with<'e, E>(executor: E, user: &NewUser) -> DbResult<User>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        validate_new_user(user)?;

        debug!(email = %user.email, "Inserting user");

        let created = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (name, password, email)
            VALUES (?1, ?2, ?3)
            RETURNING id, name, email, password
            "#,
        )
        .bind(user.name.trim())
        .bind(&user.password)
        .bind(user.email.trim())
        .fetch_one(executor)
        .await?;

        Ok(created)
    }

    /// Counts registered users (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
