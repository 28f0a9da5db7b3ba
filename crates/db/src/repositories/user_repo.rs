//! Repository for the `users` table.
//!
//! `username` and `email` carry `COLLATE NOCASE`, so every equality test
//! against them below is case-insensitive.

use skinledger_core::types::{DbId, Timestamp};

use crate::models::user::{CreateUser, FailedLogin, UpdateProfile, User};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, email, password_hash, full_name, is_active, \
                       login_attempts, locked_until, last_login, created_at, updated_at";

/// Provides credential-store operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A username or email collision surfaces as a unique-violation database
    /// error from the `uq_users_*` indexes.
    pub async fn create(
        pool: &DbPool,
        input: &CreateUser,
        now: Timestamp,
    ) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, email, password_hash, full_name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.full_name)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID, active or not.
    pub async fn find_by_id(pool: &DbPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = ?1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active user whose username or email matches `identifier`.
    ///
    /// A username match wins over an email match when both exist.
    pub async fn find_active_by_username_or_email(
        pool: &DbPool,
        identifier: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM users
             WHERE (username = ?1 OR email = ?1) AND is_active = 1
             ORDER BY CASE WHEN username = ?1 THEN 0 ELSE 1 END
             LIMIT 1"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(identifier)
            .fetch_optional(pool)
            .await
    }

    /// Whether any user, active or not, already holds `username` or `email`.
    pub async fn exists_by_username_or_email(
        pool: &DbPool,
        username: &str,
        email: &str,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM users WHERE username = ?1 OR email = ?2 LIMIT 1")
                .bind(username)
                .bind(email)
                .fetch_optional(pool)
                .await?;
        Ok(row.is_some())
    }

    /// Whether a user other than `id` holds `email`.
    pub async fn email_taken_by_other(
        pool: &DbPool,
        email: &str,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM users WHERE email = ?1 AND id != ?2 LIMIT 1")
                .bind(email)
                .bind(id)
                .fetch_optional(pool)
                .await?;
        Ok(row.is_some())
    }

    /// Record a wrong password in one atomic statement.
    ///
    /// Increments `login_attempts` (restarting at 1 if an earlier lock has
    /// already lapsed at `now`) and sets `locked_until = lock_until` when the
    /// new count reaches `max_attempts`. Concurrent failures against the same
    /// row are serialized by the write lock, so no increment is lost.
    ///
    /// A row still locked at `now` is left untouched, so failures that raced
    /// past an earlier lock check neither count nor move the deadline.
    ///
    /// Returns `None` if the user no longer exists or is locked.
    pub async fn record_failed_login(
        pool: &DbPool,
        id: DbId,
        max_attempts: i64,
        lock_until: Timestamp,
        now: Timestamp,
    ) -> Result<Option<FailedLogin>, sqlx::Error> {
        sqlx::query_as::<_, FailedLogin>(
            "UPDATE users SET
                login_attempts = CASE
                    WHEN locked_until IS NOT NULL AND locked_until <= ?2 THEN 1
                    ELSE login_attempts + 1
                END,
                locked_until = CASE
                    WHEN (CASE
                            WHEN locked_until IS NOT NULL AND locked_until <= ?2 THEN 1
                            ELSE login_attempts + 1
                          END) >= ?3 THEN ?4
                    ELSE NULL
                END,
                updated_at = ?2
             WHERE id = ?1 AND (locked_until IS NULL OR locked_until <= ?2)
             RETURNING login_attempts, locked_until",
        )
        .bind(id)
        .bind(now)
        .bind(max_attempts)
        .bind(lock_until)
        .fetch_optional(pool)
        .await
    }

    /// Record a successful login: reset `login_attempts` to 0, clear
    /// `locked_until`, and stamp `last_login`.
    pub async fn record_successful_login(
        pool: &DbPool,
        id: DbId,
        now: Timestamp,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                login_attempts = 0,
                locked_until = NULL,
                last_login = ?2,
                updated_at = ?2
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Update a user's password hash. Returns `true` if the row was updated.
    pub async fn update_password(
        pool: &DbPool,
        id: DbId,
        password_hash: &str,
        now: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE users SET password_hash = ?2, updated_at = ?3 WHERE id = ?1")
                .bind(id)
                .bind(password_hash)
                .bind(now)
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a profile update. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update_profile(
        pool: &DbPool,
        id: DbId,
        input: &UpdateProfile,
        now: Timestamp,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                full_name = COALESCE(?2, full_name),
                email = COALESCE(?3, email),
                updated_at = ?4
             WHERE id = ?1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.full_name)
            .bind(&input.email)
            .bind(now)
            .fetch_optional(pool)
            .await
    }

    /// Disable a user by setting `is_active = false`.
    ///
    /// Returns `true` if the row was updated.
    pub async fn deactivate(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET is_active = 0 WHERE id = ?1 AND is_active = 1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Hard-delete a user. Their sessions go with them via `ON DELETE CASCADE`.
    pub async fn delete(pool: &DbPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
