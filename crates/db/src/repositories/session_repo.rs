//! Repository for the `user_sessions` table.
//!
//! Sessions are never updated in place: they are created at login and
//! deleted by logout, revocation, password change or the expiry sweep.

use skinledger_core::types::{DbId, SessionId, Timestamp};

use crate::models::session::{CreateSession, UserSession, ValidSession};
use crate::DbPool;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, user_id, token_fingerprint, expires_at, ip_address, user_agent, created_at";

/// Provides session-store operations.
pub struct SessionRepo;

impl SessionRepo {
    /// Insert a new session, returning the created row.
    pub async fn create(
        pool: &DbPool,
        input: &CreateSession,
        now: Timestamp,
    ) -> Result<UserSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO user_sessions
                (id, user_id, token_fingerprint, expires_at, ip_address, user_agent, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(input.id)
            .bind(input.user_id)
            .bind(&input.token_fingerprint)
            .bind(input.expires_at)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(now)
            .fetch_one(pool)
            .await
    }

    /// Find the unexpired session issued for a token fingerprint.
    ///
    /// The owner's `is_active` flag is joined in so the caller can reject
    /// sessions of disabled users.
    pub async fn find_valid_by_fingerprint(
        pool: &DbPool,
        fingerprint: &str,
        now: Timestamp,
    ) -> Result<Option<ValidSession>, sqlx::Error> {
        sqlx::query_as::<_, ValidSession>(
            "SELECT s.id, s.user_id, s.token_fingerprint, s.expires_at, s.ip_address,
                    s.user_agent, s.created_at, u.is_active AS owner_active
             FROM user_sessions s
             JOIN users u ON u.id = s.user_id
             WHERE s.token_fingerprint = ?1 AND s.expires_at > ?2",
        )
        .bind(fingerprint)
        .bind(now)
        .fetch_optional(pool)
        .await
    }

    /// Find a session by id, but only if it belongs to `user_id`.
    pub async fn find_for_user(
        pool: &DbPool,
        id: SessionId,
        user_id: DbId,
    ) -> Result<Option<UserSession>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_sessions WHERE id = ?1 AND user_id = ?2");
        sqlx::query_as::<_, UserSession>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's unexpired sessions, newest first.
    pub async fn list_active_for_user(
        pool: &DbPool,
        user_id: DbId,
        now: Timestamp,
    ) -> Result<Vec<UserSession>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_sessions
             WHERE user_id = ?1 AND expires_at > ?2
             ORDER BY created_at DESC, rowid DESC"
        );
        sqlx::query_as::<_, UserSession>(&query)
            .bind(user_id)
            .bind(now)
            .fetch_all(pool)
            .await
    }

    /// Delete one session. Deleting an unknown id is not an error.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete_by_id(pool: &DbPool, id: SessionId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE id = ?1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every session for a user. Returns the count of deleted rows.
    pub async fn delete_all_for_user(pool: &DbPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE user_id = ?1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Delete sessions whose `expires_at` is before `now`. Returns the count
    /// of deleted rows.
    pub async fn purge_expired(pool: &DbPool, now: Timestamp) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_sessions WHERE expires_at < ?1")
            .bind(now)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
