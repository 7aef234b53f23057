//! Database operations for the `linkedin_users` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `linkedin_users` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRow {
    pub username: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Latest snapshot in `linkedin_user_states`; `NULL` until the first one.
    pub last_state_id: Option<i64>,
}

/// Registers an account for tracking.
///
/// Returns `true` if a row was inserted, `false` if the username was already
/// registered (the existing row is left untouched).
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn create_user(pool: &PgPool, username: &str) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "INSERT INTO linkedin_users (username) VALUES ($1) \
         ON CONFLICT (username) DO NOTHING",
    )
    .bind(username)
    .execute(pool)
    .await?
    .rows_affected();

    Ok(rows_affected > 0)
}

/// Returns a registered account, or `None` if the username is unknown.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_user(pool: &PgPool, username: &str) -> Result<Option<UserRow>, DbError> {
    let row = sqlx::query_as::<_, UserRow>(
        "SELECT username, name, avatar_url, created_at, updated_at, last_state_id \
         FROM linkedin_users \
         WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
