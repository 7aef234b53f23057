//! Database operations for the `linkedin_posts` table.

use chrono::{DateTime, Utc};
use lipulse_core::TrackedPost;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `linkedin_posts` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: String,
    pub username: String,
    /// When the post was published upstream; drives its refresh tier.
    pub post_created_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_state_id: Option<i64>,
}

impl From<PostRow> for TrackedPost {
    fn from(row: PostRow) -> Self {
        Self {
            id: row.id,
            created_at: row.post_created_at,
        }
    }
}

/// Registers a post under an existing account.
///
/// Returns `true` if a row was inserted, `false` if the post id was already
/// registered.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if `username` is not registered, or
/// [`DbError::Sqlx`] if the query fails.
pub async fn create_post(
    pool: &PgPool,
    username: &str,
    post_id: &str,
    post_created_at: DateTime<Utc>,
) -> Result<bool, DbError> {
    let rows_affected = sqlx::query(
        "INSERT INTO linkedin_posts (id, username, post_created_at) \
         SELECT $1, u.username, $3 \
         FROM linkedin_users u \
         WHERE u.username = $2 \
         ON CONFLICT (id) DO NOTHING",
    )
    .bind(post_id)
    .bind(username)
    .bind(post_created_at)
    .execute(pool)
    .await?
    .rows_affected();

    if rows_affected > 0 {
        return Ok(true);
    }

    // Nothing inserted: either the post already exists or the owner does not.
    if crate::get_user(pool, username).await?.is_none() {
        return Err(DbError::NotFound);
    }
    Ok(false)
}

/// Returns a registered post, or `None` if the id is unknown.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_post(pool: &PgPool, post_id: &str) -> Result<Option<PostRow>, DbError> {
    let row = sqlx::query_as::<_, PostRow>(
        "SELECT id, username, post_created_at, created_at, updated_at, last_state_id \
         FROM linkedin_posts \
         WHERE id = $1",
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Returns every post owned by `username`, newest publication first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_user_posts(pool: &PgPool, username: &str) -> Result<Vec<PostRow>, DbError> {
    let rows = sqlx::query_as::<_, PostRow>(
        "SELECT id, username, post_created_at, created_at, updated_at, last_state_id \
         FROM linkedin_posts \
         WHERE username = $1 \
         ORDER BY post_created_at DESC, id",
    )
    .bind(username)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
