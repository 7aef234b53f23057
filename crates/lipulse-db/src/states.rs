//! Database operations for the append-only snapshot tables
//! `linkedin_user_states` and `linkedin_post_states`.
//!
//! Snapshots are never updated or deleted here. Each insert also advances the
//! owner's `last_state_id`, but only when the new snapshot is not older than
//! the one currently referenced, so the pointer never moves backwards.

use chrono::{DateTime, Utc};
use lipulse_core::{AccountMetrics, AccountSnapshot, PostMetrics, PostSnapshot};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `linkedin_user_states` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserStateRow {
    pub id: i64,
    pub username: String,
    pub followers_count: i64,
    pub connections_count: Option<i64>,
    pub profile_views_count: i64,
    pub post_impressions_count: i64,
    pub search_appears_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A row from the `linkedin_post_states` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostStateRow {
    pub id: i64,
    pub post_id: String,
    pub content: Option<String>,
    pub impressions_count: i64,
    pub unique_views_count: i64,
    pub reactions_count: i64,
    pub comments_count: i64,
    pub reposts_count: i64,
    pub created_at: DateTime<Utc>,
}

impl From<UserStateRow> for AccountSnapshot {
    fn from(row: UserStateRow) -> Self {
        Self {
            metrics: AccountMetrics {
                followers_count: row.followers_count,
                connections_count: row.connections_count,
                profile_views_count: row.profile_views_count,
                post_impressions_count: row.post_impressions_count,
                search_appears_count: row.search_appears_count,
            },
            captured_at: row.created_at,
        }
    }
}

impl From<PostStateRow> for PostSnapshot {
    fn from(row: PostStateRow) -> Self {
        Self {
            metrics: PostMetrics {
                content: row.content,
                impressions_count: row.impressions_count,
                unique_views_count: row.unique_views_count,
                reactions_count: row.reactions_count,
                comments_count: row.comments_count,
                reposts_count: row.reposts_count,
            },
            captured_at: row.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// linkedin_user_states operations
// ---------------------------------------------------------------------------

/// Returns the snapshot referenced by the account's `last_state_id`.
///
/// `None` if the account has no snapshots yet or does not exist.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_user_last_state(
    pool: &PgPool,
    username: &str,
) -> Result<Option<UserStateRow>, DbError> {
    let row = sqlx::query_as::<_, UserStateRow>(
        "SELECT s.id, s.username, s.followers_count, s.connections_count, \
                s.profile_views_count, s.post_impressions_count, s.search_appears_count, \
                s.created_at \
         FROM linkedin_users u \
         JOIN linkedin_user_states s ON s.id = u.last_state_id \
         WHERE u.username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Appends an account snapshot captured at `captured_at`.
///
/// The owner row is locked for the duration of the transaction so concurrent
/// writers for the same account serialise on the pointer update.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if `username` is not registered, or
/// [`DbError::Sqlx`] if any statement fails.
pub async fn insert_user_state(
    pool: &PgPool,
    username: &str,
    metrics: &AccountMetrics,
    captured_at: DateTime<Utc>,
) -> Result<UserStateRow, DbError> {
    let mut tx = pool.begin().await?;

    let owner: Option<String> = sqlx::query_scalar(
        "SELECT username FROM linkedin_users WHERE username = $1 FOR UPDATE",
    )
    .bind(username)
    .fetch_optional(&mut *tx)
    .await?;
    if owner.is_none() {
        return Err(DbError::NotFound);
    }

    let row = sqlx::query_as::<_, UserStateRow>(
        "INSERT INTO linkedin_user_states \
             (username, followers_count, connections_count, profile_views_count, \
              post_impressions_count, search_appears_count, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) \
         RETURNING id, username, followers_count, connections_count, profile_views_count, \
                   post_impressions_count, search_appears_count, created_at",
    )
    .bind(username)
    .bind(metrics.followers_count)
    .bind(metrics.connections_count)
    .bind(metrics.profile_views_count)
    .bind(metrics.post_impressions_count)
    .bind(metrics.search_appears_count)
    .bind(captured_at)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE linkedin_users u \
         SET last_state_id = $1, updated_at = NOW() \
         WHERE u.username = $2 \
           AND (u.last_state_id IS NULL \
                OR (SELECT s.created_at FROM linkedin_user_states s \
                    WHERE s.id = u.last_state_id) <= $3)",
    )
    .bind(row.id)
    .bind(username)
    .bind(captured_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}

/// Returns up to `limit` account snapshots, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_user_states(
    pool: &PgPool,
    username: &str,
    limit: i64,
) -> Result<Vec<UserStateRow>, DbError> {
    let rows = sqlx::query_as::<_, UserStateRow>(
        "SELECT id, username, followers_count, connections_count, profile_views_count, \
                post_impressions_count, search_appears_count, created_at \
         FROM linkedin_user_states \
         WHERE username = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(username)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

// ---------------------------------------------------------------------------
// linkedin_post_states operations
// ---------------------------------------------------------------------------

/// Returns the snapshot referenced by the post's `last_state_id`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_post_last_state(
    pool: &PgPool,
    post_id: &str,
) -> Result<Option<PostStateRow>, DbError> {
    let row = sqlx::query_as::<_, PostStateRow>(
        "SELECT s.id, s.post_id, s.content, s.impressions_count, s.unique_views_count, \
                s.reactions_count, s.comments_count, s.reposts_count, s.created_at \
         FROM linkedin_posts p \
         JOIN linkedin_post_states s ON s.id = p.last_state_id \
         WHERE p.id = $1",
    )
    .bind(post_id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Appends a post snapshot captured at `captured_at`.
///
/// # Errors
///
/// Returns [`DbError::NotFound`] if `post_id` is not registered, or
/// [`DbError::Sqlx`] if any statement fails.
pub async fn insert_post_state(
    pool: &PgPool,
    post_id: &str,
    metrics: &PostMetrics,
    captured_at: DateTime<Utc>,
) -> Result<PostStateRow, DbError> {
    let mut tx = pool.begin().await?;

    let owner: Option<String> =
        sqlx::query_scalar("SELECT id FROM linkedin_posts WHERE id = $1 FOR UPDATE")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await?;
    if owner.is_none() {
        return Err(DbError::NotFound);
    }

    let row = sqlx::query_as::<_, PostStateRow>(
        "INSERT INTO linkedin_post_states \
             (post_id, content, impressions_count, unique_views_count, reactions_count, \
              comments_count, reposts_count, created_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id, post_id, content, impressions_count, unique_views_count, \
                   reactions_count, comments_count, reposts_count, created_at",
    )
    .bind(post_id)
    .bind(&metrics.content)
    .bind(metrics.impressions_count)
    .bind(metrics.unique_views_count)
    .bind(metrics.reactions_count)
    .bind(metrics.comments_count)
    .bind(metrics.reposts_count)
    .bind(captured_at)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query(
        "UPDATE linkedin_posts p \
         SET last_state_id = $1, updated_at = NOW() \
         WHERE p.id = $2 \
           AND (p.last_state_id IS NULL \
                OR (SELECT s.created_at FROM linkedin_post_states s \
                    WHERE s.id = p.last_state_id) <= $3)",
    )
    .bind(row.id)
    .bind(post_id)
    .bind(captured_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(row)
}

/// Returns up to `limit` post snapshots, newest first.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_post_states(
    pool: &PgPool,
    post_id: &str,
    limit: i64,
) -> Result<Vec<PostStateRow>, DbError> {
    let rows = sqlx::query_as::<_, PostStateRow>(
        "SELECT id, post_id, content, impressions_count, unique_views_count, \
                reactions_count, comments_count, reposts_count, created_at \
         FROM linkedin_post_states \
         WHERE post_id = $1 \
         ORDER BY created_at DESC, id DESC \
         LIMIT $2",
    )
    .bind(post_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
