//! Storage seam for the refresh loop.

use std::future::Future;

use lipulse_core::{AccountSnapshot, PostSnapshot, TrackedPost};
use lipulse_db::DbError;
use sqlx::PgPool;

/// Snapshot history the tracker reads from and appends to.
///
/// Implementations must be read-after-write consistent for the latest
/// snapshot of an entity from the point of view of one process.
pub trait SnapshotSink: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn account_exists(&self, account: &str)
        -> impl Future<Output = Result<bool, Self::Error>> + Send;

    fn get_latest_account_snapshot(
        &self,
        account: &str,
    ) -> impl Future<Output = Result<Option<AccountSnapshot>, Self::Error>> + Send;

    fn get_latest_post_snapshot(
        &self,
        post_id: &str,
    ) -> impl Future<Output = Result<Option<PostSnapshot>, Self::Error>> + Send;

    fn append_account_snapshot(
        &self,
        account: &str,
        snapshot: &AccountSnapshot,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    fn append_post_snapshot(
        &self,
        post_id: &str,
        snapshot: &PostSnapshot,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Every post registered under `account`, cold ones included.
    fn list_posts(
        &self,
        account: &str,
    ) -> impl Future<Output = Result<Vec<TrackedPost>, Self::Error>> + Send;
}

/// [`SnapshotSink`] backed by the Postgres tables in `lipulse-db`.
#[derive(Debug, Clone)]
pub struct PgSink {
    pool: PgPool,
}

impl PgSink {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl SnapshotSink for PgSink {
    type Error = DbError;

    async fn account_exists(&self, account: &str) -> Result<bool, DbError> {
        Ok(lipulse_db::get_user(&self.pool, account).await?.is_some())
    }

    async fn get_latest_account_snapshot(
        &self,
        account: &str,
    ) -> Result<Option<AccountSnapshot>, DbError> {
        let row = lipulse_db::get_user_last_state(&self.pool, account).await?;
        Ok(row.map(AccountSnapshot::from))
    }

    async fn get_latest_post_snapshot(&self, post_id: &str) -> Result<Option<PostSnapshot>, DbError> {
        let row = lipulse_db::get_post_last_state(&self.pool, post_id).await?;
        Ok(row.map(PostSnapshot::from))
    }

    async fn append_account_snapshot(
        &self,
        account: &str,
        snapshot: &AccountSnapshot,
    ) -> Result<(), DbError> {
        lipulse_db::insert_user_state(&self.pool, account, &snapshot.metrics, snapshot.captured_at)
            .await?;
        Ok(())
    }

    async fn append_post_snapshot(
        &self,
        post_id: &str,
        snapshot: &PostSnapshot,
    ) -> Result<(), DbError> {
        lipulse_db::insert_post_state(&self.pool, post_id, &snapshot.metrics, snapshot.captured_at)
            .await?;
        Ok(())
    }

    async fn list_posts(&self, account: &str) -> Result<Vec<TrackedPost>, DbError> {
        let rows = lipulse_db::list_user_posts(&self.pool, account).await?;
        Ok(rows.into_iter().map(TrackedPost::from).collect())
    }
}
