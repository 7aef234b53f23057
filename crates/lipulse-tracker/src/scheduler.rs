//! Drift-corrected refresh loop.
//!
//! Each tick evaluates the account first and then every non-cold post, one
//! at a time. Fetches are awaited sequentially; the only other suspension
//! point is the sleep between ticks.

use std::convert::Infallible;
use std::time::Duration;

use chrono::{DateTime, Utc};
use lipulse_core::{
    account_is_due, is_cold, post_is_due, AccountSnapshot, PostSnapshot, TrackedPost,
};
use lipulse_scraper::{extract_account_metrics, extract_post_metrics, ExtractError, ScraperError};
use tokio::time::Instant;

use crate::error::TrackerError;
use crate::fetch::AnalyticsFetcher;
use crate::sink::SnapshotSink;

/// What one tick did. Logged at the end of every tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub account_refreshed: bool,
    pub posts_refreshed: usize,
    /// Posts evaluated but not yet due.
    pub posts_not_due: usize,
    pub posts_cold: usize,
    /// Entities whose refresh failed this tick and will be retried later.
    pub failures: usize,
}

/// Result of refreshing a single entity.
enum Refresh {
    NotDue,
    Stored,
    /// Page loaded but analytics are unavailable to this session.
    Unavailable,
    Failed,
}

/// Time left until `deadline`, clamped to zero when work overran the tick.
#[must_use]
pub fn next_sleep(deadline: Instant, now: Instant) -> Duration {
    deadline.saturating_duration_since(now)
}

pub struct Tracker<S, F> {
    sink: S,
    fetcher: F,
    interval: Duration,
}

impl<S, F> Tracker<S, F>
where
    S: SnapshotSink,
    F: AnalyticsFetcher,
{
    #[must_use]
    pub fn new(sink: S, fetcher: F, interval: Duration) -> Self {
        Self {
            sink,
            fetcher,
            interval,
        }
    }

    /// Runs the refresh loop for `account` until a fatal condition occurs.
    ///
    /// The next deadline is fixed when a tick starts, so slow fetches shorten
    /// the following sleep instead of pushing the cadence back.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError`] when the account is not registered or the
    /// session credential is rejected. Sink outages only end the current
    /// tick early.
    pub async fn run(&self, account: &str) -> Result<Infallible, TrackerError> {
        tracing::info!(
            account,
            interval_secs = self.interval.as_secs(),
            "tracker: starting refresh loop"
        );
        loop {
            let deadline = Instant::now() + self.interval;
            let report = self.tick_at(account, Utc::now()).await?;
            tracing::info!(
                account,
                account_refreshed = report.account_refreshed,
                posts_refreshed = report.posts_refreshed,
                posts_not_due = report.posts_not_due,
                posts_cold = report.posts_cold,
                failures = report.failures,
                "tracker: tick complete"
            );
            tokio::time::sleep(next_sleep(deadline, Instant::now())).await;
        }
    }

    /// Performs one tick as of `now`.
    ///
    /// # Errors
    ///
    /// See [`Tracker::run`].
    pub async fn tick_at(
        &self,
        account: &str,
        now: DateTime<Utc>,
    ) -> Result<TickReport, TrackerError> {
        let mut report = TickReport::default();

        match self.sink.account_exists(account).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::error!(account, "tracker: account is not registered");
                return Err(TrackerError::AccountNotFound(account.to_owned()));
            }
            Err(e) => {
                tracing::warn!(account, error = %e, "tracker: could not resolve account; retrying next tick");
                report.failures += 1;
                return Ok(report);
            }
        }

        match self.refresh_account(account, now).await? {
            Refresh::Stored => report.account_refreshed = true,
            Refresh::Failed => report.failures += 1,
            Refresh::NotDue | Refresh::Unavailable => {}
        }

        let posts = match self.sink.list_posts(account).await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::warn!(account, error = %e, "tracker: could not list posts; retrying next tick");
                report.failures += 1;
                return Ok(report);
            }
        };

        for post in &posts {
            if is_cold(now, post.created_at) {
                report.posts_cold += 1;
                continue;
            }
            match self.refresh_post(post, now).await? {
                Refresh::Stored => report.posts_refreshed += 1,
                Refresh::NotDue => report.posts_not_due += 1,
                Refresh::Failed => report.failures += 1,
                Refresh::Unavailable => {}
            }
        }

        Ok(report)
    }

    async fn refresh_account(
        &self,
        account: &str,
        now: DateTime<Utc>,
    ) -> Result<Refresh, TrackerError> {
        let last = match self.sink.get_latest_account_snapshot(account).await {
            Ok(snapshot) => snapshot.map(|s| s.captured_at),
            Err(e) => {
                tracing::warn!(account, error = %e, "tracker: could not read last account snapshot");
                return Ok(Refresh::Failed);
            }
        };
        if !account_is_due(now, last) {
            tracing::debug!(account, "tracker: account not due");
            return Ok(Refresh::NotDue);
        }

        let metrics = match self.fetcher.fetch_account_page().await.and_then(|page| {
            let body = page.ok_body()?;
            Ok(extract_account_metrics(&body)?)
        }) {
            Ok(Some(metrics)) => metrics,
            Ok(None) => {
                tracing::debug!(account, "tracker: account analytics unavailable");
                return Ok(Refresh::Unavailable);
            }
            Err(e) => return skip_or_abort(e, "account", account),
        };

        let snapshot = AccountSnapshot {
            metrics,
            captured_at: now,
        };
        if let Err(e) = self.sink.append_account_snapshot(account, &snapshot).await {
            tracing::warn!(account, error = %e, "tracker: failed to store account snapshot");
            return Ok(Refresh::Failed);
        }
        tracing::info!(
            account,
            followers = snapshot.metrics.followers_count,
            "tracker: stored account snapshot"
        );
        Ok(Refresh::Stored)
    }

    async fn refresh_post(
        &self,
        post: &TrackedPost,
        now: DateTime<Utc>,
    ) -> Result<Refresh, TrackerError> {
        let post_id = post.id.as_str();
        let last = match self.sink.get_latest_post_snapshot(post_id).await {
            Ok(snapshot) => snapshot.map(|s| s.captured_at),
            Err(e) => {
                tracing::warn!(post = post_id, error = %e, "tracker: could not read last post snapshot");
                return Ok(Refresh::Failed);
            }
        };
        if !post_is_due(now, post.created_at, last) {
            tracing::debug!(post = post_id, "tracker: post not due");
            return Ok(Refresh::NotDue);
        }

        let metrics = match self.fetcher.fetch_post_page(post_id).await.and_then(|page| {
            let body = page.ok_body()?;
            Ok(extract_post_metrics(&body)?)
        }) {
            Ok(Some(metrics)) => metrics,
            Ok(None) => {
                tracing::debug!(post = post_id, "tracker: post analytics unavailable");
                return Ok(Refresh::Unavailable);
            }
            Err(e) => return skip_or_abort(e, "post", post_id),
        };

        let snapshot = PostSnapshot {
            metrics,
            captured_at: now,
        };
        if let Err(e) = self.sink.append_post_snapshot(post_id, &snapshot).await {
            tracing::warn!(post = post_id, error = %e, "tracker: failed to store post snapshot");
            return Ok(Refresh::Failed);
        }
        tracing::info!(
            post = post_id,
            impressions = snapshot.metrics.impressions_count,
            "tracker: stored post snapshot"
        );
        Ok(Refresh::Stored)
    }
}

/// Rejected credentials end the loop; anything else skips the entity.
fn skip_or_abort(error: ScraperError, kind: &str, id: &str) -> Result<Refresh, TrackerError> {
    match error {
        ScraperError::Extract(e @ ExtractError::InvalidCredentials(_)) => {
            tracing::error!(kind, id, error = %e, "tracker: session credential rejected");
            Err(TrackerError::InvalidCredentials(e))
        }
        other => {
            tracing::warn!(kind, id, error = %other, "tracker: refresh failed; will retry when due");
            Ok(Refresh::Failed)
        }
    }
}

#[cfg(test)]
#[path = "scheduler_test.rs"]
mod tests;
