//! Background refresh loop for the configured account.

use std::time::Duration;

use lipulse_core::AppConfig;
use lipulse_scraper::LinkedInClient;
use lipulse_tracker::{PgSink, Tracker, TrackerError};
use sqlx::PgPool;
use tokio::task::JoinHandle;

/// Spawns the tracker for `config.tracked_account`.
///
/// Returns `None` when no account is configured. The task only completes when
/// the loop hits a fatal condition, and yields that condition.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built from `config`.
pub fn spawn_tracker(
    pool: PgPool,
    config: &AppConfig,
) -> anyhow::Result<Option<JoinHandle<TrackerError>>> {
    let Some(account) = config.tracked_account.clone() else {
        tracing::info!("LIPULSE_TRACKED_ACCOUNT not set; background tracker disabled");
        return Ok(None);
    };

    let client = LinkedInClient::new(config)?;
    let tracker = Tracker::new(
        PgSink::new(pool),
        client,
        Duration::from_secs(config.tick_interval_secs),
    );

    let handle = tokio::spawn(async move {
        match tracker.run(&account).await {
            Err(e) => {
                tracing::error!(account = %account, error = %e, "tracker stopped");
                e
            }
            Ok(never) => match never {},
        }
    });
    Ok(Some(handle))
}
