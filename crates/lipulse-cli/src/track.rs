//! Account and post registration plus the foreground refresh loop.

use std::time::Duration;

use anyhow::Context;
use chrono::{DateTime, Utc};
use lipulse_core::AppConfig;
use lipulse_db::DbError;
use lipulse_scraper::LinkedInClient;
use lipulse_tracker::{PgSink, Tracker};
use sqlx::PgPool;

pub(crate) async fn add_user(pool: &PgPool, username: &str) -> anyhow::Result<()> {
    let username = username.trim();
    anyhow::ensure!(!username.is_empty(), "username must not be empty");

    if lipulse_db::create_user(pool, username).await? {
        tracing::info!(user = username, "registered account");
        println!("registered account '{username}'");
    } else {
        println!("account '{username}' is already registered");
    }
    Ok(())
}

pub(crate) async fn add_post(
    pool: &PgPool,
    username: &str,
    post_id: &str,
    created_at: DateTime<Utc>,
) -> anyhow::Result<()> {
    let post_id = post_id.trim();
    anyhow::ensure!(!post_id.is_empty(), "post id must not be empty");

    match lipulse_db::create_post(pool, username, post_id, created_at).await {
        Ok(true) => {
            tracing::info!(user = username, post = post_id, %created_at, "registered post");
            println!("registered post {post_id} for '{username}'");
            Ok(())
        }
        Ok(false) => {
            println!("post {post_id} is already registered");
            Ok(())
        }
        Err(DbError::NotFound) => {
            anyhow::bail!("account '{username}' is not registered; run add-user first")
        }
        Err(e) => Err(e).context("failed to register post"),
    }
}

/// Runs the tracker until Ctrl-C or a fatal condition.
pub(crate) async fn analyze(pool: PgPool, config: &AppConfig, username: &str) -> anyhow::Result<()> {
    let client = LinkedInClient::new(config)?;
    let tracker = Tracker::new(
        PgSink::new(pool),
        client,
        Duration::from_secs(config.tick_interval_secs),
    );

    tokio::select! {
        result = tracker.run(username) => match result {
            Err(e) => Err(e).context("refresh loop stopped"),
            Ok(never) => match never {},
        },
        signal = tokio::signal::ctrl_c() => {
            signal.context("failed to listen for ctrl-c")?;
            tracing::info!("interrupted; stopping refresh loop");
            Ok(())
        }
    }
}
