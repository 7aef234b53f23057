mod api;
mod middleware;
mod tracker;

use std::future::IntoFuture;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::{AuthState, RateLimitState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(lipulse_core::load_app_config()?);
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let pool_config = lipulse_db::PoolConfig::from_app_config(&config);
    let pool = lipulse_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = lipulse_db::run_migrations(&pool).await?;
    tracing::info!(applied, "database migrations up to date");

    let auth = AuthState::from_env(matches!(config.env, lipulse_core::Environment::Development))?;
    let rate_limit = RateLimitState::from_app_config(&config);
    let app = build_app(AppState { pool: pool.clone() }, auth, rate_limit);
    let tracker = tracker::spawn_tracker(pool, &config)?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .into_future();

    match tracker {
        Some(handle) => {
            tokio::select! {
                result = server => result?,
                joined = handle => {
                    let error = joined?;
                    anyhow::bail!("background tracker stopped: {error}");
                }
            }
        }
        None => server.await?,
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
