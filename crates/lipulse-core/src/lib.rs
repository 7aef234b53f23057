pub mod app_config;
pub mod config;
pub mod metrics;
pub mod staleness;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use metrics::{AccountMetrics, AccountSnapshot, PostMetrics, PostSnapshot, TrackedPost};
pub use staleness::{account_is_due, is_cold, post_is_due, PostTier};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
