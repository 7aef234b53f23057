use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

const DEFAULT_BASE_URL: &str = "https://www.linkedin.com";

const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/127.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` instead of `set_var`/`remove_var`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let linkedin_cookies = require("LINKEDIN_COOKIES")?;

    let env = parse_environment(&or_default("LIPULSE_ENV", "development"))?;

    let bind_addr = or_default("LIPULSE_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| invalid("LIPULSE_BIND_ADDR", e.to_string()))?;
    let log_level = or_default("LIPULSE_LOG_LEVEL", "info");

    let linkedin_base_url = or_default("LIPULSE_BASE_URL", DEFAULT_BASE_URL)
        .trim_end_matches('/')
        .to_string();
    if !linkedin_base_url.starts_with("http://") && !linkedin_base_url.starts_with("https://") {
        return Err(invalid(
            "LIPULSE_BASE_URL",
            format!("expected an http(s) origin, got \"{linkedin_base_url}\""),
        ));
    }

    let tracked_account = lookup("LIPULSE_TRACKED_ACCOUNT")
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let tick_interval_secs = parse_u64("LIPULSE_TICK_INTERVAL_SECS", "60")?;
    if tick_interval_secs == 0 {
        return Err(invalid(
            "LIPULSE_TICK_INTERVAL_SECS",
            "tick interval must be greater than zero".to_string(),
        ));
    }

    let db_max_connections = parse_u32("LIPULSE_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("LIPULSE_DB_MIN_CONNECTIONS", "1")?;
    if db_min_connections > db_max_connections {
        return Err(invalid(
            "LIPULSE_DB_MIN_CONNECTIONS",
            format!("{db_min_connections} exceeds LIPULSE_DB_MAX_CONNECTIONS={db_max_connections}"),
        ));
    }
    let db_acquire_timeout_secs = parse_u64("LIPULSE_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("LIPULSE_REQUEST_TIMEOUT_SECS", "30")?;
    if scraper_request_timeout_secs == 0 {
        return Err(invalid(
            "LIPULSE_REQUEST_TIMEOUT_SECS",
            "request timeout must be greater than zero".to_string(),
        ));
    }
    let scraper_user_agent = or_default("LIPULSE_USER_AGENT", DEFAULT_USER_AGENT);

    let api_rate_limit_requests = parse_u32("LIPULSE_API_RATE_LIMIT", "120")?;
    if api_rate_limit_requests == 0 {
        return Err(invalid(
            "LIPULSE_API_RATE_LIMIT",
            "rate limit must allow at least one request".to_string(),
        ));
    }
    let api_rate_limit_window_secs = parse_u64("LIPULSE_API_RATE_WINDOW_SECS", "60")?;
    if api_rate_limit_window_secs == 0 {
        return Err(invalid(
            "LIPULSE_API_RATE_WINDOW_SECS",
            "rate limit window must be greater than zero".to_string(),
        ));
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        linkedin_cookies,
        linkedin_base_url,
        tracked_account,
        tick_interval_secs,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        api_rate_limit_requests,
        api_rate_limit_window_secs,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LIPULSE_ENV".to_string(),
            reason: format!("expected development, test, or production; got \"{other}\""),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
