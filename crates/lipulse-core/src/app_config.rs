use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-wide configuration, built once at startup and shared behind `Arc`.
#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Raw `cookie` header value for the owned account's browser session.
    pub linkedin_cookies: String,
    pub linkedin_base_url: String,
    /// Account the server tracks in the background. `None` disables tracking.
    pub tracked_account: Option<String>,
    pub tick_interval_secs: u64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
    pub scraper_request_timeout_secs: u64,
    pub scraper_user_agent: String,
    /// Requests allowed per window across the protected API routes.
    pub api_rate_limit_requests: u32,
    pub api_rate_limit_window_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("linkedin_cookies", &"[redacted]")
            .field("linkedin_base_url", &self.linkedin_base_url)
            .field("tracked_account", &self.tracked_account)
            .field("tick_interval_secs", &self.tick_interval_secs)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .field(
                "scraper_request_timeout_secs",
                &self.scraper_request_timeout_secs,
            )
            .field("scraper_user_agent", &self.scraper_user_agent)
            .field("api_rate_limit_requests", &self.api_rate_limit_requests)
            .field("api_rate_limit_window_secs", &self.api_rate_limit_window_secs)
            .finish()
    }
}
