use std::{sync::Arc, time::Duration};

use axum::{
    extract::{Request, State},
    http::{
        header::{AUTHORIZATION, RETRY_AFTER},
        HeaderValue,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use lipulse_core::AppConfig;
use subtle::{Choice, ConstantTimeEq};
use tokio::{sync::Mutex, time::Instant};
use uuid::Uuid;

use crate::api::ApiError;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest caller-supplied request ID echoed back verbatim.
const MAX_REQUEST_ID_LEN: usize = 128;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

/// API key auth settings used by middleware.
#[derive(Debug, Clone)]
pub struct AuthState {
    api_keys: Arc<Vec<String>>,
    pub enabled: bool,
}

impl AuthState {
    /// Builds auth config from `LIPULSE_API_KEYS` (comma-separated bearer tokens).
    ///
    /// In development, empty/missing keys disable auth for local iteration.
    /// In non-development envs, empty/missing keys fail startup.
    pub fn from_env(is_development: bool) -> anyhow::Result<Self> {
        let raw = std::env::var("LIPULSE_API_KEYS").unwrap_or_default();
        Self::from_raw(&raw, is_development)
    }

    pub fn from_raw(raw: &str, is_development: bool) -> anyhow::Result<Self> {
        let mut keys: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        keys.sort();
        keys.dedup();

        if keys.is_empty() {
            if is_development {
                tracing::warn!(
                    "LIPULSE_API_KEYS not set; bearer auth disabled in development environment"
                );
                return Ok(Self {
                    api_keys: Arc::new(Vec::new()),
                    enabled: false,
                });
            }

            anyhow::bail!(
                "LIPULSE_API_KEYS is required outside development; provide comma-separated bearer tokens"
            );
        }

        Ok(Self {
            api_keys: Arc::new(keys),
            enabled: true,
        })
    }

    /// Compares against every configured key without short-circuiting.
    fn allows(&self, token: &str) -> bool {
        let matched = self
            .api_keys
            .iter()
            .fold(Choice::from(0), |acc, key| {
                acc | key.as_bytes().ct_eq(token.as_bytes())
            });
        matched.into()
    }
}

#[derive(Debug)]
struct Window {
    started_at: Instant,
    count: u32,
}

/// Fixed-window request budget shared by every protected route.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: u32,
    window: Duration,
    current: Arc<Mutex<Window>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            current: Arc::new(Mutex::new(Window {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self::new(
            config.api_rate_limit_requests,
            Duration::from_secs(config.api_rate_limit_window_secs),
        )
    }

    /// Counts one request. Returns the time until the window resets when the
    /// budget is already spent.
    async fn admit(&self) -> Result<(), Duration> {
        let mut current = self.current.lock().await;
        let now = Instant::now();
        if now.saturating_duration_since(current.started_at) >= self.window {
            current.started_at = now;
            current.count = 0;
        }

        if current.count >= self.max_requests {
            let resets_at = current.started_at + self.window;
            return Err(resets_at.saturating_duration_since(now));
        }
        current.count += 1;
        Ok(())
    }
}

/// Uses the caller's `x-request-id` when it is short printable ASCII and
/// generates a `UUIDv4` otherwise. The ID lands in request extensions as
/// [`RequestId`] and is echoed on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| is_acceptable_request_id(v))
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, val);
    }

    res
}

/// Middleware enforcing Bearer token auth when enabled.
pub async fn require_bearer_auth(
    State(auth): State<AuthState>,
    req: Request,
    next: Next,
) -> Response {
    if !auth.enabled {
        return next.run(req).await;
    }

    match extract_bearer_token(req.headers().get(AUTHORIZATION)) {
        Some(token) if auth.allows(token) => next.run(req).await,
        _ => {
            let rid = request_id_of(&req);
            tracing::debug!(request_id = %rid, path = %req.uri().path(), "api: rejected bearer token");
            ApiError::new(rid, "unauthorized", "missing or invalid bearer token").into_response()
        }
    }
}

/// Middleware enforcing the fixed request-per-window budget.
///
/// Rejections carry `Retry-After` in whole seconds, rounded up.
pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    match rate_limit.admit().await {
        Ok(()) => next.run(req).await,
        Err(retry_in) => {
            let rid = request_id_of(&req);
            let retry_secs = retry_in.as_secs() + u64::from(retry_in.subsec_nanos() > 0);
            tracing::warn!(request_id = %rid, retry_secs, "api: rate limit exceeded");
            let mut res =
                ApiError::new(rid, "rate_limited", "rate limit exceeded").into_response();
            res.headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(retry_secs.max(1)));
            res
        }
    }
}

fn request_id_of(req: &Request) -> String {
    req.extensions()
        .get::<RequestId>()
        .map_or_else(|| Uuid::new_v4().to_string(), |id| id.0.clone())
}

fn is_acceptable_request_id(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|b| b.is_ascii_graphic())
}

fn extract_bearer_token(value: Option<&HeaderValue>) -> Option<&str> {
    value
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|s| !s.trim().is_empty())
}
