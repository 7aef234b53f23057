use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("session cookie is not a valid header value")]
    InvalidCookieHeader,

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl ScraperError {
    /// Whether the error means no later request can succeed either.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Extract(e) if e.is_fatal())
    }
}

/// Failures while turning an analytics page into a metrics record.
///
/// The "Analytics failed to load" page is not represented here: extractors
/// report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("expected at least {offset_from_end} embedded data blocks, found {found}")]
    MissingBlock { offset_from_end: usize, found: usize },

    /// The data block exists but is not JSON. This is what a page rendered
    /// for a rejected session looks like.
    #[error("embedded data block is not JSON; the session cookies are probably invalid")]
    InvalidCredentials(#[source] serde_json::Error),

    #[error("unexpected page structure at {path}")]
    UnexpectedShape { path: String },

    #[error("metric \"{metric}\" missing from page")]
    MissingMetric { metric: &'static str },

    #[error("metric \"{metric}\" has non-numeric value \"{raw}\"")]
    InvalidNumber { metric: &'static str, raw: String },
}

impl ExtractError {
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::InvalidCredentials(_))
    }
}
