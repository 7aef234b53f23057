use lipulse_scraper::ExtractError;
use thiserror::Error;

/// Conditions that stop the refresh loop.
///
/// Failures scoped to one account or post refresh, and sink outages, are
/// logged and skipped and never surface as a `TrackerError`.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("tracked account \"{0}\" is not registered")]
    AccountNotFound(String),

    #[error("session credential rejected: {0}")]
    InvalidCredentials(#[source] ExtractError),
}
