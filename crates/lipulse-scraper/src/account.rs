//! Account metrics from the creator dashboard page.

use lipulse_core::AccountMetrics;
use serde_json::Value;

use crate::embed::{load_payload, parse_count};
use crate::error::ExtractError;
use crate::layout::{self, ACCOUNT_PREVIEWS_POINTER};

/// Dashboard preview labels the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AccountLabel {
    Followers,
    Connections,
    ProfileViewers,
    PostImpressions,
    SearchAppearances,
}

impl AccountLabel {
    fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "Followers" => Some(Self::Followers),
            "Connections" => Some(Self::Connections),
            "Profile viewers" => Some(Self::ProfileViewers),
            "Post impressions" => Some(Self::PostImpressions),
            "Search appearances" => Some(Self::SearchAppearances),
            _ => None,
        }
    }

    const fn metric(self) -> &'static str {
        match self {
            Self::Followers => "followers",
            Self::Connections => "connections",
            Self::ProfileViewers => "profile_views",
            Self::PostImpressions => "post_impressions",
            Self::SearchAppearances => "search_appearances",
        }
    }
}

#[derive(Default)]
struct Collected {
    followers: Option<i64>,
    connections: Option<i64>,
    profile_views: Option<i64>,
    post_impressions: Option<i64>,
    search_appears: Option<i64>,
}

impl Collected {
    fn slot(&mut self, label: AccountLabel) -> &mut Option<i64> {
        match label {
            AccountLabel::Followers => &mut self.followers,
            AccountLabel::Connections => &mut self.connections,
            AccountLabel::ProfileViewers => &mut self.profile_views,
            AccountLabel::PostImpressions => &mut self.post_impressions,
            AccountLabel::SearchAppearances => &mut self.search_appears,
        }
    }

    fn finish(self) -> Result<AccountMetrics, ExtractError> {
        let require = |value: Option<i64>, label: AccountLabel| {
            value.ok_or(ExtractError::MissingMetric {
                metric: label.metric(),
            })
        };
        Ok(AccountMetrics {
            followers_count: require(self.followers, AccountLabel::Followers)?,
            connections_count: self.connections,
            profile_views_count: require(self.profile_views, AccountLabel::ProfileViewers)?,
            post_impressions_count: require(self.post_impressions, AccountLabel::PostImpressions)?,
            search_appears_count: require(self.search_appears, AccountLabel::SearchAppearances)?,
        })
    }
}

/// Extracts account metrics from the dashboard page body.
///
/// Returns `Ok(None)` when the page reports that analytics failed to load.
/// Preview items with labels outside the known vocabulary are logged and
/// skipped. Every metric except connections must be present.
///
/// # Errors
///
/// - [`ExtractError::InvalidCredentials`] if the data block is not JSON.
/// - [`ExtractError::MissingBlock`] / [`ExtractError::UnexpectedShape`] if
///   the page layout does not match.
/// - [`ExtractError::MissingMetric`] / [`ExtractError::InvalidNumber`] for
///   absent or malformed values.
pub fn extract_account_metrics(html: &str) -> Result<Option<AccountMetrics>, ExtractError> {
    let Some(payload) = load_payload(html)? else {
        return Ok(None);
    };

    let previews = layout::at(&payload, ACCOUNT_PREVIEWS_POINTER)?
        .as_array()
        .ok_or_else(|| layout::shape(ACCOUNT_PREVIEWS_POINTER.to_string()))?;

    let mut collected = Collected::default();
    for (i, item) in previews.iter().enumerate() {
        let title = text_at(item, "/description/text")
            .ok_or_else(|| layout::shape(format!("{ACCOUNT_PREVIEWS_POINTER}/{i}/description")))?;

        let Some(label) = AccountLabel::from_label(title) else {
            tracing::warn!(label = title, "unknown label in account analytics; ignoring");
            continue;
        };

        let raw = text_at(item, "/analyticsTitle/text").ok_or(ExtractError::MissingMetric {
            metric: label.metric(),
        })?;
        let value = parse_count(raw).ok_or_else(|| ExtractError::InvalidNumber {
            metric: label.metric(),
            raw: raw.to_string(),
        })?;
        *collected.slot(label) = Some(value);
    }

    collected.finish().map(Some)
}

fn text_at<'a>(item: &'a Value, pointer: &str) -> Option<&'a str> {
    item.pointer(pointer).and_then(Value::as_str)
}

#[cfg(test)]
#[path = "account_test.rs"]
mod tests;
