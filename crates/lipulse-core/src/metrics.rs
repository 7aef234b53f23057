//! Metric records extracted from analytics pages and the snapshots that wrap them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account-level analytics as shown on the creator dashboard.
///
/// `connections_count` is the only optional value: the dashboard does not
/// currently publish it, but the stored schema keeps a column for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMetrics {
    pub followers_count: i64,
    pub connections_count: Option<i64>,
    pub profile_views_count: i64,
    pub post_impressions_count: i64,
    pub search_appears_count: i64,
}

/// Per-post analytics from the post summary page.
///
/// The numeric fields are all-or-nothing; only `content` may be missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostMetrics {
    pub content: Option<String>,
    pub impressions_count: i64,
    pub unique_views_count: i64,
    pub reactions_count: i64,
    pub comments_count: i64,
    pub reposts_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    pub metrics: AccountMetrics,
    pub captured_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSnapshot {
    pub metrics: PostMetrics,
    pub captured_at: DateTime<Utc>,
}

/// A post registered for tracking, as enumerated from storage each tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedPost {
    pub id: String,
    pub created_at: DateTime<Utc>,
}
