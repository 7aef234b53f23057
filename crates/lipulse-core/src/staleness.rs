//! Refresh policy deciding when an account or post is due for a new snapshot.
//!
//! Every function here is pure: callers pass `now` and the time of the most
//! recent stored snapshot, nothing is cached between calls.
//!
//! NOTE: the 24h-7d tier refreshes every 60 hours while the older 7d-14d tier
//! refreshes every 6 hours. The wider window on the younger tier looks like an
//! inversion in the upstream policy; it is kept as-is until the owner
//! confirms the intended ordering.

use chrono::{DateTime, TimeDelta, Utc};

/// Accounts are refreshed once the last snapshot is older than this.
pub const ACCOUNT_REFRESH_SECS: i64 = 60 * 60;

/// Posts at least this old are cold and never polled again.
pub const COLD_POST_AGE_DAYS: i64 = 14;

/// Age bucket of a post, ordered from most to least urgent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostTier {
    /// Younger than one hour.
    Fresh,
    /// One hour up to one day.
    Recent,
    /// One day up to seven days.
    Week,
    /// Seven days up to fourteen days.
    Fortnight,
    /// Fourteen days or older.
    Cold,
}

impl PostTier {
    /// Buckets a post by its age. Negative ages (clock skew, future-dated
    /// registrations) fall into [`PostTier::Fresh`].
    #[must_use]
    pub fn for_age(age: TimeDelta) -> Self {
        if age < TimeDelta::hours(1) {
            Self::Fresh
        } else if age < TimeDelta::hours(24) {
            Self::Recent
        } else if age < TimeDelta::days(7) {
            Self::Week
        } else if age < TimeDelta::days(COLD_POST_AGE_DAYS) {
            Self::Fortnight
        } else {
            Self::Cold
        }
    }

    /// Maximum snapshot age before a post in this tier is due, or `None` for
    /// cold posts.
    #[must_use]
    pub fn refresh_window(self) -> Option<TimeDelta> {
        match self {
            Self::Fresh => Some(TimeDelta::minutes(1)),
            Self::Recent => Some(TimeDelta::minutes(5)),
            Self::Week => Some(TimeDelta::hours(60)),
            Self::Fortnight => Some(TimeDelta::hours(6)),
            Self::Cold => None,
        }
    }
}

/// Window after which an account snapshot is stale.
#[must_use]
pub fn account_refresh_window() -> TimeDelta {
    TimeDelta::seconds(ACCOUNT_REFRESH_SECS)
}

/// `true` once a post has aged past the polling cutoff.
#[must_use]
pub fn is_cold(now: DateTime<Utc>, created_at: DateTime<Utc>) -> bool {
    PostTier::for_age(now - created_at) == PostTier::Cold
}

/// An account is due when it has never been captured or its latest snapshot
/// is older than [`account_refresh_window`].
#[must_use]
pub fn account_is_due(now: DateTime<Utc>, last_captured_at: Option<DateTime<Utc>>) -> bool {
    is_stale(now, last_captured_at, account_refresh_window())
}

/// A post is due when it is not cold and either has no snapshot yet or its
/// latest snapshot is older than its tier's window. Cold posts are never due,
/// even without any snapshot.
#[must_use]
pub fn post_is_due(
    now: DateTime<Utc>,
    created_at: DateTime<Utc>,
    last_captured_at: Option<DateTime<Utc>>,
) -> bool {
    match PostTier::for_age(now - created_at).refresh_window() {
        Some(window) => is_stale(now, last_captured_at, window),
        None => false,
    }
}

fn is_stale(now: DateTime<Utc>, last: Option<DateTime<Utc>>, window: TimeDelta) -> bool {
    last.is_none_or(|captured_at| now - captured_at > window)
}
