//! Positional contract with the analytics pages.
//!
//! The pages do not name their embedded blocks, so every lookup here is by
//! position. All offsets live in this module; when the upstream layout moves,
//! bump [`LAYOUT_VERSION`] and fix the numbers here and nowhere else. Each
//! accessor checks that the addressed item carries the key it is expected to
//! carry and fails with [`ExtractError::UnexpectedShape`] otherwise.

use serde_json::Value;

use crate::error::ExtractError;

/// Identifies the page layout the offsets below were taken from.
pub const LAYOUT_VERSION: &str = "2024-08";

/// Body text LinkedIn renders instead of analytics the viewer may not see.
pub const ANALYTICS_UNAVAILABLE_MARKER: &str = "Analytics failed to load";

/// The analytics payload is the third `<code>` block counted from the end.
pub const DATA_BLOCK_OFFSET_FROM_END: usize = 3;

/// JSON pointer to the dashboard's list of labelled preview items.
pub(crate) const ACCOUNT_PREVIEWS_POINTER: &str =
    "/data/data/feedDashCreatorExperienceDashboard/section/0/analyticsSection/analyticsPreviews";

/// Items of the post summary payload's `included` array that carry metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncludedSlot {
    /// Impressions and unique views.
    KeyMetrics,
    /// Reactions, comments and reposts.
    CallToActions,
    /// The post's own text.
    Commentary,
}

impl IncludedSlot {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::KeyMetrics => 1,
            Self::CallToActions => 2,
            Self::Commentary => 6,
        }
    }

    /// Key that must be present on the item for the slot to be trusted.
    const fn marker(self) -> &'static str {
        match self {
            Self::KeyMetrics => "components",
            Self::CallToActions => "component",
            Self::Commentary => "commentary",
        }
    }
}

/// Picks the analytics data block out of all embedded blocks on a page.
///
/// # Errors
///
/// Returns [`ExtractError::MissingBlock`] when the page has fewer blocks
/// than the contract expects.
pub fn data_block(blocks: &[String]) -> Result<&str, ExtractError> {
    blocks
        .len()
        .checked_sub(DATA_BLOCK_OFFSET_FROM_END)
        .and_then(|i| blocks.get(i))
        .map(String::as_str)
        .ok_or(ExtractError::MissingBlock {
            offset_from_end: DATA_BLOCK_OFFSET_FROM_END,
            found: blocks.len(),
        })
}

/// Returns the `included` item for `slot` after checking its shape.
///
/// # Errors
///
/// Returns [`ExtractError::UnexpectedShape`] if `included` is missing, too
/// short, or the item lacks the slot's marker key.
pub fn included_item(payload: &Value, slot: IncludedSlot) -> Result<&Value, ExtractError> {
    let index = slot.index();
    let item = payload
        .get("included")
        .and_then(Value::as_array)
        .and_then(|items| items.get(index))
        .ok_or_else(|| shape(format!("/included/{index}")))?;

    if item.get(slot.marker()).is_none() {
        return Err(shape(format!("/included/{index}/{}", slot.marker())));
    }
    Ok(item)
}

/// Follows a JSON pointer, failing with the pointer as the error path.
pub(crate) fn at<'a>(value: &'a Value, pointer: &str) -> Result<&'a Value, ExtractError> {
    value.pointer(pointer).ok_or_else(|| shape(pointer.to_string()))
}

pub(crate) fn shape(path: String) -> ExtractError {
    ExtractError::UnexpectedShape { path }
}
