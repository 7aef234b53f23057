//! Post metrics from the post summary page.
//!
//! The payload's `included` list carries three independent sub-blocks (see
//! [`IncludedSlot`]). The two metric blocks are required; the commentary
//! block only supplies the post text and may be absent.

use lipulse_core::PostMetrics;
use serde_json::Value;

use crate::embed::{load_payload, parse_count};
use crate::error::ExtractError;
use crate::layout::{self, IncludedSlot};

const KEY_METRIC_ITEMS: &str = "/keyMetrics/items";
const CTA_ITEMS: &str = "/component/summary/detail/ctaList/items";
const COMMENTARY_TEXT: &str = "/commentary/commentaryText/text";

#[derive(Default)]
struct Collected {
    impressions: Option<i64>,
    unique_views: Option<i64>,
    reactions: Option<i64>,
    comments: Option<i64>,
    reposts: Option<i64>,
}

/// Extracts post metrics from a post summary page body.
///
/// Returns `Ok(None)` when the page reports that analytics failed to load,
/// which is what LinkedIn shows for posts the session does not own.
///
/// # Errors
///
/// - [`ExtractError::InvalidCredentials`] if the data block is not JSON.
/// - [`ExtractError::MissingBlock`] / [`ExtractError::UnexpectedShape`] if
///   the page layout does not match.
/// - [`ExtractError::MissingMetric`] / [`ExtractError::InvalidNumber`] for
///   absent or malformed counts.
pub fn extract_post_metrics(html: &str) -> Result<Option<PostMetrics>, ExtractError> {
    let Some(payload) = load_payload(html)? else {
        return Ok(None);
    };

    let mut collected = Collected::default();
    collect_key_metrics(&payload, &mut collected)?;
    collect_call_to_actions(&payload, &mut collected)?;
    let content = commentary_text(&payload);

    Ok(Some(PostMetrics {
        content,
        impressions_count: required(collected.impressions, "impressions")?,
        unique_views_count: required(collected.unique_views, "unique_views")?,
        reactions_count: required(collected.reactions, "reactions")?,
        comments_count: required(collected.comments, "comments")?,
        reposts_count: required(collected.reposts, "reposts")?,
    }))
}

fn collect_key_metrics(payload: &Value, out: &mut Collected) -> Result<(), ExtractError> {
    let block = layout::included_item(payload, IncludedSlot::KeyMetrics)?;
    let base = format!("/included/{}/components", IncludedSlot::KeyMetrics.index());
    let components = block
        .get("components")
        .and_then(Value::as_array)
        .ok_or_else(|| layout::shape(base.clone()))?;

    for (i, component) in components.iter().enumerate() {
        // Components without a summary are layout chrome.
        let Some(summary) = component.get("summary").filter(|s| is_present(s)) else {
            continue;
        };
        let items = layout::at(summary, KEY_METRIC_ITEMS)?
            .as_array()
            .ok_or_else(|| layout::shape(format!("{base}/{i}/summary{KEY_METRIC_ITEMS}")))?;

        for item in items {
            let label = item.pointer("/description/text").and_then(Value::as_str);
            let (slot, metric) = match label {
                Some("Impressions") => (&mut out.impressions, "impressions"),
                Some("Unique views") => (&mut out.unique_views, "unique_views"),
                _ => continue,
            };
            let raw = item
                .pointer("/title/text")
                .and_then(Value::as_str)
                .ok_or(ExtractError::MissingMetric { metric })?;
            *slot = Some(count(raw, metric)?);
        }
    }
    Ok(())
}

fn collect_call_to_actions(payload: &Value, out: &mut Collected) -> Result<(), ExtractError> {
    let block = layout::included_item(payload, IncludedSlot::CallToActions)?;
    let items = layout::at(block, CTA_ITEMS)?.as_array().ok_or_else(|| {
        layout::shape(format!(
            "/included/{}{CTA_ITEMS}",
            IncludedSlot::CallToActions.index()
        ))
    })?;

    for item in items {
        let (slot, metric) = match item.get("title").and_then(Value::as_str) {
            Some("Reactions") => (&mut out.reactions, "reactions"),
            Some("Comments") => (&mut out.comments, "comments"),
            Some("Reposts") => (&mut out.reposts, "reposts"),
            _ => continue,
        };
        let raw = item
            .get("text")
            .and_then(Value::as_str)
            .ok_or(ExtractError::MissingMetric { metric })?;
        *slot = Some(count(raw, metric)?);
    }
    Ok(())
}

fn commentary_text(payload: &Value) -> Option<String> {
    match layout::included_item(payload, IncludedSlot::Commentary) {
        Ok(block) => block
            .pointer(COMMENTARY_TEXT)
            .and_then(Value::as_str)
            .map(str::to_string),
        Err(e) => {
            tracing::debug!(error = %e, "post commentary not found; storing without content");
            None
        }
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Object(map) => !map.is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

fn count(raw: &str, metric: &'static str) -> Result<i64, ExtractError> {
    parse_count(raw).ok_or_else(|| ExtractError::InvalidNumber {
        metric,
        raw: raw.to_string(),
    })
}

fn required(value: Option<i64>, metric: &'static str) -> Result<i64, ExtractError> {
    value.ok_or(ExtractError::MissingMetric { metric })
}

#[cfg(test)]
#[path = "post_test.rs"]
mod tests;
