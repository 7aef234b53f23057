//! Locating and decoding the JSON application state embedded in a page.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_json::Value;

use crate::error::ExtractError;
use crate::layout::{self, ANALYTICS_UNAVAILABLE_MARKER};

static CODE_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<code\b[^>]*>(.*?)</code>").expect("valid regex"));
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[xX][0-9a-fA-F]{1,6}|#[0-9]{1,7}|[a-zA-Z]{2,8});").expect("valid regex")
});

/// Returns the decoded text of every `<code>` element, in document order.
#[must_use]
pub fn extract_code_blocks(html: &str) -> Vec<String> {
    CODE_BLOCK_RE
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| {
            let inner = m.as_str().trim();
            let inner = inner
                .strip_prefix("<!--")
                .and_then(|s| s.strip_suffix("-->"))
                .unwrap_or(inner);
            decode_entities(inner.trim())
        })
        .collect()
}

/// Decodes the HTML character references LinkedIn uses when it serializes
/// JSON into markup. Unknown named references are left untouched.
#[must_use]
pub fn decode_entities(input: &str) -> String {
    if !input.contains('&') {
        return input.to_string();
    }
    ENTITY_RE
        .replace_all(input, |cap: &Captures<'_>| {
            let body = &cap[1];
            let decoded = if let Some(hex) = body.strip_prefix("#x").or_else(|| body.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
            } else if let Some(dec) = body.strip_prefix('#') {
                dec.parse::<u32>().ok().and_then(char::from_u32)
            } else {
                match body {
                    "quot" => Some('"'),
                    "amp" => Some('&'),
                    "lt" => Some('<'),
                    "gt" => Some('>'),
                    "apos" => Some('\''),
                    "nbsp" => Some('\u{a0}'),
                    _ => None,
                }
            };
            decoded.map_or_else(|| cap[0].to_string(), String::from)
        })
        .into_owned()
}

/// Parses a human-formatted count such as `"1,234"` into an integer.
///
/// Thousands separators and whitespace (including non-breaking spaces) are
/// stripped before parsing. Only unsigned digits are accepted.
#[must_use]
pub fn parse_count(raw: &str) -> Option<i64> {
    let digits: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i64>().ok()
}

/// Runs the shared first half of every extraction: sentinel check, block
/// lookup, JSON parse.
///
/// Returns `Ok(None)` when the page says analytics are unavailable.
pub(crate) fn load_payload(html: &str) -> Result<Option<Value>, ExtractError> {
    if html.contains(ANALYTICS_UNAVAILABLE_MARKER) {
        return Ok(None);
    }

    let blocks = extract_code_blocks(html);
    let raw = layout::data_block(&blocks)?;
    serde_json::from_str(raw)
        .map(Some)
        .map_err(ExtractError::InvalidCredentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_code_blocks_in_order() {
        let html = r#"<html><body>
            <code id="a">first</code>
            <p>noise</p>
            <CODE style="display: none" id="b">
              second
            </CODE>
        </body></html>"#;
        assert_eq!(extract_code_blocks(html), vec!["first", "second"]);
    }

    #[test]
    fn code_blocks_wrapped_in_comments_are_unwrapped() {
        let html = r#"<code id="c"><!--{"a":1}--></code>"#;
        assert_eq!(extract_code_blocks(html), vec![r#"{"a":1}"#]);
    }

    #[test]
    fn decodes_named_and_numeric_entities() {
        assert_eq!(
            decode_entities("{&quot;text&quot;:&quot;R&amp;D &#8211; &#x2713; &lt;3&quot;}"),
            "{\"text\":\"R&D \u{2013} \u{2713} <3\"}"
        );
    }

    #[test]
    fn decoding_is_single_pass() {
        assert_eq!(decode_entities("&amp;quot;"), "&quot;");
    }

    #[test]
    fn unknown_entities_are_left_alone() {
        assert_eq!(decode_entities("a &bogus; b"), "a &bogus; b");
    }

    #[test]
    fn parse_count_strips_separators() {
        assert_eq!(parse_count("1,234"), Some(1_234));
        assert_eq!(parse_count(" 12,345,678 "), Some(12_345_678));
        assert_eq!(parse_count("1\u{a0}234"), Some(1_234));
        assert_eq!(parse_count("0"), Some(0));
    }

    #[test]
    fn parse_count_rejects_non_numeric() {
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("1.2K"), None);
        assert_eq!(parse_count("—"), None);
    }

    #[test]
    fn parse_count_rejects_signed_values() {
        assert_eq!(parse_count("-5"), None);
        assert_eq!(parse_count("+5"), None);
        assert_eq!(parse_count("-1,234"), None);
    }

    #[test]
    fn load_payload_returns_none_for_unavailable_page() {
        let html = "<html><body>Analytics failed to load<code>{}</code></body></html>";
        assert!(load_payload(html).unwrap().is_none());
    }

    #[test]
    fn load_payload_flags_non_json_block_as_credentials() {
        let html = "<code>login</code><code>x</code><code>y</code>";
        let err = load_payload(html).unwrap_err();
        assert!(err.is_fatal(), "expected fatal error, got {err:?}");
    }
}
