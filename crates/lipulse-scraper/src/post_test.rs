use serde_json::{json, Value};

use super::*;

fn key_metric(value: &str, label: &str) -> Value {
    json!({ "title": { "text": value }, "description": { "text": label } })
}

fn cta(label: &str, value: &str) -> Value {
    json!({ "title": label, "text": value })
}

fn payload(key_metrics: &[Value], ctas: &[Value], commentary: Option<&str>) -> Value {
    let mut included = vec![
        json!({ "$type": "com.linkedin.voyager.dash.analytics.Header" }),
        json!({
            "components": [
                { "summary": null },
                { "summary": { "keyMetrics": { "items": key_metrics } } }
            ]
        }),
        json!({
            "component": { "summary": { "detail": { "ctaList": { "items": ctas } } } }
        }),
        json!({}),
        json!({}),
        json!({}),
    ];
    if let Some(text) = commentary {
        included.push(json!({ "commentary": { "commentaryText": { "text": text } } }));
    }
    json!({ "data": {}, "included": included })
}

fn page(payload: &Value) -> String {
    let escaped = payload
        .to_string()
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;");
    format!(
        "<html><body>\
         <code id=\"a\">{escaped}</code>\
         <code id=\"b\">{{}}</code>\
         <code id=\"c\">{{}}</code>\
         </body></html>"
    )
}

fn full_payload() -> Value {
    payload(
        &[
            key_metric("5,432", "Impressions"),
            key_metric("3,210", "Unique views"),
        ],
        &[
            cta("Reactions", "120"),
            cta("Comments", "14"),
            cta("Reposts", "3"),
        ],
        Some("Excited to share <our> launch & more"),
    )
}

#[test]
fn extracts_all_post_metrics() {
    let metrics = extract_post_metrics(&page(&full_payload()))
        .expect("extraction should succeed")
        .expect("analytics should be available");

    assert_eq!(metrics.impressions_count, 5_432);
    assert_eq!(metrics.unique_views_count, 3_210);
    assert_eq!(metrics.reactions_count, 120);
    assert_eq!(metrics.comments_count, 14);
    assert_eq!(metrics.reposts_count, 3);
    assert_eq!(
        metrics.content.as_deref(),
        Some("Excited to share <our> launch & more")
    );
}

#[test]
fn missing_commentary_keeps_numeric_fields() {
    let payload = payload(
        &[
            key_metric("10", "Impressions"),
            key_metric("9", "Unique views"),
        ],
        &[
            cta("Reactions", "1"),
            cta("Comments", "0"),
            cta("Reposts", "0"),
        ],
        None,
    );
    let metrics = extract_post_metrics(&page(&payload)).unwrap().unwrap();
    assert_eq!(metrics.impressions_count, 10);
    assert!(metrics.content.is_none());
}

#[test]
fn missing_reposts_fails_whole_record() {
    let payload = payload(
        &[
            key_metric("10", "Impressions"),
            key_metric("9", "Unique views"),
        ],
        &[cta("Reactions", "1"), cta("Comments", "0")],
        Some("text"),
    );
    let err = extract_post_metrics(&page(&payload)).unwrap_err();
    assert!(matches!(err, ExtractError::MissingMetric { metric: "reposts" }));
}

#[test]
fn unrelated_key_metrics_are_ignored() {
    let payload = payload(
        &[
            key_metric("10", "Impressions"),
            key_metric("n/a", "Members reached"),
            key_metric("9", "Unique views"),
        ],
        &[
            cta("Reactions", "1"),
            cta("Comments", "2"),
            cta("Reposts", "3"),
            cta("Saves", "many"),
        ],
        None,
    );
    let metrics = extract_post_metrics(&page(&payload)).unwrap().unwrap();
    assert_eq!(metrics.unique_views_count, 9);
    assert_eq!(metrics.reposts_count, 3);
}

#[test]
fn shifted_included_list_is_a_shape_error() {
    let mut payload = full_payload();
    let included = payload["included"].as_array_mut().expect("included array");
    included.remove(1);

    let err = extract_post_metrics(&page(&payload)).unwrap_err();
    assert!(
        matches!(err, ExtractError::UnexpectedShape { ref path } if path.starts_with("/included/1")),
        "got {err:?}"
    );
}

#[test]
fn unavailable_sentinel_yields_no_data() {
    let html = "<html><body><div>Analytics failed to load</div>\
                <code>{}</code><code>{}</code><code>{}</code></body></html>";
    assert!(extract_post_metrics(html).unwrap().is_none());
}

#[test]
fn garbage_data_block_is_invalid_credentials() {
    let html = "<code>not json</code><code>{}</code><code>{}</code>";
    let err = extract_post_metrics(html).unwrap_err();
    assert!(err.is_fatal());
}
