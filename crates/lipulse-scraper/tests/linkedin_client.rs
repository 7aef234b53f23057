//! Integration tests for `LinkedInClient`.
//!
//! Uses `wiremock` to stand up a local HTTP server for each test so no
//! real network traffic is made.

use serde_json::json;
use wiremock::matchers::{header, header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lipulse_scraper::{extract_account_metrics, LinkedInClient, ScraperError};

const COOKIE: &str = "li_at=AQEDAT; JSESSIONID=\"ajax:123\"";

fn test_client(server: &MockServer) -> LinkedInClient {
    LinkedInClient::with_base_url(COOKIE, 5, "lipulse-test/0.1", &server.uri())
        .expect("failed to build test LinkedInClient")
}

/// Renders a page whose third-from-last `<code>` block carries `payload`.
fn page_with_payload(payload: &serde_json::Value) -> String {
    let escaped = payload.to_string().replace('"', "&quot;");
    format!(
        "<html><body>\
         <code id=\"a\">{{}}</code>\
         <code id=\"b\"><!--{escaped}--></code>\
         <code id=\"c\">{{}}</code>\
         <code id=\"d\">{{}}</code>\
         </body></html>"
    )
}

fn preview(title: &str, value: &str) -> serde_json::Value {
    json!({ "analyticsTitle": { "text": value }, "description": { "text": title } })
}

#[tokio::test]
async fn fetch_dashboard_sends_session_cookie_and_browser_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dashboard/"))
        .and(header("cookie", COOKIE))
        .and(header("dnt", "1"))
        .and(header("accept-language", "en-GB,en-US;q=0.9,en;q=0.8"))
        .and(header("user-agent", "lipulse-test/0.1"))
        .and(header_exists("referer"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_client(&server)
        .fetch_dashboard()
        .await
        .expect("fetch should succeed");

    assert_eq!(page.status, 200);
    assert_eq!(page.body, "<html></html>");
    assert!(page.url.ends_with("/dashboard/"), "got {}", page.url);
}

#[tokio::test]
async fn fetch_post_summary_targets_activity_urn_path() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/analytics/post-summary/urn:li:activity:7230000000000000000/",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&server)
        .await;

    let page = test_client(&server)
        .fetch_post_summary("7230000000000000000")
        .await
        .expect("fetch should succeed");

    assert_eq!(page.ok_body().expect("200 body"), "ok");
}

#[tokio::test]
async fn non_200_status_is_returned_not_raised() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dashboard/"))
        .respond_with(ResponseTemplate::new(403).set_body_string("denied"))
        .mount(&server)
        .await;

    let page = test_client(&server)
        .fetch_dashboard()
        .await
        .expect("transport succeeded");

    assert_eq!(page.status, 403);
    match page.ok_body() {
        Err(ScraperError::UnexpectedStatus { status, url }) => {
            assert_eq!(status, 403);
            assert!(url.ends_with("/dashboard/"));
        }
        other => panic!("expected UnexpectedStatus, got: {other:?}"),
    }
}

#[tokio::test]
async fn base_url_with_trailing_slash_does_not_double_slashes() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/dashboard/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let base = format!("{}/", server.uri());
    let client = LinkedInClient::with_base_url(COOKIE, 5, "ua", &base).expect("client");
    let page = client.fetch_dashboard().await.expect("fetch");
    assert_eq!(page.status, 200);
}

#[tokio::test]
async fn fetched_dashboard_feeds_the_account_extractor() {
    let server = MockServer::start().await;

    let payload = json!({
        "data": { "data": { "feedDashCreatorExperienceDashboard": { "section": [{
            "analyticsSection": { "analyticsPreviews": [
                preview("Followers", "1,204"),
                preview("Profile viewers", "87"),
                preview("Post impressions", "5,310"),
                preview("Search appearances", "42"),
            ]}
        }]}}}
    });

    Mock::given(method("GET"))
        .and(path("/dashboard/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(page_with_payload(&payload)))
        .mount(&server)
        .await;

    let body = test_client(&server)
        .fetch_dashboard()
        .await
        .expect("fetch")
        .ok_body()
        .expect("200");
    let metrics = extract_account_metrics(&body)
        .expect("extract")
        .expect("analytics available");

    assert_eq!(metrics.followers_count, 1204);
    assert_eq!(metrics.profile_views_count, 87);
    assert_eq!(metrics.post_impressions_count, 5310);
    assert_eq!(metrics.search_appears_count, 42);
    assert_eq!(metrics.connections_count, None);
}

#[tokio::test]
async fn connection_failure_is_an_http_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let client = LinkedInClient::with_base_url(COOKIE, 2, "ua", &uri).expect("client");
    let result = client.fetch_dashboard().await;

    assert!(
        matches!(result, Err(ScraperError::Http(_))),
        "expected Http error, got: {result:?}"
    );
}
