//! Authenticated page fetcher for the LinkedIn analytics pages.
//!
//! Issues exactly one GET per call with a fixed browser-like header bundle
//! plus the session cookie. No retries and no backoff: a failed fetch is
//! reported to the caller, which skips the entity until its next due tick.

use std::time::Duration;

use lipulse_core::AppConfig;
use reqwest::header::{self, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Url};

use crate::error::ScraperError;

const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8,application/signed-exchange;v=b3;q=0.7";

/// Static part of the header bundle; `cookie`, `referer` and `user-agent`
/// are added per client.
const BROWSER_HEADERS: &[(&str, &str)] = &[
    ("accept", ACCEPT),
    ("accept-language", "en-GB,en-US;q=0.9,en;q=0.8"),
    ("cache-control", "max-age=0"),
    ("dnt", "1"),
    ("priority", "u=0, i"),
    ("sec-ch-ua", "\"Chromium\";v=\"127\", \"Not)A;Brand\";v=\"99\""),
    ("sec-ch-ua-mobile", "?0"),
    ("sec-ch-ua-platform", "\"macOS\""),
    ("sec-fetch-dest", "document"),
    ("sec-fetch-mode", "navigate"),
    ("sec-fetch-site", "same-origin"),
    ("sec-fetch-user", "?1"),
    ("upgrade-insecure-requests", "1"),
];

/// Raw result of one GET: whatever status the server answered with.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub status: u16,
    pub url: String,
    pub body: String,
}

impl FetchedPage {
    /// Returns the body of a `200 OK` page.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::UnexpectedStatus`] for any other status.
    pub fn ok_body(self) -> Result<String, ScraperError> {
        if self.status == 200 {
            Ok(self.body)
        } else {
            Err(ScraperError::UnexpectedStatus {
                status: self.status,
                url: self.url,
            })
        }
    }
}

/// HTTP client bound to one session cookie and one service origin.
pub struct LinkedInClient {
    client: Client,
    base_url: Url,
}

impl LinkedInClient {
    /// Creates a client from process configuration.
    ///
    /// # Errors
    ///
    /// See [`LinkedInClient::with_base_url`].
    pub fn new(config: &AppConfig) -> Result<Self, ScraperError> {
        Self::with_base_url(
            &config.linkedin_cookies,
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            &config.linkedin_base_url,
        )
    }

    /// Creates a client pointed at an arbitrary origin (wiremock in tests).
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidBaseUrl`] if `base_url` does not parse.
    /// - [`ScraperError::InvalidCookieHeader`] if `cookie` contains bytes not
    ///   allowed in a header value.
    /// - [`ScraperError::Http`] if the `reqwest::Client` cannot be built.
    pub fn with_base_url(
        cookie: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, ScraperError> {
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScraperError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ScraperError::InvalidBaseUrl {
                base_url: base_url.to_string(),
                reason: "URL cannot be used as a base".to_string(),
            });
        }

        let mut headers = HeaderMap::new();
        for (name, value) in BROWSER_HEADERS {
            headers.insert(
                HeaderName::from_static(name),
                HeaderValue::from_static(value),
            );
        }
        let mut cookie =
            HeaderValue::from_str(cookie).map_err(|_| ScraperError::InvalidCookieHeader)?;
        cookie.set_sensitive(true);
        headers.insert(header::COOKIE, cookie);
        if let Ok(referer) = HeaderValue::from_str(base_url.as_str()) {
            headers.insert(header::REFERER, referer);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// `{base}/dashboard/`
    #[must_use]
    pub fn dashboard_url(&self) -> Url {
        self.url_with_segments(&["dashboard", ""])
    }

    /// `{base}/analytics/post-summary/urn:li:activity:{post_id}/`
    #[must_use]
    pub fn post_summary_url(&self, post_id: &str) -> Url {
        let urn = format!("urn:li:activity:{post_id}");
        self.url_with_segments(&["analytics", "post-summary", &urn, ""])
    }

    /// Fetches the creator dashboard that carries account analytics.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] on network, TLS, or body decode failure.
    pub async fn fetch_dashboard(&self) -> Result<FetchedPage, ScraperError> {
        self.fetch(self.dashboard_url()).await
    }

    /// Fetches the analytics summary for one post.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] on network, TLS, or body decode failure.
    pub async fn fetch_post_summary(&self, post_id: &str) -> Result<FetchedPage, ScraperError> {
        self.fetch(self.post_summary_url(post_id)).await
    }

    async fn fetch(&self, url: Url) -> Result<FetchedPage, ScraperError> {
        tracing::debug!(%url, "fetching analytics page");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedPage {
            status,
            url: url.to_string(),
            body,
        })
    }

    fn url_with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // `with_base_url` rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
