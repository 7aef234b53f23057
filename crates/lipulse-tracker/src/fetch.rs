use std::future::Future;

use lipulse_scraper::{FetchedPage, LinkedInClient, ScraperError};

/// Source of raw analytics pages.
///
/// Implementations perform one request per call and never retry.
pub trait AnalyticsFetcher: Send + Sync {
    /// Page carrying the tracked account's dashboard analytics.
    fn fetch_account_page(&self) -> impl Future<Output = Result<FetchedPage, ScraperError>> + Send;

    /// Page carrying the analytics summary for `post_id`.
    fn fetch_post_page(
        &self,
        post_id: &str,
    ) -> impl Future<Output = Result<FetchedPage, ScraperError>> + Send;
}

impl AnalyticsFetcher for LinkedInClient {
    async fn fetch_account_page(&self) -> Result<FetchedPage, ScraperError> {
        self.fetch_dashboard().await
    }

    async fn fetch_post_page(&self, post_id: &str) -> Result<FetchedPage, ScraperError> {
        self.fetch_post_summary(post_id).await
    }
}
