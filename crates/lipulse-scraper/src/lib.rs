pub mod account;
pub mod client;
pub mod embed;
pub mod error;
pub mod layout;
pub mod post;

pub use account::extract_account_metrics;
pub use client::{FetchedPage, LinkedInClient};
pub use error::{ExtractError, ScraperError};
pub use post::extract_post_metrics;
