//! Crawler module for page fetching and catalog extraction
//!
//! This module contains the core crawling logic, including:
//! - Page retrieval behind the [`PageSource`] seam
//! - Category discovery from the sidebar
//! - Paginated listing walks
//! - Book detail extraction
//! - Overall crawl coordination

mod categories;
mod coordinator;
mod detail;
mod fetcher;
#[cfg(test)]
mod fixture;
mod listing;

pub use categories::{discover_categories, parse_categories};
pub use coordinator::{run_crawl, Coordinator, FALLBACK_CATEGORY_NAME};
pub use detail::{extract_detail, parse_product};
pub use fetcher::{build_http_client, decode_utf8, HttpFetcher, PageSource};
#[cfg(test)]
pub(crate) use fixture::FixtureSource;
pub use listing::{discover_category_links, parse_listing, ListingPage, ListingPages};

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for a full-site crawl. It will:
/// 1. Build the HTTP client
/// 2. List the categories on the site root
/// 3. Walk each category's listing pages
/// 4. Extract every book and export one CSV per category
pub async fn crawl(config: &Config) -> Result<CrawlSummary, HarvestError> {
    run_crawl(config).await
}
