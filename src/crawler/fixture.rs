//! In-memory page source
//!
//! Serves canned markup by exact URL and can be told to fail specific URLs,
//! which is how pagination and extraction behaviour is exercised without a
//! network.

use crate::crawler::PageSource;
use crate::{FetchError, FetchResult};
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// A [`PageSource`] backed by a URL → markup map
///
/// Unknown URLs answer with `HttpStatus { status: 404 }`.
#[derive(Debug, Default)]
pub struct FixtureSource {
    pages: HashMap<String, String>,
    failures: HashMap<String, FetchError>,
    requests: Mutex<Vec<String>>,
}

impl FixtureSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `markup` for `url`
    pub fn with_page(mut self, url: impl Into<String>, markup: impl Into<String>) -> Self {
        self.pages.insert(url.into(), markup.into());
        self
    }

    /// Makes `url` fail with a network error, even if a page is registered
    pub fn with_network_failure(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        let error = FetchError::Network {
            url: url.clone(),
            message: "simulated connection reset".to_string(),
        };
        self.failures.insert(url, error);
        self
    }

    /// Makes `url` fail with the given HTTP status
    pub fn with_status_failure(mut self, url: impl Into<String>, status: u16) -> Self {
        let url = url.into();
        let error = FetchError::HttpStatus {
            url: url.clone(),
            status,
        };
        self.failures.insert(url, error);
        self
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn lookup(&self, url: &str) -> FetchResult<String> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        if let Some(error) = self.failures.get(url) {
            return Err(error.clone());
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

impl PageSource for FixtureSource {
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        self.lookup(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_serves_registered_pages() {
        let source = FixtureSource::new().with_page("https://x.test/a", "<p>a</p>");
        assert_eq!(source.fetch("https://x.test/a").await.unwrap(), "<p>a</p>");
    }

    #[tokio::test]
    async fn test_unknown_url_is_404() {
        let source = FixtureSource::new();
        assert_eq!(
            source.fetch("https://x.test/missing").await,
            Err(FetchError::HttpStatus {
                url: "https://x.test/missing".to_string(),
                status: 404
            })
        );
    }

    #[tokio::test]
    async fn test_failure_overrides_page() {
        let source = FixtureSource::new()
            .with_page("https://x.test/a", "<p>a</p>")
            .with_network_failure("https://x.test/a");
        let err = source.fetch("https://x.test/a").await.unwrap_err();
        assert!(matches!(err, FetchError::Network { .. }));
        assert_eq!(err.url(), "https://x.test/a");
    }

    #[tokio::test]
    async fn test_records_requests_in_order() {
        let source = FixtureSource::new().with_status_failure("https://x.test/b", 500);
        let _ = source.fetch("https://x.test/a").await;
        let _ = source.fetch("https://x.test/b").await;
        assert_eq!(source.requests(), vec!["https://x.test/a", "https://x.test/b"]);
    }
}
