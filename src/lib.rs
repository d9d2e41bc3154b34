//! Shelf-Harvest: a catalog crawler for books.toscrape.com
//!
//! This crate walks the catalog's category sidebar, follows each category's
//! paginated listing, extracts the attributes of every book detail page and
//! writes one CSV export per category.

pub mod config;
pub mod crawler;
pub mod markup;
pub mod model;
pub mod output;
pub mod url;

use thiserror::Error;

/// Errors that stop a crawl before it starts
///
/// Once running, a crawl never fails as a whole: page failures are
/// [`FetchError`]s scoped to their page and export failures are recorded on
/// the category's outcome.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Failure of a single page retrieval
///
/// Both variants are page-scoped: callers log them and move on, they never
/// abort a crawl.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connectivity failure: DNS, connect, timeout, reset or body read
    #[error("network error for {url}: {message}")]
    Network { url: String, message: String },

    /// The server answered with a non-success status
    #[error("HTTP {status} for {url}")]
    HttpStatus { url: String, status: u16 },
}

impl FetchError {
    /// The URL whose retrieval failed
    pub fn url(&self) -> &str {
        match self {
            Self::Network { url, .. } | Self::HttpStatus { url, .. } => url,
        }
    }
}

/// Result type alias for single-page fetches
pub type FetchResult<T> = std::result::Result<T, FetchError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{HttpFetcher, PageSource};
pub use model::{CategoryRef, ProductRecord, Quantity, Rating};
pub use output::{CsvSink, WriteMode};
