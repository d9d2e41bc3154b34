//! HTTP fetcher implementation
//!
//! This module handles every network read the crawler makes:
//! - Building the HTTP client with the configured user agent and timeouts
//! - One GET per page, no retries
//! - Classifying failures into [`FetchError::Network`] and
//!   [`FetchError::HttpStatus`]
//! - Decoding bodies as UTF-8 whatever charset the server advertises

use crate::config::Config;
use crate::{FetchError, FetchResult};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;

/// Anything that can turn a URL into page markup
///
/// The crawler's traversal and extraction code is generic over this trait so
/// it can run against the live site ([`HttpFetcher`]) or against in-memory
/// fixtures in unit tests.
pub trait PageSource: Send + Sync {
    /// Retrieves `url` and returns its decoded markup
    fn fetch(&self, url: &str) -> impl Future<Output = FetchResult<String>> + Send;
}

impl<T: PageSource> PageSource for &T {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchResult<String>> + Send {
        (**self).fetch(url)
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The crawler configuration (user agent and timeouts are used)
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use shelf_harvest::config::Config;
/// use shelf_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&Config::default()).unwrap();
/// ```
pub fn build_http_client(config: &Config) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(config.user_agent.header_value())
        .gzip(true)
        .brotli(true);

    if let Some(secs) = config.http.timeout_secs {
        builder = builder.timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = config.http.connect_timeout_secs {
        builder = builder.connect_timeout(Duration::from_secs(secs));
    }

    builder.build()
}

/// [`PageSource`] backed by a real HTTP client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Wraps an already-built client
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the client from configuration
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config)?))
    }
}

impl PageSource for HttpFetcher {
    /// Fetches a URL with a single GET
    ///
    /// # Error mapping
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Any non-2xx status | `HttpStatus` |
    /// | Timeout | `Network` |
    /// | Connection refused / DNS | `Network` |
    /// | Body read failure | `Network` |
    async fn fetch(&self, url: &str) -> FetchResult<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_network_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("GET {} returned {}", url, status);
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| classify_network_error(url, &e))?;

        tracing::trace!("GET {} returned {} bytes", url, bytes.len());
        Ok(decode_utf8(&bytes))
    }
}

/// Decodes a body as UTF-8, replacing invalid sequences
///
/// The advertised charset is ignored on purpose: the catalog serves UTF-8 but
/// does not always say so, and `£` must survive.
pub fn decode_utf8(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{feff}').unwrap_or(&text).to_string()
}

fn classify_network_error(url: &str, error: &reqwest::Error) -> FetchError {
    let message = if error.is_timeout() {
        format!("request timeout: {}", error)
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else {
        error.to_string()
    };

    FetchError::Network {
        url: url.to_string(),
        message,
    }
}
