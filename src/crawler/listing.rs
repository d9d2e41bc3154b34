//! Category listing traversal
//!
//! A category is a chain of listing pages linked by a "next" control. Each
//! page carries a grid of `article.product_pod` entries whose heading links
//! point at detail pages. [`ListingPages`] walks that chain one page at a
//! time; [`discover_category_links`] drains it into a flat, ordered list.

use crate::crawler::PageSource;
use crate::markup::{Document, Query};
use crate::url::resolve_link;
use url::Url;

/// One parsed listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingPage {
    /// The URL this page was fetched from
    pub url: String,

    /// Absolute detail-page URLs, in document order
    pub links: Vec<String>,

    /// Absolute URL of the following page, if any
    pub next: Option<String>,
}

/// Parses a listing page
///
/// Both product links and the next-page target are resolved against
/// `page_url`, since later pages can sit at a different directory depth than
/// the category root.
pub fn parse_listing(html: &str, page_url: &str) -> ListingPage {
    let base = match Url::parse(page_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::warn!("Cannot resolve links on {}: {}", page_url, e);
            return ListingPage {
                url: page_url.to_string(),
                links: Vec::new(),
                next: None,
            };
        }
    };

    let document = Document::parse(html);

    ListingPage {
        url: page_url.to_string(),
        links: extract_product_links(&document, &base),
        next: extract_next_page(&document, &base),
    }
}

/// Reads the heading link of every product entry in the listing section
fn extract_product_links(document: &Document, base: &Url) -> Vec<String> {
    let (Ok(section_q), Ok(entry_q), Ok(heading_q), Ok(link_q)) = (
        Query::parse("section"),
        Query::parse("article.product_pod"),
        Query::parse("h3"),
        Query::parse("a[href]"),
    ) else {
        return Vec::new();
    };

    let Some(section) = document.find_first(&section_q) else {
        tracing::debug!("No listing section on {}", base);
        return Vec::new();
    };

    section
        .find_all(&entry_q)
        .iter()
        .filter_map(|entry| {
            let heading = entry.find_first(&heading_q)?;
            let href = heading.find_first(&link_q)?.attr("href")?;
            resolve_link(href, base)
        })
        .collect()
}

/// Resolves the target of the `li.next` control
///
/// No control means this is the last page. A control without a usable link
/// also ends the walk.
fn extract_next_page(document: &Document, base: &Url) -> Option<String> {
    let marker = document.find_first(&Query::parse("li.next").ok()?)?;

    let target = marker
        .find_first(&Query::parse("a[href]").ok()?)
        .and_then(|a| a.attr("href"))
        .and_then(|href| resolve_link(href, base));

    if target.is_none() {
        tracing::warn!("Next-page control without a usable link on {}", base);
    }

    target
}

/// Lazy walk over a category's listing pages
///
/// Each call to [`ListingPages::next_page`] performs one fetch. The walk ends
/// after the last page, or at the first page that cannot be fetched; pages
/// already yielded stay valid. [`ListingPages::restart`] rewinds to the root.
///
/// There is no page cap and no cycle detection.
pub struct ListingPages<'s, S> {
    source: &'s S,
    root: String,
    next: Option<String>,
    pages_fetched: usize,
}

impl<'s, S: PageSource> ListingPages<'s, S> {
    pub fn new(source: &'s S, root: impl Into<String>) -> Self {
        let root = root.into();
        Self {
            source,
            next: Some(root.clone()),
            root,
            pages_fetched: 0,
        }
    }

    /// Fetches and parses the next page, or returns None when the walk is over
    pub async fn next_page(&mut self) -> Option<ListingPage> {
        let url = self.next.take()?;
        self.pages_fetched += 1;
        tracing::debug!("Listing page {}: {}", self.pages_fetched, url);

        match self.source.fetch(&url).await {
            Ok(html) => {
                let page = parse_listing(&html, &url);
                self.next = page.next.clone();
                Some(page)
            }
            Err(e) => {
                tracing::warn!("Stopping pagination at {}: {}", url, e);
                None
            }
        }
    }

    /// Rewinds to the category root
    pub fn restart(&mut self) {
        self.next = Some(self.root.clone());
        self.pages_fetched = 0;
    }

    /// Number of fetches attempted since the last (re)start
    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }
}

/// Collects every detail-page URL of a category, page by page
///
/// A fetch failure part-way through returns the links gathered before it.
pub async fn discover_category_links<S: PageSource>(source: &S, root_url: &str) -> Vec<String> {
    let mut pages = ListingPages::new(source, root_url);
    let mut links = Vec::new();

    while let Some(page) = pages.next_page().await {
        links.extend(page.links);
    }

    tracing::debug!(
        "Found {} links across {} listing pages of {}",
        links.len(),
        pages.pages_fetched(),
        root_url
    );
    links
}
