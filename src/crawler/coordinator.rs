//! Crawler coordinator - main crawl orchestration logic
//!
//! Strictly sequential: categories in sidebar order, listing pages in chain
//! order, detail pages in listing order, one request in flight at a time.
//! No page failure ever escapes its page; it only shrinks what gets exported.

use crate::config::Config;
use crate::crawler::categories::discover_categories;
use crate::crawler::detail::extract_detail;
use crate::crawler::listing::discover_category_links;
use crate::crawler::{HttpFetcher, PageSource};
use crate::model::{CategoryRef, ProductRecord};
use crate::output::{CategoryOutcome, CrawlSummary, CsvSink};
use crate::HarvestError;

/// Export name used when a category has neither a given nor a scraped name
pub const FALLBACK_CATEGORY_NAME: &str = "category";

/// Main crawler coordinator structure
pub struct Coordinator<S> {
    source: S,
    sink: CsvSink,
    root_url: String,
}

impl<S: PageSource> Coordinator<S> {
    pub fn new(source: S, sink: CsvSink, root_url: impl Into<String>) -> Self {
        Self {
            source,
            sink,
            root_url: root_url.into(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Crawls every category listed on the site root
    ///
    /// An unreachable root or missing sidebar yields an empty summary.
    pub async fn run(&self) -> CrawlSummary {
        let mut summary = CrawlSummary::start(&self.root_url);
        tracing::info!("Starting full catalog crawl from {}", self.root_url);

        let categories = discover_categories(&self.source, &self.root_url).await;
        if categories.is_empty() {
            tracing::info!("No categories found at {}; nothing to do", self.root_url);
            summary.finish();
            return summary;
        }

        tracing::info!("Found {} categories", categories.len());
        let total = categories.len();

        for (i, category) in categories.iter().enumerate() {
            tracing::info!(
                "Processing category {}/{}: '{}' ({})",
                i + 1,
                total,
                category.name,
                category.url
            );
            let outcome = self.crawl_category(category).await;
            summary.record(outcome);
        }

        summary.finish();
        tracing::info!(
            "Crawl complete: {} books scraped across {} categories",
            summary.total_scraped(),
            total
        );
        summary
    }

    /// Crawls one known category and exports it under its name
    pub async fn crawl_category(&self, category: &CategoryRef) -> CategoryOutcome {
        let (links_found, records, failed_urls) = self.collect(&category.url).await;
        self.export(category.clone(), links_found, records, failed_urls)
    }

    /// Crawls a category given only its URL
    ///
    /// Without an explicit `name` the export is named after the first
    /// non-empty breadcrumb category among the scraped books.
    pub async fn crawl_category_url(&self, url: &str, name: Option<&str>) -> CategoryOutcome {
        let (links_found, records, failed_urls) = self.collect(url).await;

        let name = name
            .map(str::to_string)
            .or_else(|| {
                records
                    .iter()
                    .map(|r| r.category.clone())
                    .find(|c| !c.is_empty())
            })
            .unwrap_or_else(|| FALLBACK_CATEGORY_NAME.to_string());

        self.export(CategoryRef::new(name, url), links_found, records, failed_urls)
    }

    /// Scrapes detail pages in order, returning the records and the URLs that failed
    pub async fn scrape_books(&self, links: &[String]) -> (Vec<ProductRecord>, Vec<String>) {
        let mut records = Vec::with_capacity(links.len());
        let mut failed = Vec::new();

        for (i, link) in links.iter().enumerate() {
            tracing::debug!("Scraping book {}/{}: {}", i + 1, links.len(), link);
            match extract_detail(&self.source, link).await {
                Some(record) => records.push(record),
                None => failed.push(link.clone()),
            }
        }

        (records, failed)
    }

    async fn collect(&self, category_url: &str) -> (usize, Vec<ProductRecord>, Vec<String>) {
        let links = discover_category_links(&self.source, category_url).await;
        if links.is_empty() {
            tracing::info!("No books found at {}", category_url);
            return (0, Vec::new(), Vec::new());
        }

        tracing::info!("Found {} books, scraping details", links.len());
        let (records, failed) = self.scrape_books(&links).await;
        (links.len(), records, failed)
    }

    fn export(
        &self,
        category: CategoryRef,
        links_found: usize,
        records: Vec<ProductRecord>,
        failed_urls: Vec<String>,
    ) -> CategoryOutcome {
        let mut outcome = CategoryOutcome {
            category,
            links_found,
            scraped: records.len(),
            failed_urls,
            export_path: None,
            export_error: None,
        };

        if records.is_empty() {
            tracing::info!(
                "No book details scraped for '{}'; no CSV written",
                outcome.category.name
            );
            return outcome;
        }

        match self.sink.export(&records, &outcome.category.name) {
            Ok(path) => outcome.export_path = Some(path),
            Err(e) => {
                tracing::error!("Export failed for '{}': {}", outcome.category.name, e);
                outcome.export_error = Some(e.to_string());
            }
        }

        outcome
    }
}

impl Coordinator<HttpFetcher> {
    /// Builds a coordinator for the live site from configuration
    pub fn from_config(config: &Config) -> Result<Self, HarvestError> {
        let fetcher = HttpFetcher::from_config(config)?;
        let sink = CsvSink::from_config(&config.output);
        Ok(Self::new(fetcher, sink, &config.site.root_url))
    }
}

/// Runs a full crawl operation
///
/// # Example
///
/// ```no_run
/// use shelf_harvest::config::Config;
/// use shelf_harvest::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_crawl(&Config::default()).await?;
/// println!("{} books scraped", summary.total_scraped());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: &Config) -> Result<CrawlSummary, HarvestError> {
    let coordinator = Coordinator::from_config(config)?;
    Ok(coordinator.run().await)
}
