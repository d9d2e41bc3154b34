//! Crawl statistics and run summary
//!
//! The coordinator records one [`CategoryOutcome`] per category into a
//! [`CrawlSummary`], which is printed once the run is over.

use crate::model::CategoryRef;
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// What crawling one category produced
#[derive(Debug, Clone)]
pub struct CategoryOutcome {
    pub category: CategoryRef,

    /// Detail links discovered across all listing pages
    pub links_found: usize,

    /// Records successfully extracted
    pub scraped: usize,

    /// Detail pages that could not be fetched
    pub failed_urls: Vec<String>,

    /// Export written, if any records were scraped and the write succeeded
    pub export_path: Option<PathBuf>,

    /// Why the export failed, if it did
    pub export_error: Option<String>,
}

/// Summary of a whole crawl run
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub root_url: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub categories: Vec<CategoryOutcome>,
}

impl CrawlSummary {
    /// Starts a summary clock for a run rooted at `root_url`
    pub fn start(root_url: impl Into<String>) -> Self {
        Self {
            root_url: root_url.into(),
            started_at: Utc::now(),
            finished_at: None,
            categories: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: CategoryOutcome) {
        self.categories.push(outcome);
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn total_links(&self) -> usize {
        self.categories.iter().map(|c| c.links_found).sum()
    }

    pub fn total_scraped(&self) -> usize {
        self.categories.iter().map(|c| c.scraped).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.categories.iter().map(|c| c.failed_urls.len()).sum()
    }

    /// Number of categories whose export was written
    pub fn files_written(&self) -> usize {
        self.categories
            .iter()
            .filter(|c| c.export_path.is_some())
            .count()
    }

    pub fn duration_seconds(&self) -> Option<i64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_seconds())
    }

    /// Returns the share of discovered links that were scraped, as a percentage
    pub fn success_rate(&self) -> f64 {
        let links = self.total_links();
        if links == 0 {
            return 0.0;
        }
        (self.total_scraped() as f64 / links as f64) * 100.0
    }
}

/// Prints the summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");

    println!("Run:");
    println!("  Root: {}", summary.root_url);
    println!("  Started: {}", summary.started_at.to_rfc3339());
    if let Some(finished) = summary.finished_at {
        println!("  Finished: {}", finished.to_rfc3339());
    }
    if let Some(secs) = summary.duration_seconds() {
        println!("  Duration: {}s", secs);
    }
    println!();

    println!("Totals:");
    println!("  Categories: {}", summary.categories.len());
    println!("  Books found: {}", summary.total_links());
    println!(
        "  Books scraped: {} ({:.1}%)",
        summary.total_scraped(),
        summary.success_rate()
    );
    println!("  Books failed: {}", summary.total_failed());
    println!("  Files written: {}", summary.files_written());

    if summary.categories.is_empty() {
        return;
    }

    println!("\nBy Category:");
    for outcome in &summary.categories {
        let target = match (&outcome.export_path, &outcome.export_error) {
            (Some(path), _) => path.display().to_string(),
            (None, Some(err)) => format!("export failed: {}", err),
            (None, None) => "no file".to_string(),
        };
        println!(
            "  {}: {}/{} scraped -> {}",
            outcome.category.name, outcome.scraped, outcome.links_found, target
        );
    }

    let failed: Vec<&String> = summary
        .categories
        .iter()
        .flat_map(|c| &c.failed_urls)
        .collect();
    if !failed.is_empty() {
        println!("\nFailed Pages:");
        for url in failed {
            println!("  - {}", url);
        }
    }
}
