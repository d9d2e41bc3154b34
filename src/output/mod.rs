//! Output module for exports and run reports
//!
//! This module handles:
//! - Writing per-category CSV exports
//! - Recording what each category produced
//! - Printing the end-of-run summary

mod csv_sink;
pub mod stats;

pub use crate::config::WriteMode;
pub use csv_sink::{sanitize_category_name, CsvSink};
pub use stats::{print_summary, CategoryOutcome, CrawlSummary};

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while writing an export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error on {}: {}", .path.display(), .source)]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("CSV error on {}: {}", .path.display(), .source)]
    Csv { path: PathBuf, source: csv::Error },
}

/// Result type for export operations
pub type ExportResult<T> = Result<T, ExportError>;
