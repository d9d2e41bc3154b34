//! Per-category CSV export
//!
//! Each category goes to `<dir>/<sanitized name>_<base filename>`. A header
//! row is written only when the file is empty at the moment of writing, so
//! successive batches for one category land in one file under one header.

use crate::config::{OutputConfig, WriteMode};
use crate::model::ProductRecord;
use crate::output::{ExportError, ExportResult};
use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Turns a category name into a filename stem
///
/// Whitespace becomes `_`; anything outside `[A-Za-z0-9_-]` is dropped.
///
/// ```
/// use shelf_harvest::output::sanitize_category_name;
///
/// assert_eq!(sanitize_category_name("Historical Fiction"), "Historical_Fiction");
/// assert_eq!(sanitize_category_name("Sci-Fi & Fantasy!"), "Sci-Fi__Fantasy");
/// ```
pub fn sanitize_category_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Writes record batches to per-category CSV files
///
/// Writes are serialized through an internal lock. Under
/// [`WriteMode::Truncate`] a file is emptied the first time this sink writes
/// to it and appended to afterwards; under [`WriteMode::Append`] existing
/// rows are always kept, so re-running a crawl duplicates them.
#[derive(Debug)]
pub struct CsvSink {
    directory: PathBuf,
    base_filename: String,
    mode: WriteMode,
    written: Mutex<HashSet<PathBuf>>,
}

impl CsvSink {
    pub fn new(
        directory: impl Into<PathBuf>,
        base_filename: impl Into<String>,
        mode: WriteMode,
    ) -> Self {
        Self {
            directory: directory.into(),
            base_filename: base_filename.into(),
            mode,
            written: Mutex::new(HashSet::new()),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.directory, &config.base_filename, config.write_mode)
    }

    /// Export path for a category
    pub fn path_for(&self, category_name: &str) -> PathBuf {
        self.directory.join(format!(
            "{}_{}",
            sanitize_category_name(category_name),
            self.base_filename
        ))
    }

    /// Appends `records` to the category's file and returns its path
    pub fn export(&self, records: &[ProductRecord], category_name: &str) -> ExportResult<PathBuf> {
        let path = self.path_for(category_name);
        let mut written = self.written.lock().unwrap_or_else(PoisonError::into_inner);

        fs::create_dir_all(&self.directory).map_err(|source| ExportError::Io {
            path: self.directory.clone(),
            source,
        })?;

        let truncate = self.mode == WriteMode::Truncate && !written.contains(&path);
        let file = open_export_file(&path, truncate)?;
        let write_header = file
            .metadata()
            .map_err(|source| ExportError::Io {
                path: path.clone(),
                source,
            })?
            .len()
            == 0;

        write_records(file, &path, records, write_header)?;
        written.insert(path.clone());

        tracing::info!(
            "Exported {} records to {}{}",
            records.len(),
            path.display(),
            if write_header { " (new file)" } else { "" }
        );
        Ok(path)
    }
}

fn open_export_file(path: &Path, truncate: bool) -> ExportResult<File> {
    let mut options = OpenOptions::new();
    options.create(true);
    if truncate {
        options.write(true).truncate(true);
    } else {
        options.append(true);
    }

    options.open(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_records(
    file: File,
    path: &Path,
    records: &[ProductRecord],
    write_header: bool,
) -> ExportResult<()> {
    let csv_err = |source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if write_header {
        writer
            .write_record(ProductRecord::COLUMNS)
            .map_err(csv_err)?;
    }

    for record in records {
        writer.write_record(record.to_row()).map_err(csv_err)?;
    }

    writer.flush().map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })
}
