//! Records produced by a crawl
//!
//! - [`ProductRecord`]: one book detail page
//! - [`CategoryRef`]: one sidebar category

mod product;

pub use product::{ProductRecord, Quantity, Rating, DESCRIPTION_SENTINEL};

/// A catalog category as listed in the sidebar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRef {
    /// Trimmed link text, e.g. `"Historical Fiction"`
    pub name: String,

    /// Absolute URL of the category's first listing page
    pub url: String,
}

impl CategoryRef {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}
