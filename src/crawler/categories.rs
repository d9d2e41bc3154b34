//! Category discovery from the sidebar navigation
//!
//! The sidebar is a two-level list: one umbrella "Books" entry whose nested
//! list holds the real categories. Only the nested list is read.

use crate::crawler::PageSource;
use crate::markup::{Document, Query};
use crate::model::CategoryRef;
use crate::url::resolve_link;
use url::Url;

/// Fetches the site root and lists its categories
///
/// Returns an empty list when the root cannot be fetched or has no sidebar.
pub async fn discover_categories<S: PageSource>(source: &S, root_url: &str) -> Vec<CategoryRef> {
    match source.fetch(root_url).await {
        Ok(html) => parse_categories(&html, root_url),
        Err(e) => {
            tracing::warn!("Cannot list categories from {}: {}", root_url, e);
            Vec::new()
        }
    }
}

/// Reads category name/URL pairs from the sidebar of `root_url`'s markup
pub fn parse_categories(html: &str, root_url: &str) -> Vec<CategoryRef> {
    let Ok(base) = Url::parse(root_url) else {
        tracing::warn!("Cannot resolve category links against {}", root_url);
        return Vec::new();
    };

    let document = Document::parse(html);
    let categories = extract_categories(&document, &base).unwrap_or_default();

    if categories.is_empty() {
        tracing::debug!("No category sidebar found on {}", root_url);
    }
    categories
}

fn extract_categories(document: &Document, base: &Url) -> Option<Vec<CategoryRef>> {
    let sidebar = document.find_first(&Query::parse("div.side_categories").ok()?)?;
    let umbrella = sidebar.find_first(&Query::parse("ul.nav.nav-list").ok()?)?;
    // First list nested inside the umbrella holds the actual categories
    let nested = umbrella.find_first(&Query::parse("ul").ok()?)?;

    let categories = nested
        .find_all(&Query::parse("a[href]").ok()?)
        .iter()
        .filter_map(|link| {
            let url = resolve_link(link.attr("href")?, base)?;
            Some(CategoryRef::new(link.text(), url))
        })
        .collect();

    Some(categories)
}
