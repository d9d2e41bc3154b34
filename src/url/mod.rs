//! URL helpers for Shelf-Harvest
//!
//! Relative links on the catalog are resolved against the page they were
//! found on, and image paths are rebuilt from the site origin.

use url::Url;

/// Path segment separating the site origin from catalog pages
pub const CATALOG_MARKER: &str = "/catalogue/";

/// Directory traversal prefix carried by detail-page image paths
pub const IMAGE_TRAVERSAL_PREFIX: &str = "../../";

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
///
/// # Example
///
/// ```
/// use shelf_harvest::url::resolve_link;
/// use url::Url;
///
/// let page = Url::parse("https://books.toscrape.com/catalogue/category/books/travel_2/index.html").unwrap();
/// assert_eq!(
///     resolve_link("../../../its-only-the-himalayas_981/index.html", &page).as_deref(),
///     Some("https://books.toscrape.com/catalogue/its-only-the-himalayas_981/index.html"),
/// );
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Builds an absolute image URL from a detail page URL and an `img` src
///
/// The page URL is cut at its first [`CATALOG_MARKER`] (the whole URL is kept
/// when the marker is absent), a `/` is appended, and the src is attached
/// with every [`IMAGE_TRAVERSAL_PREFIX`] removed.
///
/// ```
/// use shelf_harvest::url::absolute_image_url;
///
/// assert_eq!(
///     absolute_image_url(
///         "https://books.toscrape.com/catalogue/soumission_998/index.html",
///         "../../media/cache/3e/ef/3eef99c9d9adef34639f510662022830.jpg",
///     ),
///     "https://books.toscrape.com/media/cache/3e/ef/3eef99c9d9adef34639f510662022830.jpg",
/// );
/// ```
pub fn absolute_image_url(page_url: &str, src: &str) -> String {
    let site_base = match page_url.find(CATALOG_MARKER) {
        Some(idx) => &page_url[..idx],
        None => page_url,
    };
    let clean = src.replace(IMAGE_TRAVERSAL_PREFIX, "");
    format!("{}/{}", site_base, clean)
}
