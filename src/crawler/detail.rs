//! Book detail page extraction
//!
//! Every field is read independently and on a best-effort basis: a missing
//! or malformed element leaves that one field at its default and never
//! affects the others.

use crate::crawler::PageSource;
use crate::markup::{Document, Query};
use crate::model::{ProductRecord, Quantity, Rating, DESCRIPTION_SENTINEL};
use crate::url::absolute_image_url;
use regex::Regex;
use std::sync::LazyLock;

static AVAILABLE_COUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\((\d+) available\)").expect("valid availability regex"));

/// Breadcrumb position of the category link (Home > Books > Category > Title)
const BREADCRUMB_CATEGORY_INDEX: usize = 2;

/// Fetches a detail page and extracts its record
///
/// Returns None when the page cannot be fetched; the caller is expected to
/// skip the book and carry on.
pub async fn extract_detail<S: PageSource>(source: &S, url: &str) -> Option<ProductRecord> {
    match source.fetch(url).await {
        Ok(html) => Some(parse_product(&html, url)),
        Err(e) => {
            tracing::warn!("Skipping book {}: {}", url, e);
            None
        }
    }
}

/// Extracts a record from detail-page markup; never fails
pub fn parse_product(html: &str, url: &str) -> ProductRecord {
    let document = Document::parse(html);
    let attributes = extract_attribute_table(&document);

    ProductRecord {
        source_url: url.to_string(),
        product_code: attributes.product_code,
        title: extract_title(&document).unwrap_or_default(),
        price_including_tax: attributes.price_including_tax,
        price_excluding_tax: attributes.price_excluding_tax,
        quantity_available: extract_quantity(&document).unwrap_or_default(),
        description: extract_description(&document)
            .unwrap_or_else(|| DESCRIPTION_SENTINEL.to_string()),
        category: extract_category(&document).unwrap_or_default(),
        rating: extract_rating(&document),
        image_url: extract_image_url(&document, url).unwrap_or_default(),
    }
}

/// Values read from the product information table
#[derive(Debug, Default)]
struct AttributeTable {
    product_code: String,
    price_including_tax: String,
    price_excluding_tax: String,
}

fn extract_title(document: &Document) -> Option<String> {
    let heading = document.find_first(&Query::parse("h1").ok()?)?;
    Some(heading.text())
}

/// Dispatches each `th`/`td` row on its header text
///
/// Rows with an unknown header, or missing either cell, are skipped.
fn extract_attribute_table(document: &Document) -> AttributeTable {
    let mut attributes = AttributeTable::default();

    let (Ok(table_q), Ok(row_q), Ok(header_q), Ok(value_q)) = (
        Query::parse("table.table.table-striped"),
        Query::parse("tr"),
        Query::parse("th"),
        Query::parse("td"),
    ) else {
        return attributes;
    };

    let Some(table) = document.find_first(&table_q) else {
        return attributes;
    };

    for row in table.find_all(&row_q) {
        let (Some(header), Some(value)) = (row.find_first(&header_q), row.find_first(&value_q))
        else {
            continue;
        };

        let value = value.text();
        match header.text().as_str() {
            "UPC" => attributes.product_code = value,
            "Price (incl. tax)" => attributes.price_including_tax = value,
            "Price (excl. tax)" => attributes.price_excluding_tax = value,
            _ => {}
        }
    }

    attributes
}

/// `"In stock (22 available)"` → `Count(22)`; anything else is kept verbatim
fn extract_quantity(document: &Document) -> Option<Quantity> {
    let availability = document.find_first(&Query::parse("p.instock.availability").ok()?)?;
    let text = availability.text();

    let count = AVAILABLE_COUNT
        .captures(&text)
        .and_then(|caps| caps.get(1))
        .and_then(|digits| digits.as_str().parse::<u64>().ok());

    Some(match count {
        Some(n) => Quantity::Count(n),
        None => Quantity::Raw(text),
    })
}

/// The paragraph following the `#product_description` anchor
fn extract_description(document: &Document) -> Option<String> {
    let anchor = document.find_first(&Query::parse("div#product_description").ok()?)?;
    let paragraph = anchor.next_sibling_matching(&Query::parse("p").ok()?)?;
    Some(paragraph.text())
}

fn extract_category(document: &Document) -> Option<String> {
    let breadcrumb = document.find_first(&Query::parse("ul.breadcrumb").ok()?)?;
    let items = breadcrumb.find_all(&Query::parse("li").ok()?);
    let link = items
        .get(BREADCRUMB_CATEGORY_INDEX)?
        .find_first(&Query::parse("a").ok()?)?;
    Some(link.text())
}

/// None when there is no star-rating element at all, `Unknown` when there is
/// one without a recognised token
fn extract_rating(document: &Document) -> Option<Rating> {
    let stars = document.find_first(&Query::parse("p.star-rating").ok()?)?;

    let rating = Rating::STARS
        .into_iter()
        .find(|rating| stars.has_class(rating.as_str()))
        .unwrap_or(Rating::Unknown);

    Some(rating)
}

fn extract_image_url(document: &Document, page_url: &str) -> Option<String> {
    let container = document.find_first(&Query::parse("div.item.active").ok()?)?;
    let src = container.find_first(&Query::parse("img").ok()?)?.attr("src")?;
    Some(absolute_image_url(page_url, src))
}
