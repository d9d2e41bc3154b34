//! Markup query layer
//!
//! A small, capability-bounded query interface over parsed HTML. Extraction
//! code in [`crate::crawler`] talks to markup only through [`Document`],
//! [`Node`] and [`Query`], never through the parser's own types:
//!
//! - [`Document::find_first`] / [`Node::find_first`]: first descendant match
//! - [`Document::find_all`] / [`Node::find_all`]: every descendant match, in
//!   document order
//! - [`Node::text`]: trimmed, concatenated text content
//! - [`Node::attr`] / [`Node::classes`]: attribute and class-token access
//! - [`Node::next_sibling_matching`]: first following sibling element that
//!   matches a query
//!
//! Parsed documents are not `Send`; parse, query and drop them between awaits.

use scraper::{ElementRef, Html, Selector};
use thiserror::Error;

/// A selector string that failed to compile
#[derive(Debug, Clone, Error)]
#[error("invalid selector '{selector}': {message}")]
pub struct QueryError {
    pub selector: String,
    pub message: String,
}

/// A compiled CSS selector
#[derive(Debug, Clone)]
pub struct Query(Selector);

impl Query {
    /// Compiles a CSS selector such as `"table.table-striped tr"`
    pub fn parse(selector: &str) -> Result<Self, QueryError> {
        Selector::parse(selector).map(Query).map_err(|e| QueryError {
            selector: selector.to_string(),
            message: format!("{:?}", e),
        })
    }
}

/// A parsed HTML document
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses markup; malformed input still yields a (possibly sparse) tree
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }

    /// First element in document order matching `query`
    pub fn find_first(&self, query: &Query) -> Option<Node<'_>> {
        self.html.select(&query.0).next().map(Node)
    }

    /// All elements matching `query`, in document order
    pub fn find_all(&self, query: &Query) -> Vec<Node<'_>> {
        self.html.select(&query.0).map(Node).collect()
    }
}

/// An element inside a [`Document`]
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(ElementRef<'a>);

impl<'a> Node<'a> {
    /// First descendant matching `query`
    pub fn find_first(&self, query: &Query) -> Option<Node<'a>> {
        self.0.select(&query.0).next().map(Node)
    }

    /// All descendants matching `query`, in document order
    pub fn find_all(&self, query: &Query) -> Vec<Node<'a>> {
        self.0.select(&query.0).map(Node).collect()
    }

    /// Text content with every text fragment trimmed and empty ones dropped
    ///
    /// `<p>\n  <i></i>\n  In stock (3 available)\n</p>` reads as
    /// `In stock (3 available)`.
    pub fn text(&self) -> String {
        self.0
            .text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Value of attribute `name`, if present
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.0.value().attr(name)
    }

    /// Class tokens in source order
    pub fn classes(&self) -> Vec<&'a str> {
        self.0.value().classes().collect()
    }

    /// Whether the class list contains `class`
    pub fn has_class(&self, class: &str) -> bool {
        self.classes().iter().any(|c| *c == class)
    }

    /// First following sibling element matching `query`
    ///
    /// Non-matching siblings in between are skipped.
    pub fn next_sibling_matching(&self, query: &Query) -> Option<Node<'a>> {
        self.0
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|sibling| query.0.matches(sibling))
            .map(Node)
    }
}
