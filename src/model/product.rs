use std::fmt;
use std::str::FromStr;

/// Stored in `description` when a detail page has no description block
pub const DESCRIPTION_SENTINEL: &str = "No description found.";

/// Stock count parsed from the availability text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Quantity {
    /// `"In stock (22 available)"` → `Count(22)`
    Count(u64),
    /// Availability text without a count, kept verbatim
    Raw(String),
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Raw(String::new())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quantity::Count(n) => write!(f, "{}", n),
            Quantity::Raw(text) => f.write_str(text),
        }
    }
}

/// Star rating vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rating {
    One,
    Two,
    Three,
    Four,
    Five,
    /// A star-rating element was present but carried no known token
    Unknown,
}

impl Rating {
    /// Recognised class tokens, in match order
    pub const STARS: [Rating; 5] = [
        Rating::One,
        Rating::Two,
        Rating::Three,
        Rating::Four,
        Rating::Five,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rating::One => "One",
            Rating::Two => "Two",
            Rating::Three => "Three",
            Rating::Four => "Four",
            Rating::Five => "Five",
            Rating::Unknown => "Unknown",
        }
    }

    /// Number of stars, None for [`Rating::Unknown`]
    pub fn stars(&self) -> Option<u8> {
        match self {
            Rating::One => Some(1),
            Rating::Two => Some(2),
            Rating::Three => Some(3),
            Rating::Four => Some(4),
            Rating::Five => Some(5),
            Rating::Unknown => None,
        }
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Rating {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "One" => Ok(Rating::One),
            "Two" => Ok(Rating::Two),
            "Three" => Ok(Rating::Three),
            "Four" => Ok(Rating::Four),
            "Five" => Ok(Rating::Five),
            "Unknown" => Ok(Rating::Unknown),
            other => Err(format!("unrecognised rating '{}'", other)),
        }
    }
}

/// One scraped book
///
/// Every text field defaults to the empty string except `description`, which
/// defaults to [`DESCRIPTION_SENTINEL`]. `rating` is `None` only when the page
/// had no star-rating element at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub source_url: String,
    pub product_code: String,
    pub title: String,
    pub price_including_tax: String,
    pub price_excluding_tax: String,
    pub quantity_available: Quantity,
    pub description: String,
    pub category: String,
    pub rating: Option<Rating>,
    pub image_url: String,
}

impl ProductRecord {
    /// Column names, in export order
    pub const COLUMNS: [&'static str; 10] = [
        "product_page_url",
        "universal_product_code",
        "book_title",
        "price_including_tax",
        "price_excluding_tax",
        "quantity_available",
        "product_description",
        "category",
        "review_rating",
        "image_url",
    ];

    /// A record for `source_url` with every other field at its default
    pub fn empty(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            product_code: String::new(),
            title: String::new(),
            price_including_tax: String::new(),
            price_excluding_tax: String::new(),
            quantity_available: Quantity::default(),
            description: DESCRIPTION_SENTINEL.to_string(),
            category: String::new(),
            rating: None,
            image_url: String::new(),
        }
    }

    /// Field values as written to a CSV row, aligned with [`Self::COLUMNS`]
    pub fn to_row(&self) -> [String; 10] {
        [
            self.source_url.clone(),
            self.product_code.clone(),
            self.title.clone(),
            self.price_including_tax.clone(),
            self.price_excluding_tax.clone(),
            self.quantity_available.to_string(),
            self.description.clone(),
            self.category.clone(),
            self.rating.map(|r| r.as_str()).unwrap_or_default().to_string(),
            self.image_url.clone(),
        ]
    }
}
