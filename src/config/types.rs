use serde::Deserialize;

/// Catalog entry point used when no root URL is configured
pub const DEFAULT_ROOT_URL: &str = "https://books.toscrape.com/index.html";

/// Suffix appended to every sanitized category name
pub const DEFAULT_BASE_FILENAME: &str = "books_details.csv";

/// Main configuration structure for Shelf-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Target catalog
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Page carrying the category sidebar; also the base for category links
    #[serde(rename = "root-url", default = "default_root_url")]
    pub root_url: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            root_url: default_root_url(),
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email", default)]
    pub contact_email: Option<String>,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
            contact_email: None,
        }
    }
}

impl UserAgentConfig {
    /// Formats the `User-Agent` header value
    ///
    /// `Name/Version`, followed by `(+URL; email)` when contact details exist.
    pub fn header_value(&self) -> String {
        let base = format!("{}/{}", self.crawler_name, self.crawler_version);
        let contact: Vec<String> = [
            self.contact_url.as_ref().map(|u| format!("+{}", u)),
            self.contact_email.clone(),
        ]
        .into_iter()
        .flatten()
        .collect();

        if contact.is_empty() {
            base
        } else {
            format!("{} ({})", base, contact.join("; "))
        }
    }
}

/// HTTP client tuning
///
/// Both timeouts are unset by default, leaving the client's own behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfig {
    /// Whole-request timeout in seconds
    #[serde(rename = "timeout-secs", default)]
    pub timeout_secs: Option<u64>,

    /// Connection establishment timeout in seconds
    #[serde(rename = "connect-timeout-secs", default)]
    pub connect_timeout_secs: Option<u64>,
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving the per-category CSV files
    #[serde(default = "default_directory")]
    pub directory: String,

    /// File name suffix, e.g. `Travel_books_details.csv`
    #[serde(rename = "base-filename", default = "default_base_filename")]
    pub base_filename: String,

    /// What to do with an export file that already has content
    #[serde(rename = "write-mode", default)]
    pub write_mode: WriteMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            base_filename: default_base_filename(),
            write_mode: WriteMode::default(),
        }
    }
}

/// Policy applied when an export file already exists
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WriteMode {
    /// Keep existing rows and add new ones after them
    #[default]
    Append,
    /// Empty the file on its first write of a run
    Truncate,
}

fn default_root_url() -> String {
    DEFAULT_ROOT_URL.to_string()
}

fn default_crawler_name() -> String {
    "ShelfHarvest".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_directory() -> String {
    ".".to_string()
}

fn default_base_filename() -> String {
    DEFAULT_BASE_FILENAME.to_string()
}
