//! Configuration module for Shelf-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; an absent file means the built-in defaults.
//!
//! # Example
//!
//! ```no_run
//! use shelf_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawling from: {}", config.site.root_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, HttpConfig, OutputConfig, SiteConfig, UserAgentConfig, WriteMode,
    DEFAULT_BASE_FILENAME, DEFAULT_ROOT_URL,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
