//! Shelf-Harvest main entry point
//!
//! This is the command-line interface for the Shelf-Harvest catalog crawler.

use anyhow::{bail, Context};
use clap::Parser;
use shelf_harvest::config::{load_config, validate, Config, WriteMode};
use shelf_harvest::crawler::{discover_categories, extract_detail, Coordinator};
use shelf_harvest::output::print_summary;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Shelf-Harvest: a catalog crawler for books.toscrape.com
///
/// Walks every category in the catalog sidebar, follows its paginated
/// listing, extracts each book's details and writes one CSV per category.
#[derive(Parser, Debug)]
#[command(name = "shelf-harvest")]
#[command(version)]
#[command(about = "A catalog crawler with per-category CSV export", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Override the catalog root URL
    #[arg(long, value_name = "URL")]
    root_url: Option<String>,

    /// Override the export directory
    #[arg(long, value_name = "DIR")]
    output_dir: Option<String>,

    /// Override the export write mode
    #[arg(long, value_enum)]
    write_mode: Option<WriteMode>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Extract a single book detail page and print its fields
    #[arg(long, value_name = "URL", conflicts_with_all = ["category", "list_categories", "dry_run"])]
    book: Option<String>,

    /// Crawl and export a single category starting at this listing URL
    #[arg(long, value_name = "URL", conflicts_with_all = ["list_categories", "dry_run"])]
    category: Option<String>,

    /// Export name for --category (defaults to the scraped category)
    #[arg(long, value_name = "NAME", requires = "category")]
    name: Option<String>,

    /// Print the categories found on the site root and exit
    #[arg(long, conflicts_with = "dry_run")]
    list_categories: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;

    // Handle different modes
    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.list_categories {
        handle_list_categories(&config).await?;
    } else if let Some(url) = &cli.book {
        handle_book(&config, url).await?;
    } else if let Some(url) = &cli.category {
        handle_category(&config, url, cli.name.as_deref()).await?;
    } else {
        handle_crawl(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("shelf_harvest=info,warn"),
            1 => EnvFilter::new("shelf_harvest=debug,info"),
            2 => EnvFilter::new("shelf_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file (if any), applies command-line overrides and re-validates
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    if let Some(root_url) = &cli.root_url {
        config.site.root_url = root_url.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.clone();
    }
    if let Some(mode) = cli.write_mode {
        config.output.write_mode = mode;
    }

    validate(&config).context("invalid configuration after command-line overrides")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Shelf-Harvest Dry Run ===\n");

    println!("Site:");
    println!("  Root URL: {}", config.site.root_url);

    println!("\nUser Agent:");
    println!("  Header: {}", config.user_agent.header_value());

    println!("\nHTTP:");
    match config.http.timeout_secs {
        Some(secs) => println!("  Timeout: {}s", secs),
        None => println!("  Timeout: none"),
    }
    match config.http.connect_timeout_secs {
        Some(secs) => println!("  Connect timeout: {}s", secs),
        None => println!("  Connect timeout: none"),
    }

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);
    println!("  File pattern: <Category>_{}", config.output.base_filename);
    println!("  Write mode: {:?}", config.output.write_mode);

    println!("\n✓ Configuration is valid");
}

/// Handles the --list-categories mode
async fn handle_list_categories(config: &Config) -> anyhow::Result<()> {
    let coordinator = Coordinator::from_config(config)?;
    let categories = discover_categories(coordinator.source(), &config.site.root_url).await;

    if categories.is_empty() {
        bail!("no categories found at {}", config.site.root_url);
    }

    println!("Categories ({}):", categories.len());
    for category in &categories {
        println!("  - {} ({})", category.name, category.url);
    }
    Ok(())
}

/// Handles the --book mode: prints one book's fields, writes nothing
async fn handle_book(config: &Config, url: &str) -> anyhow::Result<()> {
    let coordinator = Coordinator::from_config(config)?;
    let Some(record) = extract_detail(coordinator.source(), url).await else {
        bail!("could not fetch book page {}", url);
    };

    for (column, value) in shelf_harvest::ProductRecord::COLUMNS
        .iter()
        .zip(record.to_row())
    {
        println!("{}: {}", column, value);
    }
    Ok(())
}

/// Handles the --category mode: crawls and exports one category
async fn handle_category(config: &Config, url: &str, name: Option<&str>) -> anyhow::Result<()> {
    let coordinator = Coordinator::from_config(config)?;
    let outcome = coordinator.crawl_category_url(url, name).await;

    println!(
        "{}: {}/{} books scraped",
        outcome.category.name, outcome.scraped, outcome.links_found
    );
    match (&outcome.export_path, &outcome.export_error) {
        (Some(path), _) => println!("✓ Exported to: {}", path.display()),
        (None, Some(err)) => bail!("export failed: {}", err),
        (None, None) => println!("No books scraped; nothing written"),
    }
    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config) -> anyhow::Result<()> {
    tracing::info!(
        "Exporting to {} ({:?} mode)",
        config.output.directory,
        config.output.write_mode
    );

    let coordinator = Coordinator::from_config(config)?;
    let summary = coordinator.run().await;

    println!();
    print_summary(&summary);
    Ok(())
}
