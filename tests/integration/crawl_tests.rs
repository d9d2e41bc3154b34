//! Integration tests for the crawler
//!
//! These tests use wiremock to serve a miniature catalog and run the full
//! crawl cycle end-to-end, down to the CSV files on disk.

use shelf_harvest::config::{Config, OutputConfig, SiteConfig, WriteMode};
use shelf_harvest::crawler::{discover_category_links, extract_detail, Coordinator, HttpFetcher};
use shelf_harvest::{PageSource, Quantity, Rating};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TRAVEL: &str = "/catalogue/category/books/travel_2/index.html";
const TRAVEL_PAGE_2: &str = "/catalogue/category/books/travel_2/page-2.html";
const MYSTERY: &str = "/catalogue/category/books/mystery_3/index.html";
const MYSTERY_PAGE_2: &str = "/catalogue/category/books/mystery_3/page-2.html";

/// Creates a test configuration rooted at the mock server
fn create_test_config(base_url: &str, output_dir: &Path, write_mode: WriteMode) -> Config {
    Config {
        site: SiteConfig {
            root_url: format!("{}/index.html", base_url),
        },
        output: OutputConfig {
            directory: output_dir.display().to_string(),
            write_mode,
            ..OutputConfig::default()
        },
        ..Config::default()
    }
}

fn index_page() -> String {
    r#"<html><body><aside>
    <div class="side_categories"><ul class="nav nav-list"><li>
      <a href="catalogue/category/books_1/index.html">Books</a>
      <ul>
        <li><a href="catalogue/category/books/travel_2/index.html">
          Travel
        </a></li>
        <li><a href="catalogue/category/books/mystery_3/index.html">
          Mystery
        </a></li>
      </ul>
    </li></ul></div>
    </aside></body></html>"#
        .to_string()
}

fn listing_page(slugs: &[&str], next: Option<&str>) -> String {
    let entries: String = slugs
        .iter()
        .map(|slug| {
            format!(
                r#"<li><article class="product_pod"><h3><a href="../../../{slug}/index.html" title="{slug}">{slug}</a></h3></article></li>"#
            )
        })
        .collect();
    let pager = next
        .map(|href| {
            format!(r#"<ul class="pager"><li class="next"><a href="{href}">next</a></li></ul>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<html><body><section><ol class="row">{}</ol>{}</section></body></html>"#,
        entries, pager
    )
}

fn detail_page(title: &str, upc: &str, category: &str) -> String {
    format!(
        r#"<html><body>
    <ul class="breadcrumb">
      <li><a href="../../index.html">Home</a></li>
      <li><a href="../category/books_1/index.html">Books</a></li>
      <li><a href="../category/books/x/index.html">{category}</a></li>
      <li class="active">{title}</li>
    </ul>
    <article class="product_page">
      <div class="item active"><img src="../../media/cache/{upc}.jpg" alt="{title}" /></div>
      <div class="product_main">
        <h1>{title}</h1>
        <p class="instock availability"><i class="icon-ok"></i> In stock (5 available) </p>
        <p class="star-rating Two"><i class="icon-star"></i></p>
      </div>
      <div id="product_description" class="sub-header"><h2>Product Description</h2></div>
      <p>About {title}.</p>
      <table class="table table-striped">
        <tr><th>UPC</th><td>{upc}</td></tr>
        <tr><th>Product Type</th><td>Books</td></tr>
        <tr><th>Price (excl. tax)</th><td>£10.00</td></tr>
        <tr><th>Price (incl. tax)</th><td>£12.00</td></tr>
      </table>
    </article>
    </body></html>"#
    )
}

async fn mount_page(server: &MockServer, at: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

async fn mount_book(server: &MockServer, slug: &str, body: String) {
    mount_page(server, &format!("/catalogue/{}/index.html", slug), body).await;
}

async fn mount_status(server: &MockServer, at: &str, status: u16) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Two categories:
/// - Travel spans two listing pages, three books, all healthy
/// - Mystery's second page and one of its books return 500
async fn mount_catalog(server: &MockServer) {
    mount_page(server, "/index.html", index_page()).await;

    let travel = listing_page(&["trip-one_1", "trip-two_2"], Some("page-2.html"));
    mount_page(server, TRAVEL, travel).await;
    mount_page(server, TRAVEL_PAGE_2, listing_page(&["trip-three_3"], None)).await;
    mount_book(server, "trip-one_1", detail_page("Trip One", "t001", "Travel")).await;
    mount_book(server, "trip-two_2", detail_page("Trip Two", "t002", "Travel")).await;
    mount_book(server, "trip-three_3", detail_page("Trip Three", "t003", "Travel")).await;

    let mystery = listing_page(&["clue_4", "alibi_5"], Some("page-2.html"));
    mount_page(server, MYSTERY, mystery).await;
    mount_status(server, MYSTERY_PAGE_2, 500).await;
    mount_book(server, "clue_4", detail_page("Clue", "m004", "Mystery")).await;
    mount_status(server, "/catalogue/alibi_5/index.html", 500).await;
}

fn read_rows(path: &Path) -> Vec<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .expect("Failed to open export");
    reader
        .records()
        .map(|r| r.expect("Malformed CSV row").iter().map(String::from).collect())
        .collect()
}

#[tokio::test]
async fn test_full_crawl_exports_each_category() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;
    let out = TempDir::new().unwrap();

    let config = create_test_config(&mock_server.uri(), out.path(), WriteMode::Append);
    let coordinator = Coordinator::from_config(&config).expect("Failed to build coordinator");
    let summary = coordinator.run().await;

    assert_eq!(summary.categories.len(), 2);
    assert_eq!(summary.categories[0].category.name, "Travel");
    assert_eq!(summary.categories[1].category.name, "Mystery");
    assert_eq!(summary.total_scraped(), 4);
    assert_eq!(summary.files_written(), 2);

    let travel = read_rows(&out.path().join("Travel_books_details.csv"));
    assert_eq!(travel.len(), 4, "header plus three books");
    assert_eq!(travel[0][0], "product_page_url");
    let titles: Vec<&str> = travel[1..].iter().map(|row| row[2].as_str()).collect();
    assert_eq!(titles, vec!["Trip One", "Trip Two", "Trip Three"]);

    let first = &travel[1];
    assert_eq!(
        first[0],
        format!("{}/catalogue/trip-one_1/index.html", mock_server.uri())
    );
    assert_eq!(first[1], "t001");
    assert_eq!(first[3], "£12.00");
    assert_eq!(first[4], "£10.00");
    assert_eq!(first[5], "5");
    assert_eq!(first[6], "About Trip One.");
    assert_eq!(first[7], "Travel");
    assert_eq!(first[8], "Two");
    assert_eq!(
        first[9],
        format!("{}/media/cache/t001.jpg", mock_server.uri())
    );
}

#[tokio::test]
async fn test_page_failures_shrink_but_do_not_abort() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;
    let out = TempDir::new().unwrap();

    let config = create_test_config(&mock_server.uri(), out.path(), WriteMode::Append);
    let coordinator = Coordinator::from_config(&config).unwrap();
    let summary = coordinator.run().await;

    let mystery = &summary.categories[1];
    assert_eq!(mystery.links_found, 2, "page 2 failed, page 1 links kept");
    assert_eq!(mystery.scraped, 1);
    assert_eq!(
        mystery.failed_urls,
        vec![format!("{}/catalogue/alibi_5/index.html", mock_server.uri())]
    );

    let rows = read_rows(&out.path().join("Mystery_books_details.csv"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][2], "Clue");
}

#[tokio::test]
async fn test_rerun_appends_or_truncates() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;
    let out = TempDir::new().unwrap();
    let export = out.path().join("Travel_books_details.csv");

    let append = create_test_config(&mock_server.uri(), out.path(), WriteMode::Append);
    Coordinator::from_config(&append).unwrap().run().await;
    Coordinator::from_config(&append).unwrap().run().await;

    let rows = read_rows(&export);
    assert_eq!(rows.len(), 7, "one header, two runs of three books");
    assert_eq!(rows.iter().filter(|r| r[0] == "product_page_url").count(), 1);

    let truncate = create_test_config(&mock_server.uri(), out.path(), WriteMode::Truncate);
    Coordinator::from_config(&truncate).unwrap().run().await;

    assert_eq!(read_rows(&export).len(), 4);
}

#[tokio::test]
async fn test_unreachable_root_writes_nothing() {
    let mock_server = MockServer::start().await;
    mount_status(&mock_server, "/index.html", 503).await;
    let out = TempDir::new().unwrap();

    let config = create_test_config(&mock_server.uri(), out.path(), WriteMode::Append);
    let summary = Coordinator::from_config(&config).unwrap().run().await;

    assert!(summary.categories.is_empty());
    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_single_category_by_url() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;
    let out = TempDir::new().unwrap();

    let config = create_test_config(&mock_server.uri(), out.path(), WriteMode::Append);
    let coordinator = Coordinator::from_config(&config).unwrap();
    let url = format!("{}{}", mock_server.uri(), TRAVEL);

    let links = discover_category_links(coordinator.source(), &url).await;
    assert_eq!(links.len(), 3);

    let outcome = coordinator.crawl_category_url(&url, None).await;
    assert_eq!(outcome.category.name, "Travel");
    assert_eq!(
        outcome.export_path,
        Some(out.path().join("Travel_books_details.csv"))
    );
}

#[tokio::test]
async fn test_detail_over_http() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let config = create_test_config(&mock_server.uri(), Path::new("."), WriteMode::Append);
    let fetcher = HttpFetcher::from_config(&config).unwrap();
    let url = format!("{}/catalogue/clue_4/index.html", mock_server.uri());

    let record = extract_detail(&fetcher, &url).await.expect("Page should load");
    assert_eq!(record.title, "Clue");
    assert_eq!(record.quantity_available, Quantity::Count(5));
    assert_eq!(record.rating, Some(Rating::Two));

    let missing = format!("{}/catalogue/alibi_5/index.html", mock_server.uri());
    assert!(extract_detail(&fetcher, &missing).await.is_none());
}

#[tokio::test]
async fn test_body_decoded_as_utf8_despite_advertised_charset() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/latin1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes("<p class=\"price_color\">£51.77</p>".as_bytes().to_vec())
                .insert_header("content-type", "text/html; charset=iso-8859-1"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server.uri(), Path::new("."), WriteMode::Append);
    let fetcher = HttpFetcher::from_config(&config).unwrap();
    let body = fetcher
        .fetch(&format!("{}/latin1", mock_server.uri()))
        .await
        .expect("Page should load");

    assert_eq!(body, "<p class=\"price_color\">£51.77</p>");
    assert!(!body.contains('Â'));
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let mock_server = MockServer::start().await;
    let mut config = create_test_config(&mock_server.uri(), Path::new("."), WriteMode::Append);
    config.user_agent.crawler_name = "TestBot".to_string();
    config.user_agent.crawler_version = "1.0.0".to_string();

    Mock::given(method("GET"))
        .and(path("/ua"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = HttpFetcher::from_config(&config).unwrap();
    let body = fetcher
        .fetch(&format!("{}/ua", mock_server.uri()))
        .await
        .expect("User agent should match");
    assert_eq!(body, "ok");
}
