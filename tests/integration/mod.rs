// Integration tests for pricewatch
// These tests drive full passes through real collaborators against mock servers

pub mod check_pass_tests;

use std::path::Path;
use std::sync::Arc;

use pricewatch::config::{CheckerConfig, FailurePolicy, FetcherKind, ScraperConfig};
use pricewatch::core::{MessageLanguage, Reconciler};
use pricewatch::plugins::notifiers::LineNotifier;
use pricewatch::plugins::PluginManager;
use pricewatch::store::CsvRecordStore;
use pricewatch::PriceChecker;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const HEADER: &str = "url,last_checked_price,last_checked_time\n";
pub const NOTIFY_PATH: &str = "/api/notify";

/// Test configuration for the plain HTTP fetcher
pub fn get_scraper_config() -> ScraperConfig {
    ScraperConfig {
        fetcher: FetcherKind::Http,
        price_selector: "span.a-price-whole".to_string(),
        title_selector: "#productTitle".to_string(),
        request_timeout: 5,
        user_agent: "PriceWatch-Test/1.0".to_string(),
        chrome_path: None,
        retry_attempts: 0,
        retry_delay_ms: 10,
    }
}

pub fn listing_html(title: &str, price: &str) -> String {
    format!(
        r#"<html><body>
            <span id="productTitle">
                {title}
            </span>
            <span class="a-price-symbol">￥</span><span class="a-price-whole">{price}</span>
        </body></html>"#
    )
}

/// Serves a listing page at `page_path`.
pub async fn mount_listing(server: &MockServer, page_path: &str, title: &str, price: &str) {
    Mock::given(method("GET"))
        .and(path(page_path))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing_html(title, price)))
        .mount(server)
        .await;
}

pub async fn mount_line_endpoint(server: &MockServer, status: u16) {
    Mock::given(method("POST"))
        .and(path(NOTIFY_PATH))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Decoded `message` fields of every notification the mock server received.
pub async fn sent_messages(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == NOTIFY_PATH)
        .filter_map(|request| {
            url::form_urlencoded::parse(&request.body)
                .find(|(key, _)| key == "message")
                .map(|(_, value)| value.into_owned())
        })
        .collect()
}

pub async fn create_checker(
    server: &MockServer,
    store_path: &Path,
    on_error: FailurePolicy,
    language: MessageLanguage,
) -> anyhow::Result<PriceChecker> {
    let fetcher = PluginManager::fetcher(&get_scraper_config()).await?;
    let notifier = Arc::new(LineNotifier::new(
        format!("{}{}", server.uri(), NOTIFY_PATH),
        "integration-token",
    )?);
    let store = Arc::new(CsvRecordStore::new(store_path));

    Ok(PriceChecker::new(
        fetcher,
        notifier,
        store,
        Reconciler::new(language),
        CheckerConfig {
            max_concurrent_checks: 2,
            on_error,
        },
    ))
}
