use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::extract::PageSelectors;
use crate::config::ScraperConfig;
use crate::models::Observation;
use crate::plugins::traits::PageFetcher;
use crate::utils::error::AppError;

/// Fetches listing pages with a plain HTTP GET. Works for pages that render
/// their price server-side.
pub struct HttpFetcher {
    client: Client,
    selectors: PageSelectors,
}

impl HttpFetcher {
    pub fn new(config: &ScraperConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;

        Ok(Self {
            client,
            selectors: PageSelectors::from_config(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    fn plugin_type(&self) -> &str {
        "http"
    }

    async fn fetch(&self, url: &str) -> Result<Observation, AppError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| AppError::fetch(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::fetch(url, format!("HTTP status {}", status)));
        }

        let body = response.text().await.map_err(|e| AppError::fetch(url, e))?;
        self.selectors.extract(url, &body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FetcherKind;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn get_test_config() -> ScraperConfig {
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

    #[tokio::test]
    async fn test_fetch_listing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dp/widget"))
            .and(header("user-agent", "PriceWatch-Test/1.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"<span id="productTitle"> Widget </span><span class="a-price-whole">2,200</span>"#,
            ))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&get_test_config()).unwrap();
        let observation = fetcher.fetch(&format!("{}/dp/widget", server.uri())).await.unwrap();

        assert_eq!(observation, Observation::new(2200, "Widget"));
        assert_eq!(fetcher.plugin_type(), "http");
    }

    #[tokio::test]
    async fn test_fetch_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&get_test_config()).unwrap();
        let url = format!("{}/dp/widget", server.uri());
        let err = fetcher.fetch(&url).await.unwrap_err();

        match err {
            AppError::Fetch { url: failed, message } => {
                assert_eq!(failed, url);
                assert!(message.contains("503"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_page_without_price() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>gone</body></html>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&get_test_config()).unwrap();
        let err = fetcher.fetch(&server.uri()).await.unwrap_err();
        assert!(err.to_string().contains("price element"));
    }
}
