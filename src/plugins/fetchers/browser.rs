use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions};
use std::ffi::OsStr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use super::extract::PageSelectors;
use crate::config::ScraperConfig;
use crate::models::Observation;
use crate::plugins::traits::PageFetcher;
use crate::utils::error::AppError;

/// Drives a headless Chrome so that prices rendered by JavaScript are seen.
///
/// `headless_chrome` is blocking, so every browser call runs on the blocking
/// thread pool.
pub struct BrowserFetcher {
    browser: Arc<Browser>,
    selectors: Arc<PageSelectors>,
    user_agent: String,
    timeout: Duration,
}

impl BrowserFetcher {
    pub async fn launch(config: &ScraperConfig) -> Result<Self, AppError> {
        let selectors = PageSelectors::from_config(config)?;
        let chrome_path = config.chrome_path.clone();

        let browser = tokio::task::spawn_blocking(move || launch_browser(chrome_path))
            .await
            .map_err(|e| AppError::Validation(format!("Browser launch task failed: {}", e)))??;

        tracing::debug!("Headless browser launched");

        Ok(Self {
            browser: Arc::new(browser),
            selectors: Arc::new(selectors),
            user_agent: config.user_agent.clone(),
            timeout: Duration::from_secs(config.request_timeout),
        })
    }
}

fn launch_browser(chrome_path: Option<String>) -> Result<Browser, AppError> {
    let mut launch_options = LaunchOptions::default_builder()
        .headless(true)
        .sandbox(false) // Often needed in containerized environments
        .args(vec![
            OsStr::new("--no-sandbox"),
            OsStr::new("--disable-dev-shm-usage"),
            OsStr::new("--disable-gpu"),
            OsStr::new("--disable-extensions"),
        ])
        .build()
        .map_err(|e| AppError::Validation(format!("Failed to create launch options: {}", e)))?;

    if let Some(chrome_path) = chrome_path {
        launch_options.path = Some(PathBuf::from(chrome_path));
    }

    Browser::new(launch_options).map_err(|e| AppError::Validation(format!("Failed to launch browser: {}", e)))
}

#[async_trait]
impl PageFetcher for BrowserFetcher {
    fn plugin_type(&self) -> &str {
        "browser"
    }

    async fn fetch(&self, url: &str) -> Result<Observation, AppError> {
        let browser = Arc::clone(&self.browser);
        let selectors = Arc::clone(&self.selectors);
        let user_agent = self.user_agent.clone();
        let timeout = self.timeout;
        let target = url.to_string();

        tokio::task::spawn_blocking(move || {
            let fail = |e: &dyn std::fmt::Display| AppError::fetch(&target, e);

            let tab = browser.new_tab().map_err(|e| fail(&e))?;
            tab.set_default_timeout(timeout);
            tab.set_user_agent(&user_agent, None, None).map_err(|e| fail(&e))?;

            let html = tab
                .navigate_to(&target)
                .and_then(|tab| tab.wait_until_navigated())
                .and_then(|tab| {
                    tab.wait_for_element_with_custom_timeout(selectors.price_selector(), timeout)?;
                    tab.get_content()
                });

            note_tab_closed(&target, tab.close(true));

            let html = html.map_err(|e| fail(&e))?;
            selectors.extract(&target, &html)
        })
        .await
        .map_err(|e| AppError::fetch(url, format!("browser task failed: {}", e)))?
    }
}

/// Logs a tab that Chrome failed to close; returns whether it closed.
fn note_tab_closed(url: &str, closed: anyhow::Result<bool>) -> bool {
    match closed {
        Ok(true) => true,
        Ok(false) => {
            tracing::warn!("Chrome left the tab for {} open", url);
            false
        }
        Err(e) => {
            tracing::warn!("Failed to close tab for {}: {}", url, e);
            false
        }
    }
}
