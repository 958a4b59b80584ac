use std::sync::Arc;

use super::fetchers::{BrowserFetcher, HttpFetcher, RetryingFetcher};
use super::notifiers::{ConsoleNotifier, DiscordNotifier, LineNotifier};
use super::traits::{Notifier, PageFetcher};
use crate::config::{FetcherKind, NotificationsConfig, NotifierKind, ScraperConfig};
use crate::utils::error::AppError;

/// Builds the configured collaborators behind their trait objects.
pub struct PluginManager;

impl PluginManager {
    /// The configured page fetcher, wrapped with retries when asked for.
    pub async fn fetcher(config: &ScraperConfig) -> Result<Arc<dyn PageFetcher>, AppError> {
        let fetcher: Arc<dyn PageFetcher> = match config.fetcher {
            FetcherKind::Browser => Arc::new(BrowserFetcher::launch(config).await?),
            FetcherKind::Http => Arc::new(HttpFetcher::new(config)?),
        };

        if config.retry_attempts == 0 {
            return Ok(fetcher);
        }

        Ok(Arc::new(RetryingFetcher::new(
            fetcher,
            config.retry_attempts,
            config.retry_delay_ms,
        )))
    }

    pub fn notifier(config: &NotificationsConfig) -> Result<Arc<dyn Notifier>, AppError> {
        let notifier: Arc<dyn Notifier> = match config.notifier {
            NotifierKind::Line => Arc::new(LineNotifier::from_config(&config.line)?),
            NotifierKind::Discord => Arc::new(DiscordNotifier::from_config(&config.discord)?),
            NotifierKind::Console => Arc::new(ConsoleNotifier::new()),
        };
        tracing::debug!("Using {} notifier", notifier.plugin_type());
        Ok(notifier)
    }
}
