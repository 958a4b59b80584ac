use async_trait::async_trait;
use std::sync::Arc;
use tokio_retry::strategy::FixedInterval;
use tokio_retry::Retry;

use crate::models::Observation;
use crate::plugins::traits::PageFetcher;
use crate::utils::error::AppError;

/// Retries a failed fetch a fixed number of times with a fixed delay.
pub struct RetryingFetcher {
    inner: Arc<dyn PageFetcher>,
    attempts: usize,
    delay_ms: u64,
}

impl RetryingFetcher {
    pub fn new(inner: Arc<dyn PageFetcher>, attempts: u32, delay_ms: u64) -> Self {
        Self {
            inner,
            attempts: attempts as usize,
            delay_ms,
        }
    }
}

#[async_trait]
impl PageFetcher for RetryingFetcher {
    fn plugin_type(&self) -> &str {
        self.inner.plugin_type()
    }

    async fn fetch(&self, url: &str) -> Result<Observation, AppError> {
        let strategy = FixedInterval::from_millis(self.delay_ms).take(self.attempts);

        Retry::spawn(strategy, || async {
            self.inner.fetch(url).await.map_err(|e| {
                tracing::debug!("Fetch attempt for {} failed: {}", url, e);
                e
            })
        })
        .await
    }
}
