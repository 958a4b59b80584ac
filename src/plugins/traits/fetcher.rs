use async_trait::async_trait;

use crate::models::Observation;
use crate::utils::error::AppError;

/// Turns a listing URL into a fresh `(price, title)` observation.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    fn plugin_type(&self) -> &str;

    async fn fetch(&self, url: &str) -> Result<Observation, AppError>;
}
