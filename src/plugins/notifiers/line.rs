use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::config::LineConfig;
use crate::plugins::traits::Notifier;
use crate::utils::error::AppError;

/// Posts messages to LINE Notify.
pub struct LineNotifier {
    client: Client,
    endpoint: String,
    token: String,
}

impl LineNotifier {
    pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            token: token.into(),
        })
    }

    pub fn from_config(config: &LineConfig) -> Result<Self, AppError> {
        let token = config
            .token
            .clone()
            .ok_or_else(|| AppError::Validation("LINE token is not configured".to_string()))?;
        Self::new(config.endpoint.clone(), token)
    }
}

#[async_trait]
impl Notifier for LineNotifier {
    fn plugin_type(&self) -> &str {
        "line"
    }

    async fn notify(&self, message: &str) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .form(&[("message", message)])
            .send()
            .await
            .map_err(|e| AppError::notify(self.plugin_type(), e))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::notify(
                self.plugin_type(),
                format!("LINE Notify returned {}: {}", status, body.trim()),
            ));
        }

        Ok(())
    }
}
