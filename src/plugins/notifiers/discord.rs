use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::config::DiscordConfig;
use crate::plugins::traits::Notifier;
use crate::utils::error::AppError;

/// Discord rejects webhook content longer than this.
const MAX_CONTENT_CHARS: usize = 2000;

pub struct DiscordNotifier {
    client: Client,
    webhook_url: String,
    username: String,
}

impl DiscordNotifier {
    pub fn new(webhook_url: impl Into<String>, username: impl Into<String>) -> Result<Self, AppError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(DiscordNotifier {
            client,
            webhook_url: webhook_url.into(),
            username: username.into(),
        })
    }

    pub fn from_config(config: &DiscordConfig) -> Result<Self, AppError> {
        let webhook_url = config
            .webhook_url
            .clone()
            .ok_or_else(|| AppError::Validation("Missing webhook_url".to_string()))?;
        Self::new(webhook_url, config.username.clone())
    }

    fn create_webhook_payload(&self, message: &str) -> serde_json::Value {
        let content: String = message.chars().take(MAX_CONTENT_CHARS).collect();
        json!({
            "content": content,
            "username": self.username,
        })
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    fn plugin_type(&self) -> &str {
        "discord"
    }

    async fn notify(&self, message: &str) -> Result<(), AppError> {
        let payload = self.create_webhook_payload(message);

        let response = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::notify(self.plugin_type(), e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::notify(
                self.plugin_type(),
                format!("webhook returned {}", status),
            ));
        }

        Ok(())
    }
}
