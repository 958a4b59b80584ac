use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use url::Url;

use crate::core::MessageLanguage;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub scraper: ScraperConfig,
    pub checker: CheckerConfig,
    pub notifications: NotificationsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FetcherKind {
    Browser,
    Http,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub fetcher: FetcherKind,
    pub price_selector: String,
    pub title_selector: String,
    /// Seconds.
    pub request_timeout: u64,
    pub user_agent: String,
    pub chrome_path: Option<String>,
    pub retry_attempts: u32,
    pub retry_delay_ms: u64,
}

/// What a pass does when one item fails to fetch, reconcile or notify.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the pass at the first failure.
    #[default]
    Abort,
    /// Log it, leave the item untouched and carry on.
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckerConfig {
    pub max_concurrent_checks: usize,
    pub on_error: FailurePolicy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotifierKind {
    Line,
    Discord,
    Console,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationsConfig {
    pub notifier: NotifierKind,
    pub language: MessageLanguage,
    pub line: LineConfig,
    pub discord: DiscordConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineConfig {
    pub token: Option<String>,
    pub endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    pub webhook_url: Option<String>,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Enables a daily rolling log file in this directory.
    pub directory: Option<PathBuf>,
}

pub const DEFAULT_LINE_ENDPOINT: &str = "https://notify-api.line.me/api/notify";
const DISCORD_WEBHOOK_PREFIX: &str = "https://discord.com/api/webhooks/";

impl AppConfig {
    pub fn load(config_dir: &Path) -> Result<Self, ConfigError> {
        let config = Self::load_unvalidated(config_dir)?;
        config.validate()?;
        Ok(config)
    }

    /// Like [`AppConfig::load`] but skips validation, for commands that only
    /// touch the record store.
    pub fn load_unvalidated(config_dir: &Path) -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        let file = |name: &str| File::with_name(&config_dir.join(name).to_string_lossy()).required(false);

        let s = Self::builder_with_defaults()?
            .add_source(file("default"))
            .add_source(file(&run_mode))
            // Local overrides (ignored by git)
            .add_source(file("local"))
            // PRICEWATCH__NOTIFICATIONS__LINE__TOKEN=... style overrides
            .add_source(
                Environment::with_prefix("PRICEWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: AppConfig = s.try_deserialize()?;
        config.apply_env_fallbacks();
        Ok(config)
    }

    /// Built-in defaults; a deployment needs no config file at all.
    pub fn defaults() -> Result<Self, ConfigError> {
        Self::builder_with_defaults()?.build()?.try_deserialize()
    }

    fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("store.path", "prices.csv")?
            .set_default("scraper.fetcher", "browser")?
            .set_default("scraper.price_selector", "span.a-price-whole")?
            .set_default("scraper.title_selector", "#productTitle")?
            .set_default("scraper.request_timeout", 30)?
            .set_default(
                "scraper.user_agent",
                "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36",
            )?
            .set_default("scraper.retry_attempts", 0)?
            .set_default("scraper.retry_delay_ms", 1000)?
            .set_default("checker.max_concurrent_checks", 1)?
            .set_default("checker.on_error", "abort")?
            .set_default("notifications.notifier", "line")?
            .set_default("notifications.language", "ja")?
            .set_default("notifications.line.endpoint", DEFAULT_LINE_ENDPOINT)?
            .set_default("notifications.discord.username", "pricewatch")?
            .set_default("logging.level", "info")
    }

    fn apply_env_fallbacks(&mut self) {
        if self.scraper.chrome_path.is_none() {
            self.scraper.chrome_path = env::var("CHROME_PATH").ok();
        }
        if self.notifications.line.token.is_none() {
            self.notifications.line.token = env::var("LINE_TOKEN").ok();
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.store.path.as_os_str().is_empty() {
            return Err(ConfigError::Message("Store path must not be empty".into()));
        }

        if self.scraper.request_timeout == 0 {
            return Err(ConfigError::Message("Scraper request_timeout must be greater than 0".into()));
        }

        if self.scraper.price_selector.trim().is_empty() || self.scraper.title_selector.trim().is_empty() {
            return Err(ConfigError::Message("Scraper price_selector and title_selector must be set".into()));
        }

        if self.checker.max_concurrent_checks == 0 {
            return Err(ConfigError::Message("Checker max_concurrent_checks must be greater than 0".into()));
        }

        match self.notifications.notifier {
            NotifierKind::Line => {
                let token = self.notifications.line.token.as_deref().unwrap_or_default();
                if token.trim().is_empty() {
                    return Err(ConfigError::Message("LINE notifier selected but no token configured".into()));
                }
                if Url::parse(&self.notifications.line.endpoint).is_err() {
                    return Err(ConfigError::Message("Invalid LINE endpoint URL".into()));
                }
            }
            NotifierKind::Discord => {
                let webhook = self.notifications.discord.webhook_url.as_deref().unwrap_or_default();
                if !webhook.starts_with(DISCORD_WEBHOOK_PREFIX) {
                    return Err(ConfigError::Message("Invalid Discord webhook URL format".into()));
                }
            }
            NotifierKind::Console => {}
        }

        Ok(())
    }

    /// Copy safe to print: secrets are masked.
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.notifications.line.token.is_some() {
            config.notifications.line.token = Some("********".into());
        }
        if config.notifications.discord.webhook_url.is_some() {
            config.notifications.discord.webhook_url = Some(format!("{}********", DISCORD_WEBHOOK_PREFIX));
        }
        config
    }
}
