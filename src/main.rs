use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

use pricewatch::config::AppConfig;
use pricewatch::core::Reconciler;
use pricewatch::plugins::PluginManager;
use pricewatch::store::{CsvRecordStore, RecordStore};
use pricewatch::{telemetry, PriceChecker};

#[derive(Debug, Parser)]
#[command(name = "pricewatch", version, about = "Watches product listings and notifies on price changes")]
struct Cli {
    /// Directory holding default.toml / <RUN_MODE>.toml / local.toml
    #[arg(long, default_value = "config")]
    config: PathBuf,

    /// Record store to use instead of the configured one
    #[arg(long)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one reconciliation pass over every tracked item (default)
    Check,
    /// Print the tracked items
    List,
    /// Start tracking a listing
    Add { url: String },
    /// Stop tracking a listing
    Remove { url: String },
    /// Send a message through the configured notifier
    TestNotify {
        #[arg(default_value = "pricewatch test notification")]
        message: String,
    },
    /// Print the effective configuration with secrets masked
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Check);

    let mut config = AppConfig::load_unvalidated(&cli.config)
        .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
    if let Some(store) = cli.store {
        config.store.path = store;
    }

    let _guard = telemetry::init(&config.logging)?;
    let store = CsvRecordStore::new(config.store.path.clone());

    match command {
        Command::Check => {
            config.validate()?;
            store.ensure_exists()?;
            info!("Starting price check against {}", store.path().display());

            let fetcher = PluginManager::fetcher(&config.scraper).await?;
            let notifier = PluginManager::notifier(&config.notifications)?;
            let checker = PriceChecker::new(
                fetcher,
                notifier,
                Arc::new(store),
                Reconciler::new(config.notifications.language),
                config.checker.clone(),
            );

            let summary = checker.run_once().await?;
            println!("{}", summary);
            for failure in &summary.failures {
                println!("  failed: {} ({})", failure.url, failure.error);
            }
            if summary.aborted {
                bail!("Pass aborted after {} failure(s)", summary.failed());
            }
        }
        Command::List => {
            for item in store.load()? {
                let price = item.last_checked_price.map(|p| p.to_string()).unwrap_or_else(|| "-".into());
                let time = item.last_checked_time.map(|t| t.to_rfc3339()).unwrap_or_else(|| "-".into());
                println!("{}\t{}\t{}", price, time, item.url);
            }
        }
        Command::Add { url } => {
            let item = store.add(&url)?;
            info!("Now tracking {}", item.url);
        }
        Command::Remove { url } => {
            if !store.remove(&url)? {
                bail!("Not tracking {}", url);
            }
            info!("Stopped tracking {}", url);
        }
        Command::TestNotify { message } => {
            config.validate()?;
            let notifier = PluginManager::notifier(&config.notifications)?;
            notifier.notify(&message).await?;
            info!("Test message delivered via {}", notifier.plugin_type());
        }
        Command::ShowConfig => {
            print!("{}", toml::to_string_pretty(&config.redacted())?);
        }
    }

    Ok(())
}
