use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::Instant;

use crate::config::{CheckerConfig, FailurePolicy};
use crate::core::{ChangeKind, ReconciliationResult, Reconciler};
use crate::models::TrackedItem;
use crate::plugins::traits::{Notifier, PageFetcher};
use crate::store::RecordStore;
use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItemFailure {
    pub url: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CheckSummary {
    pub total_items: usize,
    pub new_items: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub notifications_sent: usize,
    /// Items never started because the pass aborted.
    pub not_run: usize,
    pub failures: Vec<ItemFailure>,
    pub aborted: bool,
    pub total_time_ms: u64,
}

impl CheckSummary {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

impl fmt::Display for CheckSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} items: {} new, {} updated, {} unchanged, {} failed, {} not run; {} notifications sent in {} ms",
            self.total_items,
            self.new_items,
            self.updated,
            self.unchanged,
            self.failed(),
            self.not_run,
            self.notifications_sent,
            self.total_time_ms,
        )?;
        if self.aborted {
            write!(f, " (aborted)")?;
        }
        Ok(())
    }
}

enum ItemOutcome {
    Checked(ReconciliationResult),
    NotRun,
}

/// Runs reconciliation passes over every tracked item.
///
/// Per item: fetch, reconcile, notify, then persist. A change is persisted only
/// after its notification went out, so a failed delivery is retried on the
/// next pass rather than lost. Each change is written as a single-record
/// update, never as the set loaded at the start of the pass.
pub struct PriceChecker {
    fetcher: Arc<dyn PageFetcher>,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn RecordStore>,
    reconciler: Reconciler,
    config: CheckerConfig,
}

impl PriceChecker {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn RecordStore>,
        reconciler: Reconciler,
        config: CheckerConfig,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            store,
            reconciler,
            config,
        }
    }

    /// One pass over the record set.
    ///
    /// Item failures are reported in the summary; only record store failures
    /// end the pass with an error.
    pub async fn run_once(&self) -> Result<CheckSummary, AppError> {
        let start_time = Instant::now();
        let records = self.store.load()?;
        let mut summary = CheckSummary {
            total_items: records.len(),
            ..CheckSummary::default()
        };

        tracing::info!(
            "Checking {} tracked items with {} fetcher",
            records.len(),
            self.fetcher.plugin_type()
        );

        let stop = AtomicBool::new(false);
        let mut results = stream::iter(records.iter().enumerate())
            .map(|(index, item)| {
                let stop = &stop;
                async move {
                    if stop.load(Ordering::SeqCst) {
                        return (index, Ok(ItemOutcome::NotRun));
                    }
                    (index, self.check_item(item).await.map(ItemOutcome::Checked))
                }
            })
            .buffer_unordered(self.config.max_concurrent_checks.max(1));

        while let Some((index, outcome)) = results.next().await {
            let url = &records[index].url;
            match outcome {
                Ok(ItemOutcome::NotRun) => summary.not_run += 1,
                Ok(ItemOutcome::Checked(result)) => {
                    let Some(notification) = result.notification else {
                        tracing::debug!("No change for {}", url);
                        summary.unchanged += 1;
                        continue;
                    };

                    summary.notifications_sent += 1;
                    match notification.change.kind {
                        ChangeKind::NewItem => summary.new_items += 1,
                        ChangeKind::Update { .. } => summary.updated += 1,
                    }

                    // Re-read the store so add/remove edits made during the pass survive
                    if !self.store.update(&result.item)? {
                        tracing::warn!("{} was removed during the pass; not recording its price", url);
                        continue;
                    }
                    tracing::info!(
                        "Recorded price {} for {}",
                        notification.change.price,
                        url
                    );
                }
                Err(e) => {
                    summary.failures.push(ItemFailure {
                        url: url.clone(),
                        error: e.to_string(),
                    });
                    match self.config.on_error {
                        FailurePolicy::Abort => {
                            tracing::error!("Check failed for {}, aborting pass: {}", url, e);
                            summary.aborted = true;
                            stop.store(true, Ordering::SeqCst);
                        }
                        FailurePolicy::Skip => {
                            tracing::warn!("Check failed for {}, skipping: {}", url, e);
                        }
                    }
                }
            }
        }

        summary.total_time_ms = start_time.elapsed().as_millis() as u64;
        tracing::info!("Pass finished: {}", summary);
        Ok(summary)
    }

    async fn check_item(&self, item: &TrackedItem) -> Result<ReconciliationResult, AppError> {
        let observation = self.fetcher.fetch(&item.url).await?;
        let result = self.reconciler.reconcile(item, &observation)?;

        if let Some(message) = result.message() {
            self.notifier.notify(message).await?;
        }

        Ok(result)
    }
}
