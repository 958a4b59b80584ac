use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::message::{ChangeKind, ChangeType, MessageLanguage, PriceChange};
use crate::models::{Observation, TrackedItem};
use crate::utils::error::ReconcileError;

/// A change worth telling someone about, with its rendered text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub change: PriceChange,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReconciliationResult {
    pub item: TrackedItem,
    /// `None` on the no-op path.
    pub notification: Option<Notification>,
}

impl ReconciliationResult {
    pub fn is_changed(&self) -> bool {
        self.notification.is_some()
    }

    pub fn message(&self) -> Option<&str> {
        self.notification.as_ref().map(|n| n.message.as_str())
    }
}

/// Decides whether a fresh observation changes a tracked item.
///
/// Pure: no I/O, never mutates its inputs. The only outside input is the
/// current instant, which [`Reconciler::reconcile_at`] takes explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reconciler {
    language: MessageLanguage,
}

impl Reconciler {
    pub fn new(language: MessageLanguage) -> Self {
        Self { language }
    }

    pub fn reconcile(
        &self,
        item: &TrackedItem,
        observation: &Observation,
    ) -> Result<ReconciliationResult, ReconcileError> {
        self.reconcile_at(item, observation, Utc::now())
    }

    pub fn reconcile_at(
        &self,
        item: &TrackedItem,
        observation: &Observation,
        now: DateTime<Utc>,
    ) -> Result<ReconciliationResult, ReconcileError> {
        let (price, title) = validate(item, observation)?;

        let kind = match item.last_checked_price {
            None => ChangeKind::NewItem,
            Some(last) if last == price => {
                return Ok(ReconciliationResult {
                    item: item.clone(),
                    notification: None,
                });
            }
            Some(last) => {
                let diff = i128::from(price) - i128::from(last);
                ChangeKind::Update {
                    change_type: ChangeType::from_diff(diff),
                    amount: price.abs_diff(last),
                }
            }
        };

        let change = PriceChange {
            title: title.to_string(),
            url: item.url.clone(),
            price,
            kind,
        };
        let message = change.render(self.language);

        Ok(ReconciliationResult {
            item: TrackedItem {
                url: item.url.clone(),
                last_checked_price: Some(price),
                last_checked_time: Some(now),
            },
            notification: Some(Notification { change, message }),
        })
    }
}

fn validate<'a>(
    item: &TrackedItem,
    observation: &'a Observation,
) -> Result<(u64, &'a str), ReconcileError> {
    let invalid = |reason: String| ReconcileError::InvalidObservation {
        url: item.url.clone(),
        reason,
    };

    let price = u64::try_from(observation.price)
        .map_err(|_| invalid(format!("price is negative ({})", observation.price)))?;

    let title = observation.title.trim();
    if title.is_empty() {
        return Err(invalid("title is empty".to_string()));
    }

    Ok((price, title))
}
