use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked listing, keyed by its URL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrackedItem {
    pub url: String,
    /// `None` until the listing has been observed once.
    pub last_checked_price: Option<u64>,
    pub last_checked_time: Option<DateTime<Utc>>,
}

impl TrackedItem {
    /// A listing that has never been checked.
    pub fn unseen(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            last_checked_price: None,
            last_checked_time: None,
        }
    }

    pub fn seen(url: impl Into<String>, price: u64, at: DateTime<Utc>) -> Self {
        Self {
            url: url.into(),
            last_checked_price: Some(price),
            last_checked_time: Some(at),
        }
    }

    pub fn is_unseen(&self) -> bool {
        self.last_checked_price.is_none()
    }
}
