pub mod csv_file;
pub mod memory;

pub use csv_file::CsvRecordStore;
pub use memory::MemoryRecordStore;

use std::collections::HashSet;

use crate::models::TrackedItem;
use crate::utils::error::AppError;

/// Durable home of the tracked items.
///
/// `save` replaces the whole record set; implementations must make it atomic
/// so that a crash leaves either the old or the new set behind. Callers holding
/// an older copy of the set should use `update` so edits made since their
/// `load` survive.
pub trait RecordStore: Send + Sync {
    fn load(&self) -> Result<Vec<TrackedItem>, AppError>;

    fn save(&self, items: &[TrackedItem]) -> Result<(), AppError>;

    /// Starts tracking `url` as an unseen item.
    fn add(&self, url: &str) -> Result<TrackedItem, AppError> {
        let url = url.trim();
        url::Url::parse(url).map_err(|e| AppError::Validation(format!("Invalid URL '{}': {}", url, e)))?;

        let mut items = self.load()?;
        if items.iter().any(|item| item.url == url) {
            return Err(AppError::Validation(format!("Already tracking {}", url)));
        }

        let item = TrackedItem::unseen(url);
        items.push(item.clone());
        self.save(&items)?;
        Ok(item)
    }

    /// Replaces the record with the same URL, re-reading the set first.
    /// Returns `false` without writing when the URL is no longer tracked.
    fn update(&self, item: &TrackedItem) -> Result<bool, AppError> {
        let mut items = self.load()?;
        let Some(slot) = items.iter_mut().find(|existing| existing.url == item.url) else {
            return Ok(false);
        };
        *slot = item.clone();
        self.save(&items)?;
        Ok(true)
    }

    /// Stops tracking `url`. Returns whether it was tracked.
    fn remove(&self, url: &str) -> Result<bool, AppError> {
        let mut items = self.load()?;
        let before = items.len();
        items.retain(|item| item.url != url.trim());
        if items.len() == before {
            return Ok(false);
        }
        self.save(&items)?;
        Ok(true)
    }
}

/// URLs are the identity key of a record set.
pub fn ensure_unique_urls(items: &[TrackedItem]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.url.as_str()) {
            return Err(AppError::Store(format!("Duplicate URL in record set: {}", item.url)));
        }
    }
    Ok(())
}
