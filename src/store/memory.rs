use std::sync::{Mutex, MutexGuard};

use super::{ensure_unique_urls, RecordStore};
use crate::models::TrackedItem;
use crate::utils::error::AppError;

/// Keeps records in memory. Used by tests and when embedding the checker.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    items: Mutex<Vec<TrackedItem>>,
    saves: Mutex<usize>,
}

impl MemoryRecordStore {
    pub fn new(items: Vec<TrackedItem>) -> Self {
        Self {
            items: Mutex::new(items),
            saves: Mutex::new(0),
        }
    }

    pub fn items(&self) -> Vec<TrackedItem> {
        lock(&self.items).clone()
    }

    /// How many writes (`save` or `update`) have happened.
    pub fn saves(&self) -> usize {
        *lock(&self.saves)
    }
}

// A poisoned lock still holds a consistent Vec; saves replace it wholesale.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl RecordStore for MemoryRecordStore {
    fn load(&self) -> Result<Vec<TrackedItem>, AppError> {
        let items = self.items();
        ensure_unique_urls(&items)?;
        Ok(items)
    }

    fn save(&self, items: &[TrackedItem]) -> Result<(), AppError> {
        ensure_unique_urls(items)?;
        *lock(&self.items) = items.to_vec();
        *lock(&self.saves) += 1;
        Ok(())
    }

    fn update(&self, item: &TrackedItem) -> Result<bool, AppError> {
        let mut items = lock(&self.items);
        let Some(slot) = items.iter_mut().find(|existing| existing.url == item.url) else {
            return Ok(false);
        };
        *slot = item.clone();
        *lock(&self.saves) += 1;
        Ok(true)
    }
}
