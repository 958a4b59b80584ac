pub mod message;
pub mod reconciler;

pub use message::{ChangeKind, ChangeType, MessageLanguage, PriceChange};
pub use reconciler::{Notification, ReconciliationResult, Reconciler};
