pub mod checker;
pub mod config;
pub mod core;
pub mod models;
pub mod plugins;
pub mod store;
pub mod telemetry;
pub mod utils;

// Re-export commonly used types
pub use checker::{CheckSummary, PriceChecker};
pub use config::AppConfig;
pub use crate::core::{ReconciliationResult, Reconciler};
pub use models::{Observation, TrackedItem};
pub use utils::error::{AppError, ReconcileError};

pub type Result<T> = std::result::Result<T, AppError>;
