pub mod error;

pub use error::{AppError, ReconcileError};
