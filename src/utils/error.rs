use thiserror::Error;

/// Failure raised by the reconciler when an observation breaks its input contract.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    #[error("Invalid observation for {url}: {reason}")]
    InvalidObservation { url: String, reason: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Fetch failed for {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Notifier error: {notifier}: {message}")]
    Notify { notifier: String, message: String },

    #[error("Record store error: {0}")]
    Store(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    pub fn fetch(url: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Fetch {
            url: url.into(),
            message: message.to_string(),
        }
    }

    pub fn notify(notifier: impl Into<String>, message: impl std::fmt::Display) -> Self {
        AppError::Notify {
            notifier: notifier.into(),
            message: message.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
