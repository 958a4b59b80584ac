use async_trait::async_trait;

use crate::utils::error::AppError;

/// Delivers a fully rendered message to an external channel.
///
/// `Ok(())` means the channel accepted the message; anything else is an error
/// so callers always know whether delivery happened.
#[async_trait]
pub trait Notifier: Send + Sync {
    fn plugin_type(&self) -> &str;

    async fn notify(&self, message: &str) -> Result<(), AppError>;
}
