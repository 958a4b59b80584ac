use async_trait::async_trait;

use crate::plugins::traits::Notifier;
use crate::utils::error::AppError;

/// Prints messages to stdout. Handy for dry runs.
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    pub fn new() -> Self {
        ConsoleNotifier
    }
}

#[async_trait]
impl Notifier for ConsoleNotifier {
    fn plugin_type(&self) -> &str {
        "console"
    }

    async fn notify(&self, message: &str) -> Result<(), AppError> {
        println!("{}\n", message);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_ok, block_on};

    #[test]
    fn test_console_notifier_always_delivers() {
        let notifier = ConsoleNotifier::new();
        assert_eq!(notifier.plugin_type(), "console");
        assert_ok!(block_on(notifier.notify("Price update: \"Widget\" is now 1500.")));
    }
}
