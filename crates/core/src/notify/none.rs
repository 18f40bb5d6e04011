use async_trait::async_trait;

use super::{Notifier, NotifyError};

/// Notifier that drops every message
pub struct NoopNotifier;

impl NoopNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoopNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NoopNotifier {
    async fn notify(&self, _message: &str) -> Result<(), NotifyError> {
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_notifier_accepts_message() {
        let notifier = NoopNotifier::new();
        assert!(notifier.notify("done").await.is_ok());
        assert_eq!(notifier.backend_name(), "none");
    }
}
