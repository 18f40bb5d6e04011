use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Notification request failed: {0}")]
    RequestFailed(String),

    #[error("Notification rejected with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

/// Best-effort delivery of a run-completion message.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `message`. Callers log and otherwise ignore failures.
    async fn notify(&self, message: &str) -> Result<(), NotifyError>;

    /// Name of this notification backend
    fn backend_name(&self) -> &'static str;
}
