//! Run-completion notifications.
//!
//! Delivery is best effort: a failed notification is logged and has no effect
//! on the outcome of the run.

mod none;
mod pushover;
mod traits;

pub use none::*;
pub use pushover::*;
pub use traits::*;

use crate::config::NotifyConfig;

/// Factory function to create a notifier from config
pub fn create_notifier(config: &NotifyConfig) -> Result<Box<dyn Notifier>, NotifyError> {
    use crate::config::NotifyBackend;

    match config.backend {
        NotifyBackend::None => Ok(Box::new(NoopNotifier::new())),
        NotifyBackend::Pushover => {
            let pushover = config.pushover.clone().ok_or_else(|| {
                NotifyError::ConfigurationError(
                    "[notify.pushover] must be set when using the pushover backend".to_string(),
                )
            })?;
            Ok(Box::new(PushoverNotifier::new(pushover)?))
        }
    }
}
