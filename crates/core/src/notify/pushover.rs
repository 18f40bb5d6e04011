//! Pushover push notifications.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::PushoverConfig;

use super::{Notifier, NotifyError};

/// Sends messages through the Pushover messages API.
pub struct PushoverNotifier {
    client: Client,
    config: PushoverConfig,
}

impl PushoverNotifier {
    /// Create a new Pushover notifier.
    pub fn new(config: PushoverConfig) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NotifyError::ConfigurationError(e.to_string()))?;

        Ok(Self { client, config })
    }
}

#[async_trait]
impl Notifier for PushoverNotifier {
    async fn notify(&self, message: &str) -> Result<(), NotifyError> {
        let params = [
            ("token", self.config.token.as_str()),
            ("user", self.config.user.as_str()),
            ("message", message),
        ];

        let response = self
            .client
            .post(&self.config.url)
            .form(&params)
            .send()
            .await
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(200).collect(),
            });
        }

        debug!("Pushover notification delivered");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "pushover"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_endpoint_is_an_error() {
        let notifier = PushoverNotifier::new(PushoverConfig {
            token: "token".to_string(),
            user: "user".to_string(),
            url: "http://127.0.0.1:1/1/messages.json".to_string(),
            timeout_secs: 2,
        })
        .unwrap();

        let result = notifier.notify("done").await;
        assert!(matches!(result, Err(NotifyError::RequestFailed(_))));
    }
}
