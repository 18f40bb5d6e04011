use serde::{Deserialize, Serialize};

use crate::converter::ConverterConfig;
use crate::processor::ProcessorConfig;
use crate::verifier::VerifierConfig;

/// Root configuration. Every section defaults to the legacy behaviour, so an
/// empty file is a valid configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub processor: ProcessorConfig,
    #[serde(default)]
    pub verifier: VerifierConfig,
    #[serde(default)]
    pub notify: NotifyConfig,
}

/// Completion notification configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NotifyConfig {
    #[serde(default)]
    pub backend: NotifyBackend,
    /// Pushover credentials (required when backend = "pushover")
    #[serde(default)]
    pub pushover: Option<PushoverConfig>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotifyBackend {
    #[default]
    None,
    Pushover,
}

/// Pushover API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PushoverConfig {
    /// Application token
    pub token: String,
    /// User or group key
    pub user: String,
    #[serde(default = "default_pushover_url")]
    pub url: String,
    #[serde(default = "default_pushover_timeout")]
    pub timeout_secs: u64,
}

fn default_pushover_url() -> String {
    "https://api.pushover.net/1/messages.json".to_string()
}

fn default_pushover_timeout() -> u64 {
    10
}
