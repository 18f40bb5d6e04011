//! Configuration for the processor module.

use serde::{Deserialize, Serialize};

/// Configuration for the batch processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Number of files converted in parallel.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Deflate level handed to the converter.
    #[serde(default = "default_compression_level")]
    pub compression_level: u32,

    /// Suffix replacing `.nc` for the converted sibling file.
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Retry configuration.
    #[serde(default)]
    pub retry: RetryConfig,
}

/// How failed attempts are classified.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultClassification {
    /// Every failure is retried until the attempt budget is spent.
    #[default]
    AllTransient,
    /// Failures that cannot succeed on retry (such as a missing input) stop
    /// immediately.
    Discriminating,
}

/// Retry configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per file, including the first.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds. Zero retries at once.
    #[serde(default)]
    pub initial_delay_ms: u64,

    /// Maximum delay between retries in milliseconds.
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,

    /// Exponential backoff multiplier.
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Which failures are worth retrying.
    #[serde(default)]
    pub classification: FaultClassification,
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

fn default_compression_level() -> u32 {
    1
}

fn default_output_suffix() -> String {
    "_new.nc".to_string()
}

fn default_max_attempts() -> u32 {
    5
}

fn default_max_delay() -> u64 {
    60_000 // 1 minute
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: 0,
            max_delay_ms: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            classification: FaultClassification::default(),
        }
    }
}

impl RetryConfig {
    /// Delay after the `failed_attempt`-th failure (1-based).
    pub fn delay_ms(&self, failed_attempt: u32) -> u64 {
        if self.initial_delay_ms == 0 {
            return 0;
        }
        let exp = failed_attempt.saturating_sub(1) as i32;
        let delay = self.initial_delay_ms as f64 * self.backoff_multiplier.powi(exp);
        delay.min(self.max_delay_ms as f64) as u64
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            compression_level: default_compression_level(),
            output_suffix: default_output_suffix(),
            retry: RetryConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Sets the worker count.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Sets the compression level.
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets the retry configuration.
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProcessorConfig::default();
        assert!(config.workers >= 1);
        assert_eq!(config.compression_level, 1);
        assert_eq!(config.output_suffix, "_new.nc");
    }

    #[test]
    fn test_retry_config_matches_legacy() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.initial_delay_ms, 0);
        assert_eq!(config.classification, FaultClassification::AllTransient);
        assert_eq!(config.delay_ms(1), 0);
        assert_eq!(config.delay_ms(4), 0);
    }

    #[test]
    fn test_exponential_delay_is_capped() {
        let config = RetryConfig {
            initial_delay_ms: 100,
            max_delay_ms: 500,
            ..Default::default()
        };
        assert_eq!(config.delay_ms(1), 100);
        assert_eq!(config.delay_ms(2), 200);
        assert_eq!(config.delay_ms(3), 400);
        assert_eq!(config.delay_ms(4), 500);
    }

    #[test]
    fn test_config_builder() {
        let config = ProcessorConfig::default()
            .with_workers(8)
            .with_compression_level(4);

        assert_eq!(config.workers, 8);
        assert_eq!(config.compression_level, 4);
    }

    #[test]
    fn test_classification_deserializes() {
        let config: RetryConfig = toml::from_str(r#"classification = "discriminating""#).unwrap();
        assert_eq!(config.classification, FaultClassification::Discriminating);
        assert_eq!(config.max_attempts, 5);
    }
}
