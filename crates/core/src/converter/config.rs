//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the NCO-based converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Converter executable, looked up on `PATH` unless it contains a separator.
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// Timeout for a single attempt in seconds. `None` waits indefinitely.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_program() -> PathBuf {
    PathBuf::from("ncks")
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            timeout_secs: None,
        }
    }
}

impl ConverterConfig {
    /// Creates a config using a custom converter executable.
    pub fn with_program(program: PathBuf) -> Self {
        Self {
            program,
            ..Default::default()
        }
    }

    /// Sets the per-attempt timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }
}
