//! Error types for the converter module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during a single conversion attempt.
#[derive(Debug, Error)]
pub enum ConverterError {
    /// Converter executable not found on the search path.
    #[error("Converter executable not found: {program}")]
    ExecutableNotFound { program: PathBuf },

    /// Input file not found.
    #[error("Input file not found: {path}")]
    InputNotFound { path: PathBuf },

    /// The converter process exited unsuccessfully.
    #[error(
        "Converter exited with code {code:?} for {path}{}",
        .stderr.as_deref().map(|s| format!(": {}", s)).unwrap_or_default()
    )]
    ProcessFailed {
        path: PathBuf,
        code: Option<i32>,
        stderr: Option<String>,
    },

    /// The converter reported success but left no output file.
    #[error("Converter produced no output file at {path}")]
    MissingOutput { path: PathBuf },

    /// Conversion timed out.
    #[error("Conversion timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// I/O error while launching or waiting on the converter.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConverterError {
    /// Creates a process failed error, dropping empty stderr output.
    pub fn process_failed(path: PathBuf, code: Option<i32>, stderr: String) -> Self {
        let stderr = stderr.trim();
        Self::ProcessFailed {
            path,
            code,
            stderr: if stderr.is_empty() {
                None
            } else {
                Some(stderr.to_string())
            },
        }
    }

    /// Whether a retry of the same job could plausibly succeed.
    ///
    /// Only consulted by the discriminating retry policy; the default policy
    /// retries every failure.
    pub fn is_transient(&self) -> bool {
        !matches!(
            self,
            Self::ExecutableNotFound { .. } | Self::InputNotFound { .. }
        )
    }
}
