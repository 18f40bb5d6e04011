//! Error types for the placer module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while swapping a converted file into place.
#[derive(Debug, Error)]
pub enum PlacerError {
    /// Converted file not found.
    #[error("Converted file not found: {path}")]
    SourceNotFound { path: PathBuf },

    /// The original could not be inspected or its timestamps not applied.
    #[error("Failed to copy timestamps from {original} to {converted}")]
    TimestampFailed {
        original: PathBuf,
        converted: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// Failed to rename the converted file over the original.
    #[error("Failed to move file from {source} to {destination}")]
    RenameFailed {
        source: PathBuf,
        destination: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PlacerError {
    /// Creates a timestamp failed error.
    pub fn timestamp_failed(original: PathBuf, converted: PathBuf, error: std::io::Error) -> Self {
        Self::TimestampFailed {
            original,
            converted,
            error,
        }
    }

    /// Creates a rename failed error.
    pub fn rename_failed(source: PathBuf, destination: PathBuf, error: std::io::Error) -> Self {
        Self::RenameFailed {
            source,
            destination,
            error,
        }
    }

    /// Whether the rename failed because source and destination are on
    /// different filesystems (EXDEV).
    pub fn is_cross_device(&self) -> bool {
        match self {
            Self::RenameFailed { error, .. } => {
                error.kind() == std::io::ErrorKind::CrossesDevices || error.raw_os_error() == Some(18)
            }
            _ => false,
        }
    }
}
