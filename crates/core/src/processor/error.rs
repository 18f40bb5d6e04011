//! Error types for the processor module.

use std::path::PathBuf;
use thiserror::Error;

/// Batch-level configuration errors. Per-file failures are never reported
/// through this type; they become outcomes.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// The input directory does not exist or is not a directory.
    #[error("Directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// The directory holds no matching files.
    #[error("No files were found matching *.nc in {path}")]
    NoFiles { path: PathBuf },

    /// I/O error while listing the directory.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
