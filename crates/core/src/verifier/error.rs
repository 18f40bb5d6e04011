//! Error types for the verifier module.

use std::path::PathBuf;
use thiserror::Error;

/// Reasons two datasets are not equivalent, or could not be compared.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// One of the files to compare does not exist.
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Number of dimensions different in files ({left} vs {right})")]
    DimensionCountDiffers { left: usize, right: usize },

    #[error("Dimensions in files different")]
    DimensionNamesDiffer,

    #[error("Lengths not same for dimension {name} ({left} vs {right})")]
    DimensionLengthDiffers {
        name: String,
        left: usize,
        right: usize,
    },

    #[error("Number of attributes different ({left} vs {right})")]
    AttributeCountDiffers { left: usize, right: usize },

    #[error("Attributes different in files")]
    AttributeNamesDiffer,

    #[error("Attribute {name} different in files")]
    AttributeDiffers { name: String },

    #[error("Number of variables different in files ({left} vs {right})")]
    VariableCountDiffers { left: usize, right: usize },

    #[error("Variables different in files")]
    VariableNamesDiffer,

    /// Every variable whose values did not match.
    #[error("Variable verification failed: {}", names.join(", "))]
    VariablesDiffer { names: Vec<String> },

    /// The dataset reader could not read a file.
    #[error("Failed to read dataset {path}: {reason}")]
    ReadFailed { path: PathBuf, reason: String },

    /// The dataset reader produced output that could not be interpreted.
    #[error("Failed to parse dataset description: {reason}")]
    Parse { reason: String },

    /// The comparison task did not complete.
    #[error("Comparison aborted: {reason}")]
    Aborted { reason: String },
}

impl VerifyError {
    /// Creates a read failed error.
    pub fn read_failed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::ReadFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::Parse {
            reason: reason.into(),
        }
    }

    /// Whether the files were read and found to differ, as opposed to the
    /// comparison itself failing.
    pub fn is_mismatch(&self) -> bool {
        !matches!(
            self,
            Self::NotFound { .. } | Self::ReadFailed { .. } | Self::Parse { .. } | Self::Aborted { .. }
        )
    }
}
