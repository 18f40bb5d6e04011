//! Types for the processor module.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// One input file discovered for conversion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FileTask {
    pub path: PathBuf,
}

impl FileTask {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Where one file's job is in its lifecycle.
///
/// ```text
/// Pending -> Converting -> ConvertFailed
///                       -> Converted -> [Verifying] -> Replaced
///                                                   -> VerifyFailed
///                                                   -> ReplaceFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    Pending,
    Converting,
    Converted,
    ConvertFailed,
    Verifying,
    VerifyFailed,
    Replaced,
    ReplaceFailed,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::ConvertFailed | Self::VerifyFailed | Self::Replaced | Self::ReplaceFailed
        )
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::Converting => "converting",
            Self::Converted => "converted",
            Self::ConvertFailed => "convert_failed",
            Self::Verifying => "verifying",
            Self::VerifyFailed => "verify_failed",
            Self::Replaced => "replaced",
            Self::ReplaceFailed => "replace_failed",
        };
        f.write_str(name)
    }
}

/// Per-file result. A file can only be verified once converted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileStatus {
    /// The converter succeeded. `verified` is true when verification passed
    /// or was disabled.
    Converted { verified: bool },
    /// The converter never succeeded, or the result could not be swapped in.
    Failed,
}

/// Outcome of one file's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionOutcome {
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: FileStatus,
    /// Converter attempts made.
    pub attempts: u32,
    /// Last error, for failed or unverified files.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionOutcome {
    /// Converted, verified (or unverified by configuration) and replaced.
    pub fn replaced(path: impl Into<PathBuf>, attempts: u32) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Converted { verified: true },
            attempts,
            error: None,
        }
    }

    /// Converted, but the converted file did not match the original.
    pub fn verify_failed(path: impl Into<PathBuf>, attempts: u32, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Converted { verified: false },
            attempts,
            error: Some(error.into()),
        }
    }

    pub fn failed(path: impl Into<PathBuf>, attempts: u32, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: FileStatus::Failed,
            attempts,
            error: Some(error.into()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn converted(&self) -> bool {
        matches!(self.status, FileStatus::Converted { .. })
    }

    pub fn verified(&self) -> bool {
        matches!(self.status, FileStatus::Converted { verified: true })
    }
}

/// Status of the worker pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolStatus {
    /// Maximum concurrent jobs.
    pub workers: usize,
    /// Number of active jobs.
    pub active_jobs: usize,
    /// Number of jobs waiting for a worker.
    pub queued_jobs: usize,
    /// Jobs finished with a converted and verified file.
    pub total_succeeded: u64,
    /// Jobs finished with any failure.
    pub total_failed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_flags() {
        let ok = ConversionOutcome::replaced("a.nc", 1);
        assert!(ok.converted() && ok.verified());

        let unverified = ConversionOutcome::verify_failed("b.nc", 1, "TS differs");
        assert!(unverified.converted());
        assert!(!unverified.verified());

        let failed = ConversionOutcome::failed("c.nc", 5, "exit 1");
        assert!(!failed.converted());
        assert!(!failed.verified());
    }

    #[test]
    fn test_outcome_serialization() {
        let outcome = ConversionOutcome::verify_failed("b.nc", 2, "TS differs");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "converted");
        assert_eq!(json["verified"], false);
        assert_eq!(json["attempts"], 2);

        let json = serde_json::to_value(ConversionOutcome::replaced("a.nc", 1)).unwrap();
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_terminal_states() {
        assert!(JobState::Replaced.is_terminal());
        assert!(JobState::ConvertFailed.is_terminal());
        assert!(JobState::VerifyFailed.is_terminal());
        assert!(JobState::ReplaceFailed.is_terminal());
        assert!(!JobState::Converted.is_terminal());
        assert_eq!(JobState::VerifyFailed.to_string(), "verify_failed");
    }
}
