//! Aggregation of per-file outcomes into run totals.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::processor::ConversionOutcome;

/// Totals for one batch run.
///
/// `total_failed` is always `failed_conversion + failed_verification`; a file
/// counts as a verification failure only if its conversion succeeded.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
    pub total: usize,
    pub failed_conversion: usize,
    pub failed_verification: usize,
    pub total_failed: usize,
    pub failed_conversion_paths: Vec<PathBuf>,
    pub failed_verification_paths: Vec<PathBuf>,
    /// Every outcome, in scheduling order.
    pub files: Vec<ConversionOutcome>,
}

impl RunSummary {
    pub fn from_outcomes(
        outcomes: &[ConversionOutcome],
        started_at: DateTime<Utc>,
        elapsed: Duration,
    ) -> Self {
        let failed_conversion_paths: Vec<PathBuf> = outcomes
            .iter()
            .filter(|o| !o.converted())
            .map(|o| o.path.clone())
            .collect();
        let failed_verification_paths: Vec<PathBuf> = outcomes
            .iter()
            .filter(|o| o.converted() && !o.verified())
            .map(|o| o.path.clone())
            .collect();

        let failed_conversion = failed_conversion_paths.len();
        let failed_verification = failed_verification_paths.len();

        Self {
            started_at,
            elapsed_ms: elapsed.as_millis() as u64,
            total: outcomes.len(),
            failed_conversion,
            failed_verification,
            total_failed: failed_conversion + failed_verification,
            failed_conversion_paths,
            failed_verification_paths,
            files: outcomes.to_vec(),
        }
    }

    /// True when every file was converted and verified.
    pub fn all_succeeded(&self) -> bool {
        self.total_failed == 0
    }

    pub fn succeeded(&self) -> usize {
        self.total - self.total_failed
    }

    /// Error message recorded for a failing path, if any.
    pub fn error_for(&self, path: &std::path::Path) -> Option<&str> {
        self.files
            .iter()
            .find(|o| o.path == path)
            .and_then(|o| o.error.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(outcomes: &[ConversionOutcome]) -> RunSummary {
        RunSummary::from_outcomes(outcomes, Utc::now(), Duration::from_millis(1500))
    }

    #[test]
    fn test_counts_partition_outcomes() {
        let outcomes = vec![
            ConversionOutcome::replaced("/d/a.nc", 1),
            ConversionOutcome::failed("/d/b.nc", 5, "exit status 1"),
            ConversionOutcome::verify_failed("/d/c.nc", 2, "Variable verification failed: TS"),
            ConversionOutcome::replaced("/d/e.nc", 3),
        ];
        let s = summary(&outcomes);

        assert_eq!(s.total, 4);
        assert_eq!(s.failed_conversion, 1);
        assert_eq!(s.failed_verification, 1);
        assert_eq!(s.total_failed, s.failed_conversion + s.failed_verification);
        assert_eq!(s.succeeded(), 2);
        assert_eq!(s.failed_conversion_paths, vec![PathBuf::from("/d/b.nc")]);
        assert_eq!(s.failed_verification_paths, vec![PathBuf::from("/d/c.nc")]);
        assert_eq!(s.elapsed_ms, 1500);
        assert!(!s.all_succeeded());
        assert_eq!(s.error_for(std::path::Path::new("/d/b.nc")), Some("exit status 1"));
    }

    #[test]
    fn test_empty_run() {
        let s = summary(&[]);
        assert_eq!(s.total, 0);
        assert!(s.all_succeeded());
    }

    #[test]
    fn test_json_shape() {
        let s = summary(&[ConversionOutcome::failed("/d/b.nc", 5, "boom")]);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["total_failed"], 1);
        assert_eq!(json["failed_conversion_paths"][0], "/d/b.nc");
        assert_eq!(json["files"][0]["status"], "failed");
    }
}
