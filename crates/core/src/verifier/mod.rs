//! Verifier module: checks that a converted file holds the same dataset as
//! its original.
//!
//! Verification compares, in order:
//! 1. that both files exist,
//! 2. dimension names and lengths,
//! 3. global attribute names and values (exactly),
//! 4. non-character variables, numerically within a tolerance, retrying as
//!    masked arrays when the direct comparison fails.
//!
//! Reading a file is delegated to a [`DatasetReader`]; the default reader
//! uses `ncks --jsn`. Headers are read first, then one variable pair at a
//! time. Verification is disabled unless
//! [`VerifierConfig::enabled`] is set.

mod compare;
mod config;
mod error;
mod reader;
mod types;

use std::path::Path;
use std::sync::Arc;
use tracing::debug;

pub use compare::{
    compare_attributes, compare_dimensions, compare_headers, compare_variable_names,
    variables_match, Tolerance,
};
pub use config::VerifierConfig;
pub use error::VerifyError;
pub use reader::{parse_ncks_json, DatasetReader, NcksJsonReader};
pub use types::{AttributeValue, DataType, Dataset, Variable};

/// Compares an original file with its converted sibling.
#[derive(Clone)]
pub struct Verifier {
    config: VerifierConfig,
    reader: Arc<dyn DatasetReader>,
}

impl Verifier {
    pub fn new(config: VerifierConfig, reader: Arc<dyn DatasetReader>) -> Self {
        Self { config, reader }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Succeeds only if both files exist and hold equivalent datasets.
    pub async fn verify(&self, original: &Path, converted: &Path) -> Result<(), VerifyError> {
        for path in [original, converted] {
            if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                return Err(VerifyError::NotFound {
                    path: path.to_path_buf(),
                });
            }
        }

        let (left, right) = tokio::try_join!(
            self.reader.read_header(original),
            self.reader.read_header(converted)
        )?;
        compare_headers(&left, &right)?;

        // One variable pair in memory at a time.
        let tolerance = self.config.tolerance();
        let mut failed = Vec::new();
        for (name, var) in &left.variables {
            if var.dtype.is_character() {
                debug!(variable = %name, "Skipping check for character variable");
                continue;
            }
            let (a, b) = tokio::try_join!(
                self.reader.read_variable(original, name),
                self.reader.read_variable(converted, name)
            )?;
            let same = tokio::task::spawn_blocking(move || variables_match(&a, &b, tolerance))
                .await
                .map_err(|e| VerifyError::Aborted {
                    reason: e.to_string(),
                })?;
            if same {
                debug!(variable = %name, "Variable same");
            } else {
                debug!(variable = %name, "Variable not same");
                failed.push(name.clone());
            }
        }

        if failed.is_empty() {
            Ok(())
        } else {
            Err(VerifyError::VariablesDiffer { names: failed })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockDatasetReader;
    use tempfile::TempDir;

    fn dataset(ts: Vec<f64>) -> Dataset {
        Dataset::default()
            .with_dimension("time", ts.len())
            .with_variable("TS", Variable::numeric(DataType::Float, ts))
    }

    fn touch(dir: &TempDir, name: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"CDF\x01").unwrap();
        path
    }

    #[tokio::test]
    async fn test_verify_missing_file() {
        let dir = TempDir::new().unwrap();
        let original = touch(&dir, "a.nc");
        let verifier = Verifier::new(
            VerifierConfig::default().with_enabled(true),
            Arc::new(MockDatasetReader::new()),
        );

        let err = verifier
            .verify(&original, &dir.path().join("a_new.nc"))
            .await
            .unwrap_err();
        assert!(matches!(err, VerifyError::NotFound { ref path } if path.ends_with("a_new.nc")));
    }

    #[tokio::test]
    async fn test_verify_equivalent_files() {
        let dir = TempDir::new().unwrap();
        let original = touch(&dir, "a.nc");
        let converted = touch(&dir, "a_new.nc");

        let reader = MockDatasetReader::new();
        reader.set_dataset(&original, dataset(vec![1.0, 2.0])).await;
        reader.set_dataset(&converted, dataset(vec![1.0, 2.0000001])).await;

        let verifier = Verifier::new(VerifierConfig::default(), Arc::new(reader));
        assert!(verifier.verify(&original, &converted).await.is_ok());
    }

    #[tokio::test]
    async fn test_verify_value_mismatch() {
        let dir = TempDir::new().unwrap();
        let original = touch(&dir, "a.nc");
        let converted = touch(&dir, "a_new.nc");

        let reader = MockDatasetReader::new();
        reader.set_dataset(&original, dataset(vec![1.0, 2.0])).await;
        reader.set_dataset(&converted, dataset(vec![1.0, 3.0])).await;

        let verifier = Verifier::new(VerifierConfig::default(), Arc::new(reader));
        let err = verifier.verify(&original, &converted).await.unwrap_err();
        assert!(matches!(err, VerifyError::VariablesDiffer { ref names } if names == &["TS"]));
    }

    #[tokio::test]
    async fn test_verify_collects_every_failing_variable() {
        let dir = TempDir::new().unwrap();
        let original = touch(&dir, "a.nc");
        let converted = touch(&dir, "a_new.nc");

        let left = dataset(vec![1.0, 2.0])
            .with_variable("PRECT", Variable::numeric(DataType::Double, vec![1.0]))
            .with_variable("date_written", Variable::text());
        let mut right = dataset(vec![1.0, 5.0])
            .with_variable("PRECT", Variable::numeric(DataType::Double, vec![2.0]));
        // Character contents are not compared.
        right.variables.insert(
            "date_written".into(),
            Variable {
                dtype: DataType::Char,
                shape: vec!["time".into()],
                values: vec![1.0, 2.0],
                mask: None,
            },
        );

        let reader = MockDatasetReader::new();
        reader.set_dataset(&original, left).await;
        reader.set_dataset(&converted, right).await;

        let verifier = Verifier::new(VerifierConfig::default(), Arc::new(reader));
        match verifier.verify(&original, &converted).await.unwrap_err() {
            VerifyError::VariablesDiffer { names } => {
                assert_eq!(names, vec!["PRECT".to_string(), "TS".to_string()]);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verify_header_mismatch_stops_before_values() {
        let dir = TempDir::new().unwrap();
        let original = touch(&dir, "a.nc");
        let converted = touch(&dir, "a_new.nc");

        let reader = MockDatasetReader::new();
        reader.set_dataset(&original, dataset(vec![1.0, 2.0])).await;
        reader
            .set_dataset(&converted, dataset(vec![1.0, 2.0]).with_dimension("lev", 26))
            .await;

        let verifier = Verifier::new(VerifierConfig::default(), Arc::new(reader));
        let err = verifier.verify(&original, &converted).await.unwrap_err();
        assert!(matches!(
            err,
            VerifyError::DimensionCountDiffers { left: 1, right: 2 }
        ));
    }
}
