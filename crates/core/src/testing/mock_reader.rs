//! Mock dataset reader for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::verifier::{Dataset, DatasetReader, Variable, VerifyError};

/// Serves pre-registered datasets by path. Unknown paths fail to read.
#[derive(Debug, Clone, Default)]
pub struct MockDatasetReader {
    datasets: Arc<RwLock<HashMap<PathBuf, Dataset>>>,
}

impl MockDatasetReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the dataset returned for `path`.
    pub async fn set_dataset(&self, path: impl AsRef<Path>, dataset: Dataset) {
        self.datasets
            .write()
            .await
            .insert(path.as_ref().to_path_buf(), dataset);
    }
}

#[async_trait]
impl DatasetReader for MockDatasetReader {
    async fn read_header(&self, path: &Path) -> Result<Dataset, VerifyError> {
        self.datasets
            .read()
            .await
            .get(path)
            .cloned()
            .ok_or_else(|| VerifyError::read_failed(path, "no dataset registered"))
    }

    async fn read_variable(&self, path: &Path, name: &str) -> Result<Variable, VerifyError> {
        self.datasets
            .read()
            .await
            .get(path)
            .and_then(|ds| ds.variables.get(name))
            .cloned()
            .ok_or_else(|| VerifyError::read_failed(path, format!("no variable {} registered", name)))
    }
}
