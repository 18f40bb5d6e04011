//! File system replacer implementation.

use async_trait::async_trait;
use std::fs::{self, File, FileTimes};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::PlacerError;
use super::traits::Replacer;

/// Replaces files in place with `rename(2)`, which is atomic within one
/// filesystem. The converted sibling always lives next to its original.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsReplacer;

impl FsReplacer {
    pub fn new() -> Self {
        Self
    }

    /// Applies `original`'s access and modification times to `converted`.
    fn copy_timestamps(original: &Path, converted: &Path) -> Result<(), PlacerError> {
        let fail =
            |e| PlacerError::timestamp_failed(original.to_path_buf(), converted.to_path_buf(), e);

        let meta = fs::metadata(original).map_err(fail)?;
        let modified = meta.modified().map_err(fail)?;
        // Some filesystems do not record access times.
        let accessed = meta.accessed().unwrap_or(modified);

        let file = File::options().write(true).open(converted).map_err(fail)?;
        file.set_times(
            FileTimes::new()
                .set_accessed(accessed)
                .set_modified(modified),
        )
        .map_err(fail)?;
        Ok(())
    }

    fn replace_blocking(original: &Path, converted: &Path) -> Result<PathBuf, PlacerError> {
        if !converted.exists() {
            return Err(PlacerError::SourceNotFound {
                path: converted.to_path_buf(),
            });
        }

        Self::copy_timestamps(original, converted)?;

        fs::rename(converted, original).map_err(|e| {
            PlacerError::rename_failed(converted.to_path_buf(), original.to_path_buf(), e)
        })?;

        debug!(
            original = %original.display(),
            converted = %converted.display(),
            "Replaced original with converted file"
        );
        Ok(original.to_path_buf())
    }
}

#[async_trait]
impl Replacer for FsReplacer {
    fn name(&self) -> &str {
        "filesystem"
    }

    async fn replace(&self, original: &Path, converted: &Path) -> Result<PathBuf, PlacerError> {
        let original = original.to_path_buf();
        let converted = converted.to_path_buf();
        tokio::task::spawn_blocking(move || Self::replace_blocking(&original, &converted))
            .await
            .map_err(|e| PlacerError::Io(std::io::Error::other(e)))?
    }
}
