//! Trait definitions for the placer module.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use super::error::PlacerError;

/// Swaps a converted file into the place of its original.
#[async_trait]
pub trait Replacer: Send + Sync {
    /// Returns the name of this replacer implementation.
    fn name(&self) -> &str;

    /// Copies `original`'s timestamps onto `converted`, then renames
    /// `converted` over `original`. Returns the final path.
    ///
    /// On error the original is left as it was.
    async fn replace(&self, original: &Path, converted: &Path) -> Result<PathBuf, PlacerError>;
}
