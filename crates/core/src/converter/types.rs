//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// A single conversion request: one input file into one sibling output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversionJob {
    /// Classic-format input file.
    pub input_path: PathBuf,
    /// Where the converter writes the compressed file.
    pub output_path: PathBuf,
    /// Deflate level.
    pub compression_level: u32,
}

impl ConversionJob {
    /// Builds a job whose output is the input's sibling with `suffix`.
    pub fn for_input(input_path: &Path, suffix: &str, compression_level: u32) -> Self {
        Self {
            input_path: input_path.to_path_buf(),
            output_path: output_path_for(input_path, suffix),
            compression_level,
        }
    }
}

/// Result of a successful conversion attempt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionResult {
    /// Path of the converted file.
    pub output_path: PathBuf,
    /// Size of the converted file.
    pub output_size_bytes: u64,
    /// Wall time of the attempt in milliseconds.
    pub duration_ms: u64,
}

/// Derives the converted sibling path: `dir/name.nc` becomes `dir/name{suffix}`.
///
/// Only the final extension is replaced; a file without an extension gets the
/// suffix appended.
pub fn output_path_for(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    input.with_file_name(format!("{}{}", stem, suffix))
}
