//! Input file discovery.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::error::ProcessorError;
use super::types::FileTask;

/// Lists the `*.nc` files directly inside `dir`, sorted by path.
///
/// Hidden files are skipped, as a shell glob would. A file named
/// `X{output_suffix}` is skipped only when `X.nc` is also in the work set:
/// it is then a stray output from an interrupted run, and `X.nc`'s job
/// writes to that same path. Without its original it is an ordinary input.
pub async fn discover_files(
    dir: &Path,
    output_suffix: &str,
) -> Result<Vec<FileTask>, ProcessorError> {
    let is_dir = tokio::fs::metadata(dir)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false);
    if !is_dir {
        return Err(ProcessorError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let mut candidates = Vec::new();
    let mut entries = tokio::fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().to_string();

        if name.starts_with('.') || path.extension().and_then(|e| e.to_str()) != Some("nc") {
            continue;
        }
        // Follows symlinks.
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => candidates.push((name, path)),
            Ok(_) => debug!(path = %path.display(), "Skipping non-file entry"),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable entry"),
        }
    }

    // An original's name is shorter than its sibling's, so it is decided first.
    candidates.sort_by(|(a, _), (b, _)| a.len().cmp(&b.len()).then_with(|| a.cmp(b)));

    let mut kept: HashSet<PathBuf> = HashSet::new();
    for (name, path) in candidates {
        if let Some(original) = original_for(dir, &name, output_suffix) {
            if kept.contains(&original) {
                warn!(
                    path = %path.display(),
                    original = %original.display(),
                    "Skipping leftover converter output"
                );
                continue;
            }
        }
        kept.insert(path);
    }

    if kept.is_empty() {
        return Err(ProcessorError::NoFiles {
            path: dir.to_path_buf(),
        });
    }

    let mut tasks: Vec<FileTask> = kept.into_iter().map(FileTask::new).collect();
    tasks.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(tasks)
}

/// The input whose converted sibling would be named `name`, if any.
fn original_for(dir: &Path, name: &str, output_suffix: &str) -> Option<PathBuf> {
    if output_suffix.is_empty() || output_suffix == ".nc" {
        return None;
    }
    let stem = name.strip_suffix(output_suffix)?;
    Some(dir.join(format!("{}.nc", stem)))
}
