//! The per-file job: convert, optionally verify, then replace.

use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::converter::{ConversionJob, Converter, ConverterError};
use crate::placer::Replacer;
use crate::verifier::Verifier;

use super::config::ProcessorConfig;
use super::retry::retry_with;
use super::types::{ConversionOutcome, FileTask, JobState};

/// Everything a worker needs to process one file.
pub struct JobContext<C: Converter, R: Replacer> {
    pub config: ProcessorConfig,
    pub converter: Arc<C>,
    pub replacer: Arc<R>,
    /// Verification runs only when present and enabled.
    pub verifier: Option<Verifier>,
}

fn transition(path: &Path, state: JobState) {
    debug!(
        path = %path.display(),
        state = %state,
        terminal = state.is_terminal(),
        "Job state"
    );
}

/// Runs one file through the job. Never fails: every error becomes a failing
/// outcome, so one bad file cannot stop the batch.
///
/// The original file is only ever touched by the final rename. When
/// verification fails the converted sibling is kept for inspection.
pub async fn run_file_job<C: Converter, R: Replacer>(
    task: FileTask,
    ctx: &JobContext<C, R>,
) -> ConversionOutcome {
    let path = task.path;
    transition(&path, JobState::Pending);

    let job = ConversionJob::for_input(
        &path,
        &ctx.config.output_suffix,
        ctx.config.compression_level,
    );
    info!(
        path = %path.display(),
        output = %job.output_path.display(),
        level = job.compression_level,
        "Converting"
    );

    transition(&path, JobState::Converting);
    let converted = retry_with(&ctx.config.retry, ConverterError::is_transient, |_| {
        ctx.converter.convert(&job)
    })
    .await;
    let attempts = converted.attempts;

    if let Err(e) = converted.result {
        transition(&path, JobState::ConvertFailed);
        error!(path = %path.display(), attempts, error = %e, "Converter failed to convert file");
        return ConversionOutcome::failed(path, attempts, e.to_string());
    }
    transition(&path, JobState::Converted);

    if let Some(verifier) = ctx.verifier.as_ref().filter(|v| v.is_enabled()) {
        transition(&path, JobState::Verifying);
        if let Err(e) = verifier.verify(&path, &job.output_path).await {
            transition(&path, JobState::VerifyFailed);
            if e.is_mismatch() {
                error!(
                    path = %path.display(),
                    converted = %job.output_path.display(),
                    error = %e,
                    "Converted file differs from original; original left untouched"
                );
                return ConversionOutcome::verify_failed(path, attempts, e.to_string());
            }
            error!(
                path = %path.display(),
                converted = %job.output_path.display(),
                error = %e,
                "Verification could not complete; original left untouched"
            );
            return ConversionOutcome::verify_failed(
                path,
                attempts,
                format!("verification could not complete: {}", e),
            );
        }
    }

    match ctx.replacer.replace(&path, &job.output_path).await {
        Ok(_) => {
            transition(&path, JobState::Replaced);
            info!(path = %path.display(), attempts, "Converted");
            ConversionOutcome::replaced(path, attempts)
        }
        Err(e) => {
            transition(&path, JobState::ReplaceFailed);
            if e.is_cross_device() {
                error!(
                    path = %path.display(),
                    converted = %job.output_path.display(),
                    error = %e,
                    "Converted file is on another filesystem; original left untouched"
                );
            } else {
                error!(
                    path = %path.display(),
                    converted = %job.output_path.display(),
                    error = %e,
                    "Failed to replace original with converted file"
                );
            }
            ConversionOutcome::failed(path, attempts, format!("replacement failed: {}", e))
        }
    }
}
