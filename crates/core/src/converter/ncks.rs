//! NCO `ncks`-based converter implementation.

use async_trait::async_trait;
use std::ffi::OsString;
use std::process::Stdio;
use std::time::Instant;
use tokio::process::Command;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use super::capabilities::NcoCapabilities;
use super::config::ConverterConfig;
use super::error::ConverterError;
use super::locate::locate_executable;
use super::traits::Converter;
use super::types::{ConversionJob, ConversionResult};

/// Converter that shells out to `ncks -O -4 -L{level} input output`.
pub struct NcksConverter {
    config: ConverterConfig,
}

impl NcksConverter {
    /// Creates a new converter with the given configuration.
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    /// Creates a converter with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ConverterConfig::default())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Builds the fixed argument list: overwrite, netCDF-4 target, deflate
    /// level, input, output. Paths are passed as separate arguments and never
    /// through a shell.
    fn build_args(job: &ConversionJob) -> Vec<OsString> {
        vec![
            OsString::from("-O"),
            OsString::from("-4"),
            OsString::from(format!("-L{}", job.compression_level)),
            job.input_path.clone().into_os_string(),
            job.output_path.clone().into_os_string(),
        ]
    }
}

#[async_trait]
impl Converter for NcksConverter {
    fn name(&self) -> &str {
        "ncks"
    }

    async fn convert(&self, job: &ConversionJob) -> Result<ConversionResult, ConverterError> {
        if !job.input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        let start = Instant::now();
        let args = Self::build_args(job);
        debug!(program = %self.config.program.display(), ?args, "Running converter");

        let run = Command::new(&self.config.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        // Dropping the future on timeout kills the child.
        let output = match self.config.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), run)
                .await
                .map_err(|_| ConverterError::Timeout { timeout_secs: secs })?,
            None => run.await,
        }
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConverterError::ExecutableNotFound {
                    program: self.config.program.clone(),
                }
            } else {
                ConverterError::Io(e)
            }
        })?;

        if !output.status.success() {
            return Err(ConverterError::process_failed(
                job.input_path.clone(),
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).to_string(),
            ));
        }

        let output_meta = tokio::fs::metadata(&job.output_path).await.map_err(|_| {
            ConverterError::MissingOutput {
                path: job.output_path.clone(),
            }
        })?;

        Ok(ConversionResult {
            output_path: job.output_path.clone(),
            output_size_bytes: output_meta.len(),
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        let resolved = locate_executable(&self.config.program).ok_or_else(|| {
            ConverterError::ExecutableNotFound {
                program: self.config.program.clone(),
            }
        })?;

        let caps = NcoCapabilities::detect(&self.config).await;
        if caps.version.is_none() {
            warn!(program = %resolved.display(), "Could not determine NCO version");
        } else {
            info!(
                program = %resolved.display(),
                version = %caps.version_string(),
                "Found NCO"
            );
        }

        Ok(())
    }
}
