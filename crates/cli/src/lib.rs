//! # nccompress
//!
//! Converts every classic-format `*.nc` file in a directory to compressed
//! netCDF-4 in place, using NCO's `ncks`.
//!
//! ## Configuration
//!
//! Settings come from defaults, then an optional TOML file (`--config` or
//! `NCCOMPRESS_CONFIG`), then `NCCOMPRESS_*` environment variables, then the
//! flags below.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use chrono::Utc;
use clap::Parser;
use tracing::{error, info, warn};

use nccompress_core::converter::NcoCapabilities;
use nccompress_core::report::{render_banner, render_file_count, render_text, render_total_time};
use nccompress_core::{
    create_notifier, discover_files, load_config, validate_config, BatchProcessor, Config,
    Converter, FsReplacer, NcksConverter, NcksJsonReader, NotifyConfig, ProcessorError,
    RunSummary, Verifier,
};

/// Exit code when the directory holds no `*.nc` files.
pub const EXIT_NO_FILES: i32 = -1;
/// Exit code when the converter executable is not on the path.
pub const EXIT_CONVERTER_NOT_FOUND: i32 = -2;
/// Exit code when no directory was given.
pub const EXIT_NO_DIRECTORY: i32 = -3;
/// Exit code for invalid configuration and other fatal errors.
pub const EXIT_FAILURE: i32 = 1;

/// Compress netCDF files in a directory using ncks.
#[derive(Debug, Parser)]
#[command(name = "nccompress")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory containing the files to convert.
    #[arg(short = 'l', value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Number of files converted in parallel.
    #[arg(short = 'n', value_name = "WORKERS")]
    pub workers: Option<usize>,

    /// Deflate compression level.
    #[arg(short = 'd', value_name = "LEVEL")]
    pub compression_level: Option<u32>,

    /// Compare each converted file against its original before replacing it.
    #[arg(long)]
    pub verify: bool,

    /// Per-attempt converter timeout in seconds.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Configuration file.
    #[arg(long, env = "NCCOMPRESS_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format for the run report.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Emit log records as JSON lines.
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Apply flag overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(workers) = self.workers {
            config.processor.workers = workers;
        }
        if let Some(level) = self.compression_level {
            config.processor.compression_level = level;
        }
        if self.verify {
            config.verifier.enabled = true;
        }
        if let Some(timeout) = self.timeout {
            config.converter.timeout_secs = Some(timeout);
        }
    }
}

/// Output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
}

/// Runs one batch and returns the process exit code.
///
/// Configuration problems found before any file is touched map to the
/// `EXIT_*` codes. Per-file failures only show up in the report and still
/// exit 0.
pub async fn run(cli: Cli) -> Result<i32> {
    let started_at = Utc::now();
    let clock = Instant::now();
    let text = cli.format == OutputFormat::Text;

    let mut config = load_config(cli.config.as_deref()).context("Failed to load configuration")?;
    cli.apply(&mut config);
    validate_config(&config).context("Configuration validation failed")?;

    let directory = cli.directory.clone().unwrap_or_default();
    if text {
        print!("{}", render_banner(&directory, &config));
    }

    let converter = NcksConverter::new(config.converter.clone());
    info!("Checking for NCO ({})", config.converter.program.display());
    if let Err(e) = converter.validate().await {
        error!(error = %e, "Converter is not available on the path");
        return Ok(EXIT_CONVERTER_NOT_FOUND);
    }

    let Some(directory) = cli.directory.as_deref() else {
        error!("No directory name provided");
        return Ok(EXIT_NO_DIRECTORY);
    };

    let tasks = match discover_files(directory, &config.processor.output_suffix).await {
        Ok(tasks) => tasks,
        Err(e @ (ProcessorError::DirectoryNotFound { .. } | ProcessorError::NoFiles { .. })) => {
            error!(error = %e, "No *.nc files found");
            return Ok(EXIT_NO_FILES);
        }
        Err(e) => return Err(e).context("Failed to list directory"),
    };
    if text {
        print!("{}", render_file_count(tasks.len()));
    }

    let mut processor = BatchProcessor::new(config.processor.clone(), converter, FsReplacer::new());
    if config.verifier.enabled {
        let caps = NcoCapabilities::detect(&config.converter).await;
        if !caps.supports_json() {
            bail!(
                "verification needs ncks JSON output (NCO 4.6.3 or newer), found {}",
                caps.version_string()
            );
        }
        let reader = NcksJsonReader::new(config.converter.program.clone());
        processor = processor.with_verifier(Verifier::new(config.verifier.clone(), Arc::new(reader)));
    }

    let outcomes = processor.run(tasks).await;
    let summary = RunSummary::from_outcomes(&outcomes, started_at, clock.elapsed());

    match cli.format {
        OutputFormat::Text => print!("{}", render_text(&summary)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialize summary")?
        ),
    }

    notify_completion(&config.notify, directory).await;

    if text {
        print!("{}", render_total_time(clock.elapsed()));
    }
    Ok(0)
}

async fn notify_completion(config: &NotifyConfig, directory: &Path) {
    let notifier = match create_notifier(config) {
        Ok(notifier) => notifier,
        Err(e) => {
            warn!(error = %e, "Notifications disabled");
            return;
        }
    };

    let message = format!(
        "File compression for directory {} complete!",
        directory.display()
    );
    if let Err(e) = notifier.notify(&message).await {
        warn!(backend = notifier.backend_name(), error = %e, "Failed to send notification");
    }
}
