//! Processor module for the batch conversion run.
//!
//! This module provides:
//! - `discover_files`: the `*.nc` work set of a directory
//! - `run_file_job`: convert one file with bounded retry, optionally verify,
//!   then swap it into place
//! - `BatchProcessor`: runs every job on a fixed-size worker pool and
//!   collects one outcome per file
//!
//! # Example
//!
//! ```ignore
//! use nccompress_core::processor::{discover_files, BatchProcessor, ProcessorConfig};
//! use nccompress_core::converter::NcksConverter;
//! use nccompress_core::placer::FsReplacer;
//!
//! let config = ProcessorConfig::default().with_workers(8);
//! let tasks = discover_files(Path::new("/scratch/run/atm/hist"), &config.output_suffix).await?;
//!
//! let processor = BatchProcessor::new(config, NcksConverter::with_defaults(), FsReplacer::new());
//! let outcomes = processor.run(tasks).await;
//! ```

mod config;
mod discover;
mod error;
mod job;
mod pool;
mod retry;
mod types;

pub use config::{FaultClassification, ProcessorConfig, RetryConfig};
pub use discover::discover_files;
pub use error::ProcessorError;
pub use job::{run_file_job, JobContext};
pub use pool::BatchProcessor;
pub use retry::{retry_with, Retried};
pub use types::{ConversionOutcome, FileStatus, FileTask, JobState, PoolStatus};
