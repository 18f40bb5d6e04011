//! Converter module for compressing classic netCDF files.
//!
//! This module provides the `Converter` trait and the `NcksConverter`
//! implementation, which delegates the actual re-encoding to NCO's `ncks`:
//!
//! ```text
//! ncks -O -4 -L{level} input.nc input_new.nc
//! ```
//!
//! A `Converter::convert` call is one attempt. Bounded retry lives in
//! [`crate::processor::retry_with`].
//!
//! # Example
//!
//! ```ignore
//! use nccompress_core::converter::{Converter, ConversionJob, NcksConverter};
//!
//! let converter = NcksConverter::with_defaults();
//! converter.validate().await?;
//!
//! let job = ConversionJob::for_input(Path::new("run/a.nc"), "_new.nc", 1);
//! let result = converter.convert(&job).await?;
//! println!("Wrote {} bytes", result.output_size_bytes);
//! ```

mod capabilities;
mod config;
mod error;
mod locate;
mod ncks;
mod traits;
mod types;

pub use capabilities::NcoCapabilities;
pub use config::ConverterConfig;
pub use error::ConverterError;
pub use locate::locate_executable;
pub use ncks::NcksConverter;
pub use traits::Converter;
pub use types::{output_path_for, ConversionJob, ConversionResult};
