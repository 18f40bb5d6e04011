//! Testing utilities and mock implementations.
//!
//! The mocks stand in for the external NCO tools so the processor can be
//! exercised end to end against a temporary directory.
//!
//! # Example
//!
//! ```rust,ignore
//! use nccompress_core::testing::{MockConverter, MockDatasetReader};
//!
//! let converter = MockConverter::new();
//! converter.fail_always("/data/bad.nc").await;
//!
//! let reader = MockDatasetReader::new();
//! reader.set_dataset("/data/a.nc", dataset).await;
//! ```

mod mock_converter;
mod mock_reader;

pub use mock_converter::MockConverter;
pub use mock_reader::MockDatasetReader;
