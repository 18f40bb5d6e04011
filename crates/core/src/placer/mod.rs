//! Placer module for swapping converted files into place.
//!
//! Replacement is two steps: the original's timestamps are copied onto the
//! converted sibling, then the sibling is renamed over the original. Tools
//! downstream that key off modification time see the file as unchanged.
//!
//! # Example
//!
//! ```ignore
//! use nccompress_core::placer::{FsReplacer, Replacer};
//!
//! let replacer = FsReplacer::new();
//! replacer.replace(Path::new("run/a.nc"), Path::new("run/a_new.nc")).await?;
//! ```

mod error;
mod fs_replacer;
mod traits;

pub use error::PlacerError;
pub use fs_replacer::FsReplacer;
pub use traits::Replacer;
