//! End-of-run reporting.
//!
//! `RunSummary` folds the per-file outcomes into totals and failing-file
//! lists. It renders either as the console text block or as JSON.

mod render;
mod summary;

pub use render::{
    format_elapsed, render_banner, render_box, render_file_count, render_text,
    render_total_time,
};
pub use summary::RunSummary;
