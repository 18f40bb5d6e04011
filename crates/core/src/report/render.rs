//! Plain-text rendering of run status in the console layout operators expect.

use std::fmt::Write;
use std::path::Path;
use std::time::Duration;

use crate::config::Config;

use super::summary::RunSummary;

const BOX_WIDTH: usize = 78;
const RULE_WIDTH: usize = 80;

/// Formats a duration as `H:MM:SS.mmm`.
pub fn format_elapsed(elapsed: Duration) -> String {
    let total_ms = elapsed.as_millis();
    let ms = total_ms % 1000;
    let secs = (total_ms / 1000) % 60;
    let mins = (total_ms / 60_000) % 60;
    let hours = total_ms / 3_600_000;
    format!("{}:{:02}:{:02}.{:03}", hours, mins, secs, ms)
}

/// Renders `text` centered inside a bordered box.
pub fn render_box(text: &str) -> String {
    let border = format!("+{}+", "-".repeat(BOX_WIDTH));
    let len = text.chars().count();
    let pad = BOX_WIDTH.saturating_sub(len);
    let left = pad / 2;
    let right = pad - left;
    format!(
        "{}\n|{}{}{}|\n{}\n",
        border,
        " ".repeat(left),
        text,
        " ".repeat(right),
        border
    )
}

/// The configuration block printed before any work starts.
pub fn render_banner(directory: &Path, config: &Config) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Configuration  >>>>>>>");
    let _ = writeln!(out, "  Directory  : {}", directory.display());
    let _ = writeln!(out, "  Num procs  : {}", config.processor.workers);
    let _ = writeln!(out, "  Compression: {}", config.processor.compression_level);
    let _ = writeln!(
        out,
        "  Verify     : {}",
        if config.verifier.enabled { "on" } else { "off" }
    );
    let _ = writeln!(out, "<<<<<<<<<<<<<<<<<<<<<<");
    out
}

/// The box announcing how many files will be processed.
pub fn render_file_count(count: usize) -> String {
    render_box(&format!("Number of files to operate upon: {:3}", count))
}

/// The box reporting the wall time of the whole run.
pub fn render_total_time(elapsed: Duration) -> String {
    render_box(&format!("Total time: {}", format_elapsed(elapsed)))
}

fn write_failures(out: &mut String, summary: &RunSummary, paths: &[std::path::PathBuf]) {
    for path in paths {
        match summary.error_for(path) {
            Some(error) => {
                let _ = writeln!(out, "    {} ({})", path.display(), error);
            }
            None => {
                let _ = writeln!(out, "    {}", path.display());
            }
        }
    }
}

/// The end-of-run summary block.
pub fn render_text(summary: &RunSummary) -> String {
    let rule = "-".repeat(RULE_WIDTH);
    let mut out = String::new();

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "SUMMARY");
    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out);
    let _ = writeln!(out, "Total number of files for work     : {:4}", summary.total);
    let _ = writeln!(out, "Total number of files that failed  : {:4}", summary.total_failed);
    let _ = writeln!(out, "Number of files that failed nco    : {:4}", summary.failed_conversion);
    let _ = writeln!(out, "Number of files that failed check  : {:4}", summary.failed_verification);

    if summary.all_succeeded() {
        let _ = writeln!(out, "All files converted SUCCESSFULLY!!");
    } else {
        let _ = writeln!(out, "ERRORS encountered during conversion");
        let _ = writeln!(out, "Files that failed nco:");
        write_failures(&mut out, summary, &summary.failed_conversion_paths);
        let _ = writeln!(out, "Files that failed verification:");
        write_failures(&mut out, summary, &summary.failed_verification_paths);
    }

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(out, "{}", rule);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processor::ConversionOutcome;
    use chrono::Utc;

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_millis(0)), "0:00:00.000");
        assert_eq!(format_elapsed(Duration::from_millis(61_005)), "0:01:01.005");
        assert_eq!(
            format_elapsed(Duration::from_millis(3 * 3_600_000 + 25 * 60_000 + 7_250)),
            "3:25:07.250"
        );
    }

    #[test]
    fn test_box_is_fixed_width() {
        let rendered = render_file_count(3);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() == BOX_WIDTH + 2));
        assert!(lines[1].contains("Number of files to operate upon:   3"));
    }

    #[test]
    fn test_banner_lists_settings() {
        let mut config = Config::default();
        config.processor.workers = 4;
        config.processor.compression_level = 2;
        let banner = render_banner(Path::new("/scratch/hist"), &config);
        assert!(banner.contains("  Directory  : /scratch/hist"));
        assert!(banner.contains("  Num procs  : 4"));
        assert!(banner.contains("  Compression: 2"));
        assert!(banner.contains("  Verify     : off"));
    }

    #[test]
    fn test_render_success() {
        let summary = RunSummary::from_outcomes(
            &[ConversionOutcome::replaced("/d/a.nc", 1)],
            Utc::now(),
            Duration::from_secs(1),
        );
        let text = render_text(&summary);
        assert!(text.contains("Total number of files for work     :    1"));
        assert!(text.contains("All files converted SUCCESSFULLY!!"));
        assert!(!text.contains("ERRORS"));
    }

    #[test]
    fn test_render_failures_lists_paths() {
        let summary = RunSummary::from_outcomes(
            &[
                ConversionOutcome::replaced("/d/a.nc", 1),
                ConversionOutcome::failed("/d/b.nc", 5, "ncks exited with status 1"),
                ConversionOutcome::replaced("/d/c.nc", 1),
            ],
            Utc::now(),
            Duration::from_secs(1),
        );
        let text = render_text(&summary);
        assert!(text.contains("Total number of files that failed  :    1"));
        assert!(text.contains("Number of files that failed nco    :    1"));
        assert!(text.contains("Number of files that failed check  :    0"));
        assert!(text.contains("ERRORS encountered during conversion"));
        assert!(text.contains("    /d/b.nc (ncks exited with status 1)"));
        assert!(!text.contains("All files converted SUCCESSFULLY!!"));
    }
}
