//! NCO version detection.

use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::process::Stdio;
use tokio::process::Command;

use super::config::ConverterConfig;

/// First NCO release whose `ncks` can emit JSON (`--jsn`).
const JSON_MIN_VERSION: (u32, u32, u32) = (4, 6, 3);

/// What the installed NCO build can do.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NcoCapabilities {
    /// Parsed `major.minor.patch`, if the version banner could be read.
    pub version: Option<(u32, u32, u32)>,
}

impl NcoCapabilities {
    /// Probes `ncks --version`. An unreadable banner yields an unknown version.
    pub async fn detect(config: &ConverterConfig) -> Self {
        let output = Command::new(&config.program)
            .arg("--version")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await;

        match output {
            // NCO prints its banner on stderr, older builds on stdout.
            Ok(o) => {
                let mut text = String::from_utf8_lossy(&o.stderr).to_string();
                text.push_str(&String::from_utf8_lossy(&o.stdout));
                Self::from_banner(&text)
            }
            Err(_) => Self::default(),
        }
    }

    /// Parses a version banner such as `ncks, version 5.1.4 "Rhodes"`.
    pub fn from_banner(banner: &str) -> Self {
        let version = Regex::new(r#"[Vv]ersion\s+"?(\d+)\.(\d+)\.(\d+)"#)
            .ok()
            .and_then(|re| {
                let caps = re.captures(banner)?;
                let part = |i: usize| caps.get(i)?.as_str().parse::<u32>().ok();
                Some((part(1)?, part(2)?, part(3)?))
            });
        Self { version }
    }

    /// Human-readable version string.
    pub fn version_string(&self) -> String {
        match self.version {
            Some((a, b, c)) => format!("{}.{}.{}", a, b, c),
            None => "unknown".to_string(),
        }
    }

    /// Whether `ncks --jsn` is available. Unknown versions are assumed capable.
    pub fn supports_json(&self) -> bool {
        self.version.map_or(true, |v| v >= JSON_MIN_VERSION)
    }
}
