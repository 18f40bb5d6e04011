//! Configuration for the verifier module.

use serde::{Deserialize, Serialize};

use super::compare::Tolerance;

/// Post-conversion verification settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifierConfig {
    /// Compare original and converted files before replacing. Off by default.
    #[serde(default)]
    pub enabled: bool,

    /// Relative tolerance for numeric comparison.
    #[serde(default = "default_rtol")]
    pub rtol: f64,

    /// Absolute tolerance for numeric comparison.
    #[serde(default = "default_atol")]
    pub atol: f64,
}

fn default_rtol() -> f64 {
    Tolerance::default().rtol
}

fn default_atol() -> f64 {
    Tolerance::default().atol
}

impl Default for VerifierConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rtol: default_rtol(),
            atol: default_atol(),
        }
    }
}

impl VerifierConfig {
    /// Enables or disables verification.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn tolerance(&self) -> Tolerance {
        Tolerance {
            rtol: self.rtol,
            atol: self.atol,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VerifierConfig::default();
        assert!(!config.enabled);
        assert_eq!(config.tolerance(), Tolerance::default());
    }
}
