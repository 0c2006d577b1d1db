//! Configuration loading for reports.
//!
//! Impact thresholds are loaded from a TOML configuration file:
//!
//! ```toml
//! [thresholds]
//! log = 3
//! mail = 9
//! warn = 27
//! kill = 81
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete report configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Impact thresholds for severity classification
    #[serde(default)]
    pub thresholds: Thresholds,
}

impl ReportConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded report config");
        Ok(config)
    }

    /// Parses configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.thresholds.validate()?;
        Ok(config)
    }

    /// Returns this configuration as a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Minimum total impact for each reaction level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Record the request
    pub log: i64,
    /// Notify an operator
    pub mail: i64,
    /// Show a warning page
    pub warn: i64,
    /// Terminate the session
    pub kill: i64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            log: 3,
            mail: 9,
            warn: 27,
            kill: 81,
        }
    }
}

impl Thresholds {
    /// Checks that each level is at least as high as the one before it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let levels = [
            ("log", self.log),
            ("mail", self.mail),
            ("warn", self.warn),
            ("kill", self.kill),
        ];
        for pair in levels.windows(2) {
            let (lower, lower_value) = pair[0];
            let (upper, upper_value) = pair[1];
            if upper_value < lower_value {
                return Err(ConfigError::Thresholds {
                    lower,
                    upper,
                    lower_value,
                    upper_value,
                });
            }
        }
        Ok(())
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Error writing TOML config
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    /// Thresholds out of order
    #[error("threshold `{upper}` ({upper_value}) is below `{lower}` ({lower_value})")]
    Thresholds {
        lower: &'static str,
        upper: &'static str,
        lower_value: i64,
        upper_value: i64,
    },
}
