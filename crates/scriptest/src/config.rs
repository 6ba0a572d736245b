//! Harness configuration
//!
//! Configuration is never read implicitly. Callers build a [`HarnessConfig`]
//! in code or load one from a TOML file they name:
//!
//! ```toml
//! pass_marker = "PASS"
//! fail_marker = "FAIL"
//! color = false
//! log_filter = "scriptest=debug"
//! ```

use crate::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Text printed in place of the test name when no test is current
pub const UNKNOWN_TEST_NAME: &str = "Unknown test name";

/// Output and logging preferences for a [`Suite`](crate::Suite)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct HarnessConfig {
    /// Marker printed for passing checks
    pub pass_marker: String,

    /// Marker printed for failing checks
    pub fail_marker: String,

    /// Fallback name when a report is made outside of any test
    pub unknown_test_name: String,

    /// Colorize case headers
    pub color: bool,

    /// Directive string handed to [`logging::init`](crate::logging::init)
    pub log_filter: String,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            pass_marker: "✅".to_string(),
            fail_marker: "❌".to_string(),
            unknown_test_name: UNKNOWN_TEST_NAME.to_string(),
            color: true,
            log_filter: "warn".to_string(),
        }
    }
}

impl HarnessConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        Self::parse(content, Path::new("<inline>"))
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ConfigError::NotFound(path.to_path_buf())
            } else {
                ConfigError::IoError(e)
            }
        })?;

        Self::parse(&content, path)
    }

    fn parse(content: &str, origin: &Path) -> ConfigResult<Self> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::TomlParseError {
            file: PathBuf::from(origin),
            error: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ConfigResult<()> {
        for (field, value) in [
            ("pass_marker", &self.pass_marker),
            ("fail_marker", &self.fail_marker),
            ("unknown_test_name", &self.unknown_test_name),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    reason: "must not be empty".to_string(),
                });
            }
        }

        if self.pass_marker == self.fail_marker {
            return Err(ConfigError::InvalidValue {
                field: "fail_marker".to_string(),
                reason: "must differ from pass_marker".to_string(),
            });
        }

        Ok(())
    }

    /// Disable or enable header colors
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Use plain-text markers instead of emoji
    pub fn with_markers(mut self, pass: impl Into<String>, fail: impl Into<String>) -> Self {
        self.pass_marker = pass.into();
        self.fail_marker = fail.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = HarnessConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.unknown_test_name, "Unknown test name");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = HarnessConfig::from_toml_str("color = false\n").unwrap();
        assert!(!config.color);
        assert_eq!(config.pass_marker, "✅");
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = HarnessConfig::from_toml_str("colour = false\n");
        assert!(matches!(result, Err(ConfigError::TomlParseError { .. })));
    }

    #[test]
    fn test_empty_marker_rejected() {
        let result = HarnessConfig::from_toml_str("pass_marker = \"  \"\n");
        match result {
            Err(ConfigError::InvalidValue { field, .. }) => assert_eq!(field, "pass_marker"),
            other => panic!("expected InvalidValue, got {:?}", other),
        }
    }

    #[test]
    fn test_identical_markers_rejected() {
        let result = HarnessConfig::from_toml_str("pass_marker = \"x\"\nfail_marker = \"x\"\n");
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scriptest.toml");
        fs::write(&path, "pass_marker = \"PASS\"\nfail_marker = \"FAIL\"\n").unwrap();

        let config = HarnessConfig::load_from_file(&path).unwrap();
        assert_eq!(config.pass_marker, "PASS");
        assert_eq!(config.fail_marker, "FAIL");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = HarnessConfig::load_from_file(&dir.path().join("missing.toml"));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }
}
