//! Configuration
//!
//! Loads validation and logging settings from TOML files.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{PlaylistError, Result};

/// Version rule selection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Names of built-in rules to skip (`key-iv`, `fractional-extinf`,
    /// `byterange-iframes`)
    pub disabled_rules: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: Some("pretty".to_string()),
        }
    }
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format.as_deref() == Some("json")
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaylistConfig {
    pub validation: ValidationConfig,
    pub logging: LoggingConfig,
}

impl PlaylistConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| PlaylistError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml(&content)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| PlaylistError::Config(e.to_string()))?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = PlaylistConfig::default();
        assert!(config.validation.disabled_rules.is_empty());
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = PlaylistConfig::from_toml(
            r#"
            [validation]
            disabled_rules = ["key-iv"]
            "#,
        )
        .unwrap();
        assert_eq!(config.validation.disabled_rules, vec!["key-iv"]);
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            PlaylistConfig::from_toml("[validation\n"),
            Err(PlaylistError::Config(_))
        ));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let mut config = PlaylistConfig::default();
        config.logging.format = Some("json".to_string());
        config.validation.disabled_rules = vec!["byterange-iframes".to_string()];

        let mut temp_file = NamedTempFile::new().unwrap();
        let content = toml::to_string_pretty(&config).unwrap();
        temp_file.write_all(content.as_bytes()).unwrap();

        let loaded = PlaylistConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, config);
        assert!(loaded.logging.is_json());
    }

    #[test]
    fn test_to_file() {
        let temp_file = NamedTempFile::new().unwrap();
        PlaylistConfig::default().to_file(temp_file.path()).unwrap();

        let loaded = PlaylistConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(loaded, PlaylistConfig::default());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            PlaylistConfig::from_file("/nonexistent/hls-playlist.toml"),
            Err(PlaylistError::Io(_))
        ));
    }
}
