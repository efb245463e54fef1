//! Lint configuration

use crate::error::{LintError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "designlint.toml";

/// Settings read from `designlint.toml`. Every field falls back to the
/// defaults the design system assumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LintConfig {
    /// Directories scanned for source files.
    pub roots: Vec<String>,
    /// File extensions treated as sources.
    pub extensions: Vec<String>,
    /// Component tags whose invocations are analyzed.
    pub tags: Vec<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            roots: vec!["src".to_string()],
            extensions: vec!["tsx".to_string(), "ts".to_string()],
            tags: vec!["Frame".to_string(), "Section".to_string()],
        }
    }
}

impl LintConfig {
    pub fn validate(&self) -> Result<()> {
        if self.roots.is_empty() {
            return Err(LintError::config("at least one root directory is required"));
        }
        if self.extensions.is_empty() {
            return Err(LintError::config("at least one file extension is required"));
        }
        if self.tags.is_empty() {
            return Err(LintError::config("at least one component tag is required"));
        }
        Ok(())
    }
}

/// Loads a config file, or the defaults when `path` does not exist.
pub fn load_or_default(path: &str) -> Result<LintConfig> {
    if !Path::new(path).exists() {
        log::debug!("No config at {}, using defaults", path);
        return Ok(LintConfig::default());
    }
    load(path)
}

pub fn load(config_path: &str) -> Result<LintConfig> {
    let config_content = fs::read_to_string(config_path).map_err(|e| {
        LintError::FileNotFound {
            path: format!("Config file {}: {}", config_path, e),
        }
    })?;

    let config: LintConfig = if config_path.ends_with(".json") {
        serde_json::from_str(&config_content).map_err(|e| LintError::InvalidFormat {
            message: format!("Invalid JSON config: {}", e),
        })?
    } else if config_path.ends_with(".toml") {
        toml::from_str(&config_content).map_err(|e| LintError::InvalidFormat {
            message: format!("Invalid TOML config: {}", e),
        })?
    } else {
        return Err(LintError::InvalidFormat {
            message: "Config file must be .json or .toml format".to_string(),
        });
    };

    config.validate()?;
    log::info!("Loaded configuration from {}", config_path);
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_cover_the_frame_stack() {
        let config = LintConfig::default();
        assert_eq!(config.roots, vec!["src"]);
        assert_eq!(config.extensions, vec!["tsx", "ts"]);
        assert_eq!(config.tags, vec!["Frame", "Section"]);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        let config = load_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(config.tags, vec!["Frame", "Section"]);
    }

    #[test]
    fn partial_toml_keeps_remaining_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("designlint.toml");
        fs::write(&path, "tags = [\"Frame\"]\n").unwrap();
        let config = load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.tags, vec!["Frame"]);
        assert_eq!(config.roots, vec!["src"]);
    }

    #[test]
    fn json_configs_load_too() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("designlint.json");
        fs::write(&path, "{\"roots\": [\"app\", \"lib\"]}").unwrap();
        let config = load(path.to_str().unwrap()).unwrap();
        assert_eq!(config.roots, vec!["app", "lib"]);
        assert_eq!(config.extensions, vec!["tsx", "ts"]);
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("designlint.yaml");
        fs::write(&path, "tags: [Frame]\n").unwrap();
        let err = load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LintError::InvalidFormat { .. }));
    }

    #[test]
    fn empty_tag_lists_fail_validation() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("designlint.toml");
        fs::write(&path, "tags = []\n").unwrap();
        let err = load(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LintError::Config { .. }));
    }
}
