//! Start-up configuration
//!
//! Settings are read once from a JSON file and never written back. Missing
//! fields fall back to the defaults in [`crate::constants`].

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid configuration in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Initial inner window size in points
    pub window_size: [f32; 2],

    /// Rows shown in the data preview
    pub preview_rows: usize,

    /// Dark theme instead of the light default
    pub dark_mode: bool,

    /// Log filter used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            window_size: constants::layout::WINDOW_SIZE,
            preview_rows: constants::data::PREVIEW_ROWS,
            dark_mode: false,
            log_level: constants::config::DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    /// Path of the configuration file: `$DATA_VISUALIZER_CONFIG` or
    /// `data-visualizer.json` in the working directory
    pub fn config_path() -> PathBuf {
        std::env::var_os(constants::config::CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(constants::config::CONFIG_FILE))
    }

    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path())
    }

    /// Read settings from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        config.preview_rows = config.preview_rows.max(1);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "preview_rows": 25, "dark_mode": true }}"#).unwrap();
        file.flush().unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.preview_rows, 25);
        assert!(config.dark_mode);
        assert_eq!(config.window_size, constants::layout::WINDOW_SIZE);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();
        file.flush().unwrap();

        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_zero_preview_rows_is_clamped() {
        let mut file = Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{ "preview_rows": 0 }}"#).unwrap();
        file.flush().unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.preview_rows, 1);
    }
}
