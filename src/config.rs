//! Configuration management module.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub scan: ScanConfig,
    pub log: LogConfig,
    pub ui: UiConfig,
}

/// Which collaborators back the scan flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiMode {
    /// Local non-empty check with artificial delays.
    #[default]
    Mock,
    /// Warehouse HTTP API.
    Http,
}

/// Warehouse API connection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub mode: ApiMode,
    pub base_url: String,
    /// Bearer token, sent only when non-empty.
    pub token: String,
    /// HTTP request timeout in seconds (default: 10).
    pub timeout_secs: u64,
}

/// Scan flow settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Source bin pre-filled on the first run (e.g. the station's dock).
    pub default_location: String,
    /// Mock validation delay in milliseconds (default: 500).
    pub validate_delay_ms: u64,
    /// Mock commit delay in milliseconds (default: 1000).
    pub commit_delay_ms: u64,
    /// Upper bound on one validation or commit call (default: 15).
    pub operation_timeout_secs: u64,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub file_enabled: bool,
}

/// UI preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Completed moves kept in the session list.
    pub history_limit: usize,
}

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl AppConfig {
    /// Get config file path (same directory as executable).
    pub fn default_path() -> PathBuf {
        std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.mode == ApiMode::Http {
            if self.api.base_url.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "API base URL is required in http mode".to_string(),
                ));
            }
            if !self.api.base_url.starts_with("http") {
                return Err(ConfigError::Validation(
                    "API base URL must start with http:// or https://".to_string(),
                ));
            }
        }
        if self.api.timeout_secs < 1 {
            return Err(ConfigError::Validation("API timeout must be at least 1 second".to_string()));
        }
        if self.scan.operation_timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "Operation timeout must be at least 1 second".to_string(),
            ));
        }
        if self.ui.history_limit < 1 {
            return Err(ConfigError::Validation("History limit must be at least 1".to_string()));
        }
        if !LOG_LEVELS.contains(&self.log.level.to_ascii_lowercase().as_str()) {
            return Err(ConfigError::Validation(format!(
                "Unknown log level '{}' (expected one of: {})",
                self.log.level,
                LOG_LEVELS.join(", ")
            )));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            mode: ApiMode::Mock,
            base_url: String::new(),
            token: String::new(),
            timeout_secs: 10,
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            default_location: String::new(),
            validate_delay_ms: 500,
            commit_delay_ms: 1000,
            operation_timeout_secs: 15,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: true,
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { history_limit: 100 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_http_mode_requires_base_url() {
        let mut config = AppConfig::default();
        config.api.mode = ApiMode::Http;
        assert!(config.validate().is_err());

        config.api.base_url = "ftp://warehouse".to_string();
        assert!(config.validate().is_err());

        config.api.base_url = "https://wms.example.com".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_timeouts() {
        let mut config = AppConfig::default();
        config.scan.operation_timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_log_level() {
        let mut config = AppConfig::default();
        config.log.level = "WARN".to_string();
        assert!(config.validate().is_ok());

        config.log.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [api]
            mode = "http"
            base_url = "http://localhost:8080"

            [scan]
            default_location = "DOCK-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.mode, ApiMode::Http);
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.scan.default_location, "DOCK-1");
        assert_eq!(config.scan.validate_delay_ms, 500);
        assert_eq!(config.ui.history_limit, 100);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = AppConfig::default();
        config.scan.default_location = "DOCK-7".to_string();
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => assert_eq!(loaded, config),
            other => panic!("expected loaded config, got {other:?}"),
        }
    }

    #[test]
    fn test_try_load_missing_and_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));

        std::fs::write(&path, "[api]\nmode = 42\n").unwrap();
        assert!(matches!(
            AppConfig::try_load(&path),
            ConfigLoadResult::Invalid(ConfigError::Parse(_))
        ));

        std::fs::write(&path, "[ui]\nhistory_limit = 0\n").unwrap();
        assert!(matches!(
            AppConfig::try_load(&path),
            ConfigLoadResult::Invalid(ConfigError::Validation(_))
        ));
    }
}
