//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Sentiment backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

fn default_backend_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}

fn default_max_retries() -> u32 {
    3
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            request_timeout_ms: default_request_timeout(),
            max_retries: default_max_retries(),
        }
    }
}

/// Analysis pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default = "default_simulate_on_failure")]
    pub simulate_on_failure: bool,

    #[serde(default = "default_use_csv_endpoint")]
    pub use_csv_endpoint: bool,

    #[serde(default = "default_per_item_cap")]
    pub per_item_cap: usize,

    #[serde(default = "default_history_cap")]
    pub history_cap: usize,

    #[serde(default = "default_max_text_len")]
    pub max_text_len: usize,

    #[serde(default)]
    pub refresh_after_analyze: bool,
}

fn default_simulate_on_failure() -> bool {
    true
}

fn default_use_csv_endpoint() -> bool {
    true
}

fn default_per_item_cap() -> usize {
    10
}

fn default_history_cap() -> usize {
    20
}

fn default_max_text_len() -> usize {
    1000
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            simulate_on_failure: default_simulate_on_failure(),
            use_csv_endpoint: default_use_csv_endpoint(),
            per_item_cap: default_per_item_cap(),
            history_cap: default_history_cap(),
            max_text_len: default_max_text_len(),
            refresh_after_analyze: false,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("moodify").join("config.toml")),
            Some(PathBuf::from("./moodify.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("MOODIFY_BACKEND_URL") {
            self.backend.url = url;
        }
        if let Ok(cap) = std::env::var("MOODIFY_HISTORY_CAP") {
            if let Ok(cap) = cap.parse() {
                self.analysis.history_cap = cap;
            }
        }
        if let Ok(level) = std::env::var("MOODIFY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("MOODIFY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Moodify Configuration
#
# Environment variables override these settings:
# - MOODIFY_BACKEND_URL
# - MOODIFY_HISTORY_CAP
# - MOODIFY_LOG_LEVEL
# - MOODIFY_LOG_FORMAT

[backend]
# Sentiment backend base URL
url = "http://localhost:5000"

# Request timeout (ms)
request_timeout_ms = 5000

# Retry attempts for history/stats fetches
max_retries = 3

[analysis]
# Show simulated results when the backend is unreachable (demo mode)
simulate_on_failure = true

# Whether the backend exposes the /predict/csv upload endpoint
use_csv_endpoint = true

# Cap on sequential per-item requests in the last network fallback
per_item_cap = 10

# Rolling history length; oldest entries evicted past the cap
history_cap = 20

# Maximum accepted length for a single review text (characters)
max_text_len = 1000

# Re-fetch backend history and stats after each successful analysis
refresh_after_analyze = false

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.backend.url, "http://localhost:5000");
        assert!(config.analysis.simulate_on_failure);
        assert_eq!(config.analysis.per_item_cap, 10);
        assert_eq!(config.analysis.history_cap, 20);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.backend.url, "http://localhost:5000");
        assert_eq!(config.analysis.max_text_len, 1000);
        assert!(!config.analysis.refresh_after_analyze);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[backend]\nurl = \"http://api:9000\"\n").unwrap();
        assert_eq!(config.backend.url, "http://api:9000");
        assert_eq!(config.backend.request_timeout_ms, 5000);
        assert_eq!(config.analysis.history_cap, 20);
    }
}
