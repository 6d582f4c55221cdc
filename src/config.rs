//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    #[serde(default)]
    pub ui: UiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Backend connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Unset means no timeout: a stalled backend keeps the request pending
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

/// Presentation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Example questions offered as chips in the interactive session
    #[serde(default = "default_examples")]
    pub examples: Vec<String>,

    #[serde(default = "default_color")]
    pub color: bool,

    /// Show generated SQL expanded instead of collapsed
    #[serde(default)]
    pub show_sql: bool,

    #[serde(default = "default_chart_width")]
    pub chart_width: usize,

    #[serde(default = "default_chart_height")]
    pub chart_height: usize,
}

fn default_examples() -> Vec<String> {
    vec![
        "Show total sales by month".to_string(),
        "Forecast sales for next 30 days".to_string(),
    ]
}

fn default_color() -> bool {
    true
}

fn default_chart_width() -> usize {
    60
}

fn default_chart_height() -> usize {
    12
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            examples: default_examples(),
            color: default_color(),
            show_sql: false,
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,

    pub file: Option<String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
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

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        for path in Self::default_paths() {
            if path.exists() {
                match Self::load_with_env(&path) {
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

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Config file locations, in search order
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("askboard").join("config.toml"));
        }
        paths.push(PathBuf::from("./askboard.toml"));
        paths
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Backend overrides
        if let Some(url) = lookup("ASKBOARD_BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Some(timeout) = lookup("ASKBOARD_REQUEST_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(0) => self.backend.request_timeout_secs = None,
                Ok(secs) => self.backend.request_timeout_secs = Some(secs),
                Err(_) => {
                    tracing::warn!("Ignoring invalid ASKBOARD_REQUEST_TIMEOUT_SECS: {}", timeout)
                }
            }
        }

        // Logging overrides
        if let Some(level) = lookup("ASKBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("ASKBOARD_LOG_FORMAT") {
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
    r#"# Askboard Configuration
#
# Environment variables override these settings:
# - ASKBOARD_BACKEND_URL
# - ASKBOARD_REQUEST_TIMEOUT_SECS (0 disables the timeout)
# - ASKBOARD_LOG_LEVEL
# - ASKBOARD_LOG_FORMAT

[backend]
# Query/forecast backend URL
base_url = "http://localhost:8000"

# Request timeout in seconds (omit to wait indefinitely)
# request_timeout_secs = 60

[ui]
# Example questions offered in the interactive session
examples = ["Show total sales by month", "Forecast sales for next 30 days"]

# Use ANSI styling in rendered output
color = true

# Show generated SQL expanded by default
show_sql = false

# Chart plot area in terminal cells
chart_width = 60
chart_height = 12

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty or json
format = "pretty"

# Optional log file path (logs go to stderr otherwise)
# file = "/tmp/askboard.log"
"#
    .to_string()
}
