//! Application configuration
//!
//! Read from an optional JSON file; any missing field takes its default.
//! `TRIP_PACK_DATA_DIR` and `TRIP_PACK_DB_FILE` override the file.

use std::path::{Path, PathBuf};

use rolling_logger::{LevelFilter, LoggerOptions};
use serde::{Deserialize, Serialize};

const ENV_DATA_DIR: &str = "TRIP_PACK_DATA_DIR";
const ENV_DB_FILE: &str = "TRIP_PACK_DB_FILE";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid log level '{0}'")]
    LogLevel(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub db_file: String,
    pub log: LogConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            db_file: "trip_pack.db".to_string(),
            log: LogConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub enabled: bool,
    /// Defaults to `<data_dir>/logs`
    pub dir: Option<PathBuf>,
    pub app_name: String,
    pub level: String,
    pub max_files: usize,
    pub buffer_lines: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: None,
            app_name: "TripPack".to_string(),
            level: "info".to_string(),
            max_files: rolling_logger::DEFAULT_MAX_FILES,
            buffer_lines: rolling_logger::DEFAULT_BUFFER_LINES,
        }
    }
}

impl AppConfig {
    /// Load from `path` (defaults if the file does not exist), then apply env overrides
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            serde_json::from_str(&raw)?
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Defaults plus env overrides
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn apply_env_overrides(&mut self) {
        if let Some(dir) = env_value(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(file) = env_value(ENV_DB_FILE) {
            self.db_file = file;
        }
    }

    pub fn db_path(&self) -> PathBuf {
        if self.db_file == ":memory:" {
            return PathBuf::from(":memory:");
        }
        self.data_dir.join(&self.db_file)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log
            .dir
            .clone()
            .unwrap_or_else(|| self.data_dir.join("logs"))
    }

    pub fn logger_options(&self) -> Result<LoggerOptions, ConfigError> {
        let level: LevelFilter = self
            .log
            .level
            .parse()
            .map_err(|_| ConfigError::LogLevel(self.log.level.clone()))?;

        let mut options = LoggerOptions::new(self.log_dir(), &self.log.app_name);
        options.level = level;
        options.max_files = self.log.max_files;
        options.buffer_lines = self.log.buffer_lines;
        Ok(options)
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
