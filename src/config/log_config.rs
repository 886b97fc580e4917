use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};
use tracing::Level;

use crate::errors::ConfigError;
use crate::logging::{parse_level, LogFormat};

use super::app_config::ENV_LOG_LEVEL;

/// Logging Configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub format: LogFormat,
    /// Optional log file (supports ~ expansion)
    pub file: Option<PathBuf>,
}

/// Partial Logging Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialLogConfig {
    pub level: Option<String>,
    pub format: Option<String>,
    pub file: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::default(),
            file: None,
        }
    }
}

impl LogConfig {
    /// Create LogConfig from environment variables and file config
    pub fn from_env_or_file(
        partial: Option<PartialLogConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();

        let level = match env_map.get(ENV_LOG_LEVEL).or(partial.level.as_ref()) {
            Some(value) => parse_level(value)?,
            None => Level::INFO,
        };

        let format = match partial.format.as_deref() {
            Some(value) => value.parse()?,
            None => LogFormat::default(),
        };

        let file = partial
            .file
            .filter(|path| !path.trim().is_empty())
            .map(|path| PathBuf::from(shellexpand::tilde(&path).as_ref()));

        Ok(Self {
            level,
            format,
            file,
        })
    }
}
