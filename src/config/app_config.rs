use serde::Deserialize;
use std::{collections::HashMap, path::PathBuf};

use crate::errors::ConfigError;
use crate::logging::LoggingConfig;

use super::{
    container_config::{ContainerConfig, PartialContainerConfig},
    loader::ConfigLoader,
    log_config::{LogConfig, PartialLogConfig},
    messaging_config::{MessagingConfig, PartialMessagingConfig},
    orders_config::{OrdersConfig, PartialOrdersConfig},
};

// Configuration location constants
pub const USER_CONFIG_DIR: &str = "iocdemo";
pub const CONFIG_FILE_NAME: &str = "config.toml";

// Environment overrides
pub const ENV_SENDER: &str = "IOCDEMO_SENDER";
pub const ENV_STRICT: &str = "IOCDEMO_STRICT";
pub const ENV_LOG_LEVEL: &str = "IOCDEMO_LOG_LEVEL";

/// Main Application Configuration
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub container: ContainerConfig,
    pub messaging: MessagingConfig,
    pub orders: OrdersConfig,
    pub logging: LogConfig,
}

/// Partial Application Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialAppConfig {
    container: Option<PartialContainerConfig>,
    messaging: Option<PartialMessagingConfig>,
    orders: Option<PartialOrdersConfig>,
    logging: Option<PartialLogConfig>,
}

impl AppConfig {
    /// Load configuration from the default file and environment
    pub fn load() -> Result<Self, ConfigError> {
        ConfigLoader::new().load_config()
    }

    /// Load configuration from an explicit file (must exist)
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        ConfigLoader::with_config_file(path).load_config()
    }

    /// Create AppConfig from partial config and environment
    ///
    /// Environment values take precedence over file values, which take
    /// precedence over defaults.
    pub fn from_partial_and_env(
        partial: Option<PartialAppConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let partial = partial.unwrap_or_default();

        Ok(AppConfig {
            container: ContainerConfig::from_env_or_file(partial.container, env_map)?,
            messaging: MessagingConfig::from_env_or_file(partial.messaging, env_map)?,
            orders: OrdersConfig::from_partial(partial.orders)?,
            logging: LogConfig::from_env_or_file(partial.logging, env_map)?,
        })
    }

    /// Console/file logging settings derived from the `[logging]` section
    pub fn logging_config(&self) -> LoggingConfig {
        LoggingConfig {
            level: self.logging.level,
            format: self.logging.format,
            file_output: self.logging.file.clone(),
            ..LoggingConfig::default()
        }
    }
}
