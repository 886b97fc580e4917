use std::{collections::HashMap, env, fs, path::PathBuf};

use crate::errors::ConfigError;

use super::app_config::{
    AppConfig, PartialAppConfig, CONFIG_FILE_NAME, ENV_LOG_LEVEL, ENV_SENDER, ENV_STRICT,
    USER_CONFIG_DIR,
};

/// Configuration loader responsible for loading config from files and environment
///
/// A missing default config file is not an error: defaults apply. A config file
/// passed explicitly (`--config`) must exist.
pub struct ConfigLoader {
    base_path: Option<PathBuf>,
    config_file: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default paths
    pub fn new() -> Self {
        Self {
            base_path: None,
            config_file: None,
        }
    }

    /// Create a config loader with custom base path (for testing)
    pub fn with_base_path(base_path: PathBuf) -> Self {
        Self {
            base_path: Some(base_path),
            config_file: None,
        }
    }

    /// Create a config loader reading one explicit file
    pub fn with_config_file(path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: None,
            config_file: Some(path.into()),
        }
    }

    /// Load complete application configuration
    pub fn load_config(&self) -> Result<AppConfig, ConfigError> {
        self.load_config_with_env(&self.collect_env_vars())
    }

    /// Load configuration using the given environment map instead of the process environment
    pub fn load_config_with_env(
        &self,
        env_map: &HashMap<String, String>,
    ) -> Result<AppConfig, ConfigError> {
        let config_path = self.config_path()?;
        let partial_config = self.load_partial_config(&config_path)?;
        AppConfig::from_partial_and_env(partial_config, env_map)
    }

    /// Resolve the config file location
    pub fn config_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(file) = &self.config_file {
            let expanded = shellexpand::tilde(&file.to_string_lossy()).into_owned();
            return Ok(PathBuf::from(expanded));
        }

        let base = match &self.base_path {
            Some(base_path) => base_path.clone(),
            None => dirs::config_dir().ok_or(ConfigError::NoConfigDir)?,
        };
        Ok(base.join(USER_CONFIG_DIR).join(CONFIG_FILE_NAME))
    }

    /// Load partial configuration from TOML file
    fn load_partial_config(
        &self,
        config_path: &PathBuf,
    ) -> Result<Option<PartialAppConfig>, ConfigError> {
        if !config_path.exists() && self.config_file.is_none() {
            tracing::debug!(path = %config_path.display(), "No config file found, using defaults");
            return Ok(None);
        }

        let display_path = config_path.to_string_lossy().to_string();
        let content =
            fs::read_to_string(config_path).map_err(|e| ConfigError::FileRead(display_path.clone(), e))?;

        let partial_config: PartialAppConfig =
            toml::from_str(&content).map_err(|e| ConfigError::TomlParse(display_path.clone(), e))?;

        tracing::info!(path = %display_path, "Loaded configuration file");
        Ok(Some(partial_config))
    }

    /// Collect relevant environment variables
    fn collect_env_vars(&self) -> HashMap<String, String> {
        let env_keys = [ENV_SENDER, ENV_STRICT, ENV_LOG_LEVEL];

        let mut env_map = HashMap::new();
        for key in &env_keys {
            if let Ok(value) = env::var(key) {
                env_map.insert(key.to_string(), value);
            }
        }
        env_map
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
