use serde::Deserialize;
use std::collections::HashMap;

use crate::errors::ConfigError;

use super::app_config::ENV_STRICT;

/// Container Configuration
#[derive(Debug, Clone, Default)]
pub struct ContainerConfig {
    /// Reject duplicate registrations instead of replacing them
    pub strict_registration: bool,
}

/// Partial Container Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialContainerConfig {
    pub strict_registration: Option<bool>,
}

impl ContainerConfig {
    /// Create ContainerConfig from environment variables and file config
    pub fn from_env_or_file(
        partial: Option<PartialContainerConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let strict_registration = match env_map.get(ENV_STRICT) {
            Some(value) => parse_bool(value)
                .ok_or_else(|| ConfigError::invalid("container.strict_registration", value.as_str()))?,
            None => partial
                .and_then(|c| c.strict_registration)
                .unwrap_or_default(),
        };

        Ok(Self {
            strict_registration,
        })
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
