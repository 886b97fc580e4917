use serde::Deserialize;
use std::collections::HashMap;

use crate::domain::SenderKind;
use crate::errors::ConfigError;

use super::app_config::ENV_SENDER;

/// Messaging Configuration
#[derive(Debug, Clone, Default)]
pub struct MessagingConfig {
    /// Channel used by the sender factory and the injected sender
    pub default_sender: SenderKind,
}

/// Partial Messaging Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialMessagingConfig {
    pub default_sender: Option<String>,
}

impl MessagingConfig {
    /// Create MessagingConfig from environment variables and file config
    pub fn from_env_or_file(
        partial: Option<PartialMessagingConfig>,
        env_map: &HashMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let raw = env_map
            .get(ENV_SENDER)
            .cloned()
            .or_else(|| partial.and_then(|c| c.default_sender));

        let default_sender = match raw {
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::invalid("messaging.default_sender", value))?,
            None => SenderKind::default(),
        };

        Ok(Self { default_sender })
    }
}
