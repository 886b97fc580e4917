use thiserror::Error;

use crate::domain::DomainError;
use crate::infrastructure::ContainerError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
    #[error("I/O error while {0}: {1}")]
    IO(String, #[source] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read file '{0}': {1}")]
    FileRead(String, #[source] std::io::Error),
    #[error("Failed to parse TOML from file '{0}': {1}")]
    TomlParse(String, #[source] toml::de::Error),
    #[error("Invalid value '{value}' for configuration field '{field}'")]
    InvalidValue { field: &'static str, value: String },
    #[error("Could not determine the user configuration directory")]
    NoConfigDir,
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            value: value.into(),
        }
    }
}

pub fn io_error(action: impl Into<String>, source: std::io::Error) -> AppError {
    AppError::IO(action.into(), source)
}
