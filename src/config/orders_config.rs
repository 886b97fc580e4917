use serde::Deserialize;

use crate::errors::ConfigError;

/// Orders Configuration
#[derive(Debug, Clone)]
pub struct OrdersConfig {
    /// First order id suggested by the interactive console
    pub initial_order_id: String,
}

/// Partial Orders Configuration for loading from files
#[derive(Deserialize, Debug, Default)]
pub struct PartialOrdersConfig {
    pub initial_order_id: Option<String>,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            initial_order_id: default_initial_order_id(),
        }
    }
}

impl OrdersConfig {
    /// Create OrdersConfig from partial config with defaults
    pub fn from_partial(partial: Option<PartialOrdersConfig>) -> Result<Self, ConfigError> {
        let initial_order_id = partial
            .and_then(|c| c.initial_order_id)
            .unwrap_or_else(default_initial_order_id);

        if initial_order_id.trim().is_empty() {
            return Err(ConfigError::invalid("orders.initial_order_id", initial_order_id));
        }

        Ok(Self { initial_order_id })
    }
}

// Default functions
fn default_initial_order_id() -> String {
    "ORDER-001".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_initial_order_id_rejected() {
        let partial = PartialOrdersConfig {
            initial_order_id: Some("  ".to_string()),
        };
        assert!(OrdersConfig::from_partial(Some(partial)).is_err());
        assert_eq!(OrdersConfig::from_partial(None).unwrap().initial_order_id, "ORDER-001");
    }
}
