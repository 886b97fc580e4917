pub mod app_config;
pub mod container_config;
pub mod loader;
pub mod log_config;
pub mod messaging_config;
pub mod orders_config;

// Re-export commonly used types
pub use app_config::AppConfig;
pub use container_config::ContainerConfig;
pub use loader::ConfigLoader;
pub use log_config::LogConfig;
pub use messaging_config::MessagingConfig;
pub use orders_config::OrdersConfig;

// Re-export constants
pub use app_config::{
    CONFIG_FILE_NAME, ENV_LOG_LEVEL, ENV_SENDER, ENV_STRICT, USER_CONFIG_DIR,
};
