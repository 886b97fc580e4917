pub mod app;
pub mod args;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infrastructure;
pub mod logging;

// Re-export commonly used items for convenience
pub use app::DemoApp;
pub use config::AppConfig;
pub use errors::AppError;
pub use infrastructure::{
    ContainerError, ServiceCollection, ServiceContainer, ServiceLifetime, ServiceScope,
};
