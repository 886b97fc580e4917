//! 依赖注入容器
//!
//! - `ServiceCollection`：注册服务（键 → 工厂 + 生命周期），`build()` 后封存
//! - `ServiceContainer`：解析服务、持有单例缓存、创建作用域
//! - `ServiceScope`：作用域实例缓存，结束时释放资源
//! - 循环依赖检测、释放钩子、统计信息

mod dispose;
mod error;
mod key;
mod registry;
mod resolver;
mod scope;
mod service_container;
mod stats;

pub use dispose::Dispose;
pub use error::ContainerError;
pub use key::ServiceKey;
pub use registry::{ServiceCollection, ServiceProvider};
pub use resolver::Resolver;
pub use scope::ServiceScope;
pub use service_container::ServiceContainer;
pub use stats::ContainerStats;

/// 服务生命周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceLifetime {
    /// 单例 - 整个容器生命周期只有一个实例
    Singleton,
    /// 作用域 - 在同一作用域内共享实例
    Scoped,
    /// 瞬态 - 每次解析都创建新实例
    Transient,
}

impl std::fmt::Display for ServiceLifetime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ServiceLifetime::Singleton => "singleton",
            ServiceLifetime::Scoped => "scoped",
            ServiceLifetime::Transient => "transient",
        };
        f.write_str(name)
    }
}
