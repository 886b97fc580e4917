//! 容器错误类型

use thiserror::Error;

/// 依赖注入容器错误
///
/// 所有错误都同步返回给 `resolve` 的调用者，容器不会自动重试：
/// 注册或依赖图配置错误属于编程错误，而不是瞬时故障。
#[derive(Debug, Error)]
pub enum ContainerError {
    /// 服务未注册
    #[error("Service '{type_name}' is not registered{}", available_hint(.available_services))]
    ServiceNotRegistered {
        type_name: &'static str,
        available_services: Vec<&'static str>,
    },

    /// 循环依赖，`cycle` 为从最外层解析到重复出现的服务的完整路径
    #[error("Circular dependency detected: {}", .cycle.join(" -> "))]
    CircularDependency { cycle: Vec<&'static str> },

    /// 容器已释放
    #[error("Service container has been disposed")]
    ContainerDisposed,

    /// 作用域已释放
    #[error("Scope '{scope_name}' ({scope_id}) has been disposed")]
    ScopeDisposed {
        scope_id: uuid::Uuid,
        scope_name: String,
    },

    /// 在根容器（或单例工厂）中解析作用域服务
    #[error("Scoped service '{type_name}' cannot be resolved without an active scope")]
    NoActiveScope { type_name: &'static str },

    /// 严格模式下重复注册
    #[error("Service '{type_name}' is already registered")]
    DuplicateRegistration { type_name: &'static str },

    /// 工厂创建服务失败
    #[error("Failed to create service '{service_type}': {reason}")]
    ServiceCreationFailed {
        service_type: &'static str,
        reason: String,
    },

    /// 缓存实例类型与请求类型不一致
    #[error("Type cast failed: expected '{expected_type}' in {context}")]
    TypeCastFailed {
        expected_type: &'static str,
        context: &'static str,
    },
}

impl ContainerError {
    /// 供工厂闭包使用：把任意错误包装为 `ServiceCreationFailed`
    pub fn creation_failed<T: ?Sized>(reason: impl std::fmt::Display) -> Self {
        ContainerError::ServiceCreationFailed {
            service_type: std::any::type_name::<T>(),
            reason: reason.to_string(),
        }
    }

    /// 是否为循环依赖错误
    pub fn is_cycle(&self) -> bool {
        matches!(self, ContainerError::CircularDependency { .. })
    }
}

fn available_hint(available: &[&'static str]) -> String {
    if available.is_empty() {
        String::new()
    } else {
        format!(". Available services: {}", available.join(", "))
    }
}
