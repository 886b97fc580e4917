//! 服务键与类型擦除实例

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use super::error::ContainerError;

/// 类型擦除后的服务实例
///
/// 内部始终保存一个 `Arc<T>`（`T` 可以是 `dyn Trait`），
/// 因此对同一缓存实例的多次解析会得到指向同一对象的 `Arc<T>`。
pub(crate) type AnyInstance = Arc<dyn Any + Send + Sync>;

/// 服务键：服务契约的类型标识
///
/// 相等性只由 `TypeId` 决定，`name` 仅用于日志和错误信息。
#[derive(Clone, Copy)]
pub struct ServiceKey {
    id: TypeId,
    name: &'static str,
}

impl ServiceKey {
    /// 获取类型 `T` 的服务键，`T` 可以是 trait 对象类型
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn type_id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for ServiceKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

pub(crate) fn erase<T: ?Sized + Send + Sync + 'static>(instance: Arc<T>) -> AnyInstance {
    Arc::new(instance)
}

pub(crate) fn downcast<T: ?Sized + Send + Sync + 'static>(
    instance: &AnyInstance,
    context: &'static str,
) -> Result<Arc<T>, ContainerError> {
    instance
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or(ContainerError::TypeCastFailed {
            expected_type: std::any::type_name::<T>(),
            context,
        })
}
