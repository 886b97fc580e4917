//! 作用域
//!
//! 作用域拥有自己的作用域实例缓存，单例仍由根容器提供。
//! 作用域结束（显式调用 `dispose` 或被丢弃）时，按创建逆序释放其作用域实例。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::dispose::DisposeBag;
use super::error::ContainerError;
use super::key::ServiceKey;
use super::resolver::{InstanceSlot, Resolver};
use super::service_container::ServiceContainer;

pub(crate) struct ScopeInner {
    pub(crate) id: uuid::Uuid,
    pub(crate) name: String,
    pub(crate) instances: DashMap<ServiceKey, InstanceSlot>,
    pub(crate) disposables: DisposeBag,
    pub(crate) disposed: AtomicBool,
}

/// 作用域句柄
///
/// 不可克隆：句柄被丢弃即代表作用域结束。
pub struct ServiceScope {
    container: ServiceContainer,
    inner: ScopeInner,
}

impl ServiceScope {
    pub(crate) fn new(container: ServiceContainer, name: String) -> Self {
        let id = uuid::Uuid::new_v4();
        tracing::debug!(scope_id = %id, scope_name = %name, "Scope created");
        Self {
            container,
            inner: ScopeInner {
                id,
                name,
                instances: DashMap::new(),
                disposables: DisposeBag::default(),
                disposed: AtomicBool::new(false),
            },
        }
    }

    /// 在作用域中解析服务
    pub fn resolve<T>(&self) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Resolver::new(self.container.inner(), Some(&self.inner)).resolve::<T>()
    }

    /// 在作用域中解析可选服务
    pub fn try_resolve<T>(&self) -> Result<Option<Arc<T>>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Resolver::new(self.container.inner(), Some(&self.inner)).try_resolve::<T>()
    }

    pub fn id(&self) -> uuid::Uuid {
        self.inner.id
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// 所属容器
    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    /// 当前作用域中已创建的作用域实例数量
    pub fn instance_count(&self) -> usize {
        self.inner.instances.len()
    }

    /// 结束作用域并释放作用域实例，重复调用无副作用
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let disposed = self.inner.disposables.dispose_all("scope");
        self.inner.instances.clear();
        tracing::debug!(
            scope_id = %self.inner.id,
            scope_name = %self.inner.name,
            disposed,
            "Scope disposed"
        );
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }
}

impl Drop for ServiceScope {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl std::fmt::Debug for ServiceScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceScope")
            .field("id", &self.inner.id)
            .field("name", &self.inner.name)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
