//! 服务容器
//!
//! 持有封存后的注册表、根单例缓存以及单例的释放列表。
//! `ServiceContainer` 是一个廉价可克隆的句柄，所有克隆共享同一份状态；
//! 最后一个句柄被丢弃时自动释放单例。

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dashmap::DashMap;

use super::dispose::DisposeBag;
use super::error::ContainerError;
use super::key::ServiceKey;
use super::registry::{Registration, ServiceCollection};
use super::resolver::{InstanceSlot, Resolver};
use super::scope::ServiceScope;
use super::stats::{ContainerStats, InnerStats};
use super::ServiceLifetime;

pub(crate) struct ContainerInner {
    pub(crate) registrations: HashMap<ServiceKey, Registration>,
    pub(crate) singletons: DashMap<ServiceKey, InstanceSlot>,
    pub(crate) disposables: DisposeBag,
    pub(crate) disposed: AtomicBool,
    pub(crate) stats: InnerStats,
}

impl ContainerInner {
    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let disposed = self.disposables.dispose_all("container");
        self.singletons.clear();
        self.stats.active_singletons.store(0, Ordering::Relaxed);
        tracing::info!(disposed, "Service container disposed");
    }
}

impl Drop for ContainerInner {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// 依赖注入容器
#[derive(Clone)]
pub struct ServiceContainer {
    inner: Arc<ContainerInner>,
}

impl ServiceContainer {
    pub(crate) fn from_registrations(registrations: HashMap<ServiceKey, Registration>) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registrations,
                singletons: DashMap::new(),
                disposables: DisposeBag::default(),
                disposed: AtomicBool::new(false),
                stats: InnerStats::default(),
            }),
        }
    }

    /// 创建注册集合（容器构建器）
    pub fn builder() -> ServiceCollection {
        ServiceCollection::new()
    }

    /// 从根容器解析服务
    ///
    /// 作用域服务不能从根容器解析，会返回 `NoActiveScope`。
    pub fn resolve<T>(&self) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Resolver::new(&self.inner, None).resolve::<T>()
    }

    /// 解析可选服务
    pub fn try_resolve<T>(&self) -> Result<Option<Arc<T>>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        Resolver::new(&self.inner, None).try_resolve::<T>()
    }

    /// 创建新的作用域，单例与容器共享
    pub fn create_scope(&self) -> ServiceScope {
        self.create_scope_named("default")
    }

    /// 创建带名称的作用域
    pub fn create_scope_named(&self, name: impl Into<String>) -> ServiceScope {
        ServiceScope::new(self.clone(), name.into())
    }

    pub(crate) fn inner(&self) -> &ContainerInner {
        &self.inner
    }

    /// 检查服务是否已注册
    pub fn is_registered<T: ?Sized + 'static>(&self) -> bool {
        self.inner.registrations.contains_key(&ServiceKey::of::<T>())
    }

    /// 获取服务的生命周期
    pub fn lifetime_of<T: ?Sized + 'static>(&self) -> Option<ServiceLifetime> {
        self.inner
            .registrations
            .get(&ServiceKey::of::<T>())
            .map(|registration| registration.lifetime)
    }

    /// 获取已注册的服务类型名称（已排序）
    pub fn registered_services(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> =
            self.inner.registrations.keys().map(|key| key.name()).collect();
        names.sort_unstable();
        names
    }

    /// 获取容器统计信息
    pub fn stats(&self) -> ContainerStats {
        self.inner.stats.snapshot(self.inner.registrations.len())
    }

    /// 释放容器：按创建逆序释放单例，重复调用无副作用
    pub fn dispose(&self) {
        self.inner.dispose();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for ServiceContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContainer")
            .field("registered_services", &self.inner.registrations.len())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
