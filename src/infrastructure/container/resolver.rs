//! 依赖解析
//!
//! 解析是从请求的服务键开始的深度优先遍历。每一层解析都会创建一个子 `Resolver`，
//! 子解析器通过 `parent` 链接到上一层，这条链就是当前调用栈上正在构造的服务集合，
//! 用于在递归之前检测循环依赖。链只存在于调用者的栈上，并发解析互不可见。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;

use super::dispose::DisposeBag;
use super::error::ContainerError;
use super::key::{downcast, AnyInstance, ServiceKey};
use super::registry::Registration;
use super::scope::ScopeInner;
use super::service_container::ContainerInner;
use super::stats::InnerStats;
use super::ServiceLifetime;

/// 单个服务键的实例槽位，保证同一缓存中每个键最多构造一次
pub(crate) type InstanceSlot = Arc<Mutex<Option<AnyInstance>>>;

/// 缓存所在位置
struct Cache<'c> {
    slots: &'c DashMap<ServiceKey, InstanceSlot>,
    disposables: &'c DisposeBag,
    hits: &'c AtomicU64,
    misses: &'c AtomicU64,
    live: Option<&'c AtomicU64>,
    owner: &'static str,
}

/// 解析器：工厂通过它解析自己的依赖
pub struct Resolver<'a> {
    inner: &'a ContainerInner,
    scope: Option<&'a ScopeInner>,
    parent: Option<&'a Resolver<'a>>,
    key: Option<ServiceKey>,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(inner: &'a ContainerInner, scope: Option<&'a ScopeInner>) -> Self {
        Self {
            inner,
            scope,
            parent: None,
            key: None,
        }
    }

    /// 解析服务，返回满足契约 `T` 的实例
    pub fn resolve<T>(&self) -> Result<Arc<T>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance = self.resolve_key(ServiceKey::of::<T>())?;
        downcast::<T>(&instance, "service resolution")
    }

    /// 解析可选依赖：未注册时返回 `Ok(None)`，其他错误照常返回
    pub fn try_resolve<T>(&self) -> Result<Option<Arc<T>>, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.ensure_alive()?;
        if !self.inner.registrations.contains_key(&ServiceKey::of::<T>()) {
            return Ok(None);
        }
        self.resolve::<T>().map(Some)
    }

    /// 当前解析是否绑定到作用域
    pub fn in_scope(&self) -> bool {
        self.scope.is_some()
    }

    /// 当前解析链（由外到内）
    pub fn chain(&self) -> Vec<ServiceKey> {
        let mut chain = Vec::new();
        let mut current: Option<&Resolver<'_>> = Some(self);
        while let Some(resolver) = current {
            if let Some(key) = resolver.key {
                chain.push(key);
            }
            current = resolver.parent;
        }
        chain.reverse();
        chain
    }

    fn ensure_alive(&self) -> Result<(), ContainerError> {
        self.ensure_owner_alive(self.scope)
    }

    fn ensure_owner_alive(&self, scope: Option<&ScopeInner>) -> Result<(), ContainerError> {
        if self.inner.disposed.load(Ordering::Acquire) {
            return Err(ContainerError::ContainerDisposed);
        }
        if let Some(scope) = scope {
            if scope.disposed.load(Ordering::Acquire) {
                return Err(ContainerError::ScopeDisposed {
                    scope_id: scope.id,
                    scope_name: scope.name.clone(),
                });
            }
        }
        Ok(())
    }

    fn find_cycle(&self, key: ServiceKey) -> Option<Vec<&'static str>> {
        let chain = self.chain();
        let start = chain.iter().position(|k| *k == key)?;
        let mut cycle: Vec<&'static str> = chain[start..].iter().map(|k| k.name()).collect();
        cycle.push(key.name());
        Some(cycle)
    }

    fn resolve_key(&self, key: ServiceKey) -> Result<AnyInstance, ContainerError> {
        self.ensure_alive()?;
        let stats = &self.inner.stats;
        InnerStats::bump(&stats.total_resolutions);

        if let Some(cycle) = self.find_cycle(key) {
            InnerStats::bump(&stats.circular_dependencies);
            tracing::error!(cycle = %cycle.join(" -> "), "Circular dependency detected");
            return Err(ContainerError::CircularDependency { cycle });
        }

        let registration = self.inner.registrations.get(&key).ok_or_else(|| {
            let mut available_services: Vec<&'static str> =
                self.inner.registrations.keys().map(|k| k.name()).collect();
            available_services.sort_unstable();
            ContainerError::ServiceNotRegistered {
                type_name: key.name(),
                available_services,
            }
        })?;

        match registration.lifetime {
            ServiceLifetime::Transient => {
                InnerStats::bump(&stats.transient_creations);
                self.create(registration, self.scope)
            }
            ServiceLifetime::Singleton => {
                let cache = Cache {
                    slots: &self.inner.singletons,
                    disposables: &self.inner.disposables,
                    hits: &stats.singleton_cache_hits,
                    misses: &stats.singleton_cache_misses,
                    live: Some(&stats.active_singletons),
                    owner: "container",
                };
                // 单例总是在根上下文中构造，不能捕获作用域实例
                self.get_or_create(registration, cache, None)
            }
            ServiceLifetime::Scoped => {
                let scope = self.scope.ok_or(ContainerError::NoActiveScope {
                    type_name: key.name(),
                })?;
                let cache = Cache {
                    slots: &scope.instances,
                    disposables: &scope.disposables,
                    hits: &stats.scoped_cache_hits,
                    misses: &stats.scoped_cache_misses,
                    live: None,
                    owner: "scope",
                };
                self.get_or_create(registration, cache, Some(scope))
            }
        }
    }

    fn get_or_create(
        &self,
        registration: &Registration,
        cache: Cache<'_>,
        scope: Option<&ScopeInner>,
    ) -> Result<AnyInstance, ContainerError> {
        let key = registration.key;
        let slot = cache
            .slots
            .entry(key)
            .or_insert_with(|| Arc::new(Mutex::new(None)))
            .clone();

        // map 的分片锁已释放；槽位锁在工厂运行期间保持，串行化同一键的首次创建
        let mut guard = slot.lock();
        if let Some(instance) = guard.as_ref() {
            self.ensure_owner_alive(scope)?;
            InnerStats::bump(cache.hits);
            return Ok(instance.clone());
        }

        InnerStats::bump(cache.misses);
        let instance = self.create(registration, scope)?;
        tracing::debug!(
            service = key.name(),
            lifetime = ?registration.lifetime,
            owner = cache.owner,
            "Created service instance"
        );

        if let Some(disposer) = &registration.disposer {
            if !cache.disposables.push(key, instance.clone(), disposer.clone()) {
                // 所属者在构造期间已被释放，新实例立即释放
                disposer(&instance);
            }
        }
        // 构造期间所属者被释放时不缓存也不返回实例；已记录的实例由 dispose_all 释放
        self.ensure_owner_alive(scope)?;
        if let Some(live) = cache.live {
            InnerStats::bump(live);
        }
        *guard = Some(instance.clone());
        Ok(instance)
    }

    fn create(
        &self,
        registration: &Registration,
        scope: Option<&ScopeInner>,
    ) -> Result<AnyInstance, ContainerError> {
        let child = Resolver {
            inner: self.inner,
            scope,
            parent: Some(self),
            key: Some(registration.key),
        };
        (registration.factory)(&child).map_err(|err| {
            tracing::debug!(service = registration.key.name(), error = %err, "Service construction failed");
            err
        })
    }
}
