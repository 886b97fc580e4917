//! 服务注册表
//!
//! `ServiceCollection` 是容器的构建器：注册只能在这里发生，
//! `build()` 之后注册表即被封存，容器本身不提供任何修改注册的 API。

use std::collections::HashMap;
use std::sync::Arc;

use super::dispose::{disposer_for, Dispose, Disposer};
use super::error::ContainerError;
use super::key::{erase, AnyInstance, ServiceKey};
use super::resolver::Resolver;
use super::service_container::ServiceContainer;
use super::ServiceLifetime;

/// 类型擦除的服务工厂
pub(crate) type Factory =
    Arc<dyn Fn(&Resolver<'_>) -> Result<AnyInstance, ContainerError> + Send + Sync>;

fn erased_factory<F>(factory: F) -> Factory
where
    F: Fn(&Resolver<'_>) -> Result<AnyInstance, ContainerError> + Send + Sync + 'static,
{
    Arc::new(factory)
}

/// 服务提供者trait
///
/// 适用于需要携带状态的提供者；简单场景直接向 `register` 传入闭包即可。
pub trait ServiceProvider: Send + Sync + 'static {
    type Service: ?Sized + Send + Sync + 'static;

    /// 创建服务实例，依赖通过 `resolver` 解析
    fn create(&self, resolver: &Resolver<'_>) -> Result<Arc<Self::Service>, ContainerError>;
}

/// 服务注册信息
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) key: ServiceKey,
    pub(crate) lifetime: ServiceLifetime,
    pub(crate) factory: Factory,
    pub(crate) disposer: Option<Disposer>,
}

/// 服务注册集合（容器构建器）
///
/// 默认采用宽松策略：同一服务键重复注册时后注册者生效，并记录一条警告。
/// 通过 [`ServiceCollection::strict`] 创建的集合会拒绝重复注册。
#[derive(Clone, Default)]
pub struct ServiceCollection {
    registrations: HashMap<ServiceKey, Registration>,
    strict: bool,
}

impl ServiceCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// 创建严格模式的集合：重复注册返回 `DuplicateRegistration`
    pub fn strict() -> Self {
        Self {
            registrations: HashMap::new(),
            strict: true,
        }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// 注册服务
    ///
    /// `T` 是服务契约，可以是具体类型也可以是 `dyn Trait`；
    /// 工厂通过 `Resolver` 解析自身的依赖（构造函数注入）。
    pub fn register<T, F>(
        &mut self,
        lifetime: ServiceLifetime,
        factory: F,
    ) -> Result<&mut Self, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        let factory = erased_factory(move |resolver: &Resolver<'_>| factory(resolver).map(erase));
        self.insert(Registration {
            key: ServiceKey::of::<T>(),
            lifetime,
            factory,
            disposer: None,
        })
    }

    /// 注册单例服务
    pub fn register_singleton<T, F>(&mut self, factory: F) -> Result<&mut Self, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.register(ServiceLifetime::Singleton, factory)
    }

    /// 注册作用域服务
    pub fn register_scoped<T, F>(&mut self, factory: F) -> Result<&mut Self, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.register(ServiceLifetime::Scoped, factory)
    }

    /// 注册瞬态服务
    pub fn register_transient<T, F>(&mut self, factory: F) -> Result<&mut Self, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        self.register(ServiceLifetime::Transient, factory)
    }

    /// 注册简单的单例服务（不需要依赖）
    pub fn register_singleton_simple<T, F>(&mut self, factory: F) -> Result<&mut Self, ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.register::<T, _>(ServiceLifetime::Singleton, move |_| factory().map(Arc::new))
    }

    /// 注册简单的作用域服务（不需要依赖）
    pub fn register_scoped_simple<T, F>(&mut self, factory: F) -> Result<&mut Self, ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.register::<T, _>(ServiceLifetime::Scoped, move |_| factory().map(Arc::new))
    }

    /// 注册简单的瞬态服务（不需要依赖）
    pub fn register_transient_simple<T, F>(&mut self, factory: F) -> Result<&mut Self, ContainerError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Result<T, ContainerError> + Send + Sync + 'static,
    {
        self.register::<T, _>(ServiceLifetime::Transient, move |_| factory().map(Arc::new))
    }

    /// 使用 `ServiceProvider` 注册服务
    pub fn register_provider<P>(
        &mut self,
        lifetime: ServiceLifetime,
        provider: P,
    ) -> Result<&mut Self, ContainerError>
    where
        P: ServiceProvider,
    {
        let provider = Arc::new(provider);
        self.register::<P::Service, _>(lifetime, move |resolver| provider.create(resolver))
    }

    /// 注册一个已经构造好的单例实例
    pub fn register_instance<T>(&mut self, instance: Arc<T>) -> Result<&mut Self, ContainerError>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.register::<T, _>(ServiceLifetime::Singleton, move |_| Ok(instance.clone()))
    }

    /// 注册需要释放资源的服务
    ///
    /// 单例在容器释放时、作用域服务在作用域释放时调用 `Dispose::dispose`。
    pub fn register_disposable<T, F>(
        &mut self,
        lifetime: ServiceLifetime,
        factory: F,
    ) -> Result<&mut Self, ContainerError>
    where
        T: ?Sized + Dispose + Send + Sync + 'static,
        F: Fn(&Resolver<'_>) -> Result<Arc<T>, ContainerError> + Send + Sync + 'static,
    {
        if lifetime == ServiceLifetime::Transient {
            tracing::warn!(
                service = std::any::type_name::<T>(),
                "Transient instances are owned by the caller and will not be disposed by the container"
            );
        }
        let factory = erased_factory(move |resolver: &Resolver<'_>| factory(resolver).map(erase));
        self.insert(Registration {
            key: ServiceKey::of::<T>(),
            lifetime,
            factory,
            disposer: Some(disposer_for::<T>()),
        })
    }

    /// 检查服务是否已注册
    pub fn contains<T: ?Sized + 'static>(&self) -> bool {
        self.registrations.contains_key(&ServiceKey::of::<T>())
    }

    /// 移除注册，返回是否存在
    pub fn remove<T: ?Sized + 'static>(&mut self) -> bool {
        self.registrations.remove(&ServiceKey::of::<T>()).is_some()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// 封存注册表并创建容器
    pub fn build(self) -> ServiceContainer {
        tracing::debug!(
            services = self.registrations.len(),
            strict = self.strict,
            "Building service container"
        );
        ServiceContainer::from_registrations(self.registrations)
    }

    fn insert(&mut self, registration: Registration) -> Result<&mut Self, ContainerError> {
        let key = registration.key;
        if let Some(existing) = self.registrations.get(&key) {
            if self.strict {
                return Err(ContainerError::DuplicateRegistration {
                    type_name: key.name(),
                });
            }
            tracing::warn!(
                service = key.name(),
                old_lifetime = ?existing.lifetime,
                new_lifetime = ?registration.lifetime,
                "Replacing existing service registration"
            );
        } else {
            tracing::trace!(service = key.name(), lifetime = ?registration.lifetime, "Registering service");
        }
        self.registrations.insert(key, registration);
        Ok(self)
    }
}
