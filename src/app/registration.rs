//! 服务注册
//!
//! 组合根：所有具体实现只在这里与契约绑定。

use std::sync::Arc;

use crate::config::{AppConfig, OrdersConfig};
use crate::domain::services::{
    DefaultMessageSenderFactory, DynamicOrderService, EmailSender, InMemoryOrderRepository,
    OrderService, SmsSender,
};
use crate::domain::{MessageSender, MessageSenderFactory, OrderRepository, SenderKind};
use crate::infrastructure::{ContainerError, ServiceCollection, ServiceContainer, ServiceLifetime};

type Registered<'a> = Result<&'a mut ServiceCollection, ContainerError>;

/// 注册核心服务
///
/// - 订单仓储：作用域（每个工作单元一份订单列表，作用域结束时释放）
/// - `OrderService` / `DynamicOrderService`：瞬态
/// - 发送器工厂：单例
///
/// 不包含 `dyn MessageSender`，由调用方选择具体渠道。
pub fn register_core(services: &mut ServiceCollection) -> Registered<'_> {
    register_core_components(services, SenderKind::default())
}

fn register_core_components(
    services: &mut ServiceCollection,
    default_sender: SenderKind,
) -> Registered<'_> {
    services
        .register_disposable::<dyn OrderRepository, _>(ServiceLifetime::Scoped, |_| {
            let repository: Arc<dyn OrderRepository> = Arc::new(InMemoryOrderRepository::new());
            Ok(repository)
        })?
        .register_singleton::<dyn MessageSenderFactory, _>(move |_| {
            let factory: Arc<dyn MessageSenderFactory> =
                Arc::new(DefaultMessageSenderFactory::new(default_sender));
            Ok(factory)
        })?
        .register_transient::<OrderService, _>(|resolver| {
            Ok(Arc::new(OrderService::new(
                resolver.resolve::<dyn OrderRepository>()?,
                resolver.resolve::<dyn MessageSender>()?,
            )))
        })?
        .register_transient::<DynamicOrderService, _>(|resolver| {
            Ok(Arc::new(DynamicOrderService::new(
                resolver.resolve::<dyn OrderRepository>()?,
                resolver.resolve::<dyn MessageSenderFactory>()?,
            )))
        })
}

/// 将 `S` 注册为单例 `dyn MessageSender`
///
/// 宽松模式下后注册者生效，这就是切换注入渠道的方式。
pub fn register_message_sender<S>(services: &mut ServiceCollection) -> Registered<'_>
where
    S: MessageSender + Default + 'static,
{
    services.register_singleton::<dyn MessageSender, _>(|_| {
        let sender: Arc<dyn MessageSender> = Arc::new(S::default());
        Ok(sender)
    })
}

pub fn register_email_sender(services: &mut ServiceCollection) -> Registered<'_> {
    register_message_sender::<EmailSender>(services)
}

pub fn register_sms_sender(services: &mut ServiceCollection) -> Registered<'_> {
    register_message_sender::<SmsSender>(services)
}

/// 按渠道注册注入用的发送器
pub fn register_sender_for(services: &mut ServiceCollection, kind: SenderKind) -> Registered<'_> {
    match kind {
        SenderKind::Email => register_email_sender(services),
        SenderKind::Sms => register_sms_sender(services),
    }
}

pub fn register_core_with_email(services: &mut ServiceCollection) -> Registered<'_> {
    register_core(services)?;
    register_email_sender(services)
}

pub fn register_core_with_sms(services: &mut ServiceCollection) -> Registered<'_> {
    register_core(services)?;
    register_sms_sender(services)
}

/// 按配置构建应用容器
pub fn build_container(config: &AppConfig) -> Result<ServiceContainer, ContainerError> {
    let mut services = if config.container.strict_registration {
        ServiceCollection::strict()
    } else {
        ServiceCollection::new()
    };

    let default_sender = config.messaging.default_sender;
    register_core_components(&mut services, default_sender)?;
    register_sender_for(&mut services, default_sender)?;
    services.register_instance(Arc::new(config.orders.clone()))?;

    tracing::info!(
        strict = services.is_strict(),
        sender = %default_sender,
        services = services.len(),
        "Application services registered"
    );
    Ok(services.build())
}

/// 从容器解析订单配置，未注册时使用默认值
pub(crate) fn orders_config(container: &ServiceContainer) -> Result<Arc<OrdersConfig>, ContainerError> {
    Ok(container
        .try_resolve::<OrdersConfig>()?
        .unwrap_or_else(|| Arc::new(OrdersConfig::default())))
}
