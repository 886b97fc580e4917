//! 生命周期演示

use std::sync::Arc;

use crate::domain::services::OrderService;
use crate::domain::{MessageSender, OrderRepository};
use crate::infrastructure::{ContainerError, ServiceContainer};

/// 一次生命周期演示的观察结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifetimeReport {
    /// 两次解析单例得到同一实例
    pub singleton_shared: bool,
    /// 两次解析瞬态得到不同实例
    pub transient_distinct: bool,
    /// 同一作用域内两次解析得到同一实例
    pub scoped_shared_within_scope: bool,
    /// 不同作用域得到不同实例
    pub scoped_distinct_across_scopes: bool,
    /// 从根容器解析作用域服务被拒绝
    pub scoped_rejected_at_root: bool,
    pub sender_type: &'static str,
}

impl LifetimeReport {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!(
                "Singleton  dyn MessageSender ({}): same instance on every resolve: {}",
                self.sender_type,
                mark(self.singleton_shared)
            ),
            format!(
                "Transient  OrderService: new instance on every resolve: {}",
                mark(self.transient_distinct)
            ),
            format!(
                "Scoped     dyn OrderRepository: shared within a scope: {}, separate across scopes: {}",
                mark(self.scoped_shared_within_scope),
                mark(self.scoped_distinct_across_scopes)
            ),
            format!(
                "Scoped     dyn OrderRepository from the root container is rejected: {}",
                mark(self.scoped_rejected_at_root)
            ),
        ]
    }
}

fn mark(ok: bool) -> &'static str {
    if ok {
        "✅"
    } else {
        "❌"
    }
}

/// 在给定容器上演示三种生命周期
pub fn demonstrate_lifetimes(container: &ServiceContainer) -> Result<LifetimeReport, ContainerError> {
    let first_sender = container.resolve::<dyn MessageSender>()?;
    let second_sender = container.resolve::<dyn MessageSender>()?;

    let scope_one = container.create_scope_named("lifetimes-1");
    let scope_two = container.create_scope_named("lifetimes-2");

    let first_service = scope_one.resolve::<OrderService>()?;
    let second_service = scope_one.resolve::<OrderService>()?;

    let repo_one = scope_one.resolve::<dyn OrderRepository>()?;
    let repo_one_again = scope_one.resolve::<dyn OrderRepository>()?;
    let repo_two = scope_two.resolve::<dyn OrderRepository>()?;

    let scoped_rejected_at_root = matches!(
        container.resolve::<dyn OrderRepository>(),
        Err(ContainerError::NoActiveScope { .. })
    );

    let report = LifetimeReport {
        singleton_shared: Arc::ptr_eq(&first_sender, &second_sender),
        transient_distinct: !Arc::ptr_eq(&first_service, &second_service),
        scoped_shared_within_scope: Arc::ptr_eq(&repo_one, &repo_one_again),
        scoped_distinct_across_scopes: !Arc::ptr_eq(&repo_one, &repo_two),
        scoped_rejected_at_root,
        sender_type: first_sender.sender_type(),
    };
    tracing::debug!(?report, "Lifetime demonstration finished");
    Ok(report)
}
