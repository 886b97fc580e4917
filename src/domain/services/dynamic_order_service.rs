//! 动态订单服务
//!
//! 与 `OrderService` 不同，发送器不在构造时注入，而是在处理订单时通过工厂按需创建。

use std::sync::Arc;

use crate::domain::interfaces::{MessageSender, MessageSenderFactory, OrderRepository, SenderKind};

pub struct DynamicOrderService {
    repository: Arc<dyn OrderRepository>,
    factory: Arc<dyn MessageSenderFactory>,
}

impl DynamicOrderService {
    pub fn new(
        repository: Arc<dyn OrderRepository>,
        factory: Arc<dyn MessageSenderFactory>,
    ) -> Self {
        Self {
            repository,
            factory,
        }
    }

    /// 使用默认渠道处理订单
    pub fn process_order(&self, order_id: &str) -> bool {
        let sender = self.factory.default_sender();
        self.process_with_sender(order_id, sender.as_ref())
    }

    /// 使用指定渠道处理订单
    pub fn process_order_with(&self, order_id: &str, kind: SenderKind) -> bool {
        let sender = self.factory.create_sender(kind);
        self.process_with_sender(order_id, sender.as_ref())
    }

    /// 切换工厂的默认渠道，影响所有共享该工厂的服务
    pub fn switch_default_sender(&self, kind: SenderKind) {
        self.factory.set_default_sender(kind);
    }

    pub fn default_sender_kind(&self) -> SenderKind {
        self.factory.default_kind()
    }

    pub fn order_summary(&self) -> String {
        super::order_service::order_summary(self.repository.as_ref())
    }

    fn process_with_sender(&self, order_id: &str, sender: &dyn MessageSender) -> bool {
        tracing::info!(order_id, sender = sender.sender_type(), "Processing order");

        if let Err(err) = self.repository.save(order_id) {
            tracing::error!(order_id, error = %err, "Failed to save order");
            return false;
        }

        sender.send(&format!("Order {} processed", order_id));
        tracing::info!(
            order_id,
            sender = sender.sender_type(),
            "Order processed successfully"
        );
        true
    }
}

impl std::fmt::Debug for DynamicOrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicOrderService")
            .field("default_sender", &self.factory.default_kind())
            .field("orders", &self.repository.order_count())
            .finish()
    }
}
