//! 订单服务
//!
//! 通过构造函数注入仓储和发送器，自身不关心具体实现。

use std::sync::Arc;

use crate::domain::interfaces::{MessageSender, OrderRepository};

pub struct OrderService {
    repository: Arc<dyn OrderRepository>,
    sender: Arc<dyn MessageSender>,
}

impl OrderService {
    pub fn new(repository: Arc<dyn OrderRepository>, sender: Arc<dyn MessageSender>) -> Self {
        Self { repository, sender }
    }

    /// 保存订单并发送通知
    ///
    /// 失败不会向上传播，而是返回一条可直接展示的失败描述。
    pub fn place_order(&self, order_id: &str) -> String {
        tracing::info!(order_id, "Processing order");

        match self.repository.save(order_id) {
            Ok(saved) => {
                let notified = self.sender.send(&format!("Order {} processed", order_id));
                tracing::info!(
                    order_id,
                    sender = self.sender.sender_type(),
                    "Order processed successfully"
                );
                format!("{}\n{}", saved, notified)
            }
            Err(err) => {
                tracing::error!(order_id, error = %err, "Failed to process order");
                format!("❌ Failed to process order {}: {}", order_id, err)
            }
        }
    }

    pub fn order_summary(&self) -> String {
        order_summary(self.repository.as_ref())
    }

    /// 注入的发送器渠道
    pub fn message_sender_type(&self) -> &'static str {
        self.sender.sender_type()
    }
}

pub(crate) fn order_summary(repository: &dyn OrderRepository) -> String {
    let orders = repository.all_orders();
    let summary = format!("Currently {} orders: [{}]", orders.len(), orders.join(", "));
    tracing::debug!(%summary, "Order summary generated");
    summary
}

impl std::fmt::Debug for OrderService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderService")
            .field("sender", &self.sender.sender_type())
            .field("orders", &self.repository.order_count())
            .finish()
    }
}
