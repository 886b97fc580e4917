//! 内存订单仓储

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::domain::errors::DomainError;
use crate::domain::interfaces::OrderRepository;
use crate::infrastructure::Dispose;

/// 基于内存列表的订单仓储
///
/// 作为作用域服务注册：同一作用域内共享订单列表，作用域结束时释放。
#[derive(Debug, Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<String>>,
    released: AtomicBool,
}

impl InMemoryOrderRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::Acquire)
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn save(&self, order_id: &str) -> Result<String, DomainError> {
        let order_id = order_id.trim();
        if order_id.is_empty() {
            return Err(DomainError::EmptyOrderId);
        }
        if self.is_released() {
            return Err(DomainError::RepositoryReleased);
        }

        let mut orders = self.orders.lock();
        orders.push(order_id.to_string());
        tracing::debug!(order_id, total = orders.len(), "Order saved");
        Ok(format!("💾 Order {} saved to repository", order_id))
    }

    fn all_orders(&self) -> Vec<String> {
        self.orders.lock().clone()
    }

    fn order_count(&self) -> usize {
        self.orders.lock().len()
    }
}

impl Dispose for InMemoryOrderRepository {
    fn dispose(&self) {
        self.released.store(true, Ordering::Release);
        let dropped = std::mem::take(&mut *self.orders.lock()).len();
        tracing::debug!(dropped, "Order repository released");
    }
}
