//! 订单仓储接口定义

use crate::domain::errors::DomainError;
use crate::infrastructure::Dispose;

/// 订单仓储
///
/// 仓储持有一个工作单元内的订单，工作单元结束时通过 `Dispose` 释放。
pub trait OrderRepository: Dispose {
    /// 保存订单，返回保存结果描述
    fn save(&self, order_id: &str) -> Result<String, DomainError>;

    /// 获取全部订单（按保存顺序）
    fn all_orders(&self) -> Vec<String>;

    /// 订单数量
    fn order_count(&self) -> usize {
        self.all_orders().len()
    }
}
