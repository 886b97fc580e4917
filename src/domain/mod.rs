//! 领域层
//!
//! 包含演示用的业务契约与实现：
//! - 契约接口（消息发送、订单仓储、发送器工厂）
//! - 领域服务（订单处理）
//! - 领域错误

pub mod errors;
pub mod interfaces;
pub mod services;

pub use errors::DomainError;
pub use interfaces::{MessageSender, MessageSenderFactory, OrderRepository, SenderKind};
