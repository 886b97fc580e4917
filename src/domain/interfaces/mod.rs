//! 领域层接口定义
//!
//! 高层服务只依赖这些抽象，具体实现由容器在运行时注入。

pub mod messaging;
pub mod orders;

pub use messaging::{MessageSender, MessageSenderFactory, SenderKind};
pub use orders::OrderRepository;
