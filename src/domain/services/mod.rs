//! 领域服务实现

pub mod dynamic_order_service;
pub mod email_sender;
pub mod order_repository;
pub mod order_service;
pub mod sender_factory;
pub mod sms_sender;

pub use dynamic_order_service::DynamicOrderService;
pub use email_sender::EmailSender;
pub use order_repository::InMemoryOrderRepository;
pub use order_service::OrderService;
pub use sender_factory::DefaultMessageSenderFactory;
pub use sms_sender::SmsSender;
