//! 消息发送接口定义

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::domain::errors::DomainError;

/// 消息发送器
///
/// 每个实现只负责一种发送渠道，调用方只依赖这个契约。
pub trait MessageSender: Send + Sync {
    /// 发送消息，返回发送结果描述
    fn send(&self, message: &str) -> String;

    /// 发送渠道名称
    fn sender_type(&self) -> &'static str;
}

/// 发送渠道
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SenderKind {
    #[default]
    Email,
    Sms,
}

impl SenderKind {
    pub const ALL: [SenderKind; 2] = [SenderKind::Email, SenderKind::Sms];
}

impl fmt::Display for SenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SenderKind::Email => f.write_str("Email"),
            SenderKind::Sms => f.write_str("SMS"),
        }
    }
}

impl FromStr for SenderKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "email" | "mail" => Ok(SenderKind::Email),
            "sms" | "text" => Ok(SenderKind::Sms),
            other => Err(DomainError::UnsupportedSender(other.to_string())),
        }
    }
}

/// 发送器工厂：运行时按渠道创建发送器，并维护可切换的默认渠道
pub trait MessageSenderFactory: Send + Sync {
    /// 创建指定渠道的发送器
    fn create_sender(&self, kind: SenderKind) -> Arc<dyn MessageSender>;

    /// 切换默认渠道
    fn set_default_sender(&self, kind: SenderKind);

    /// 当前默认渠道
    fn default_kind(&self) -> SenderKind;

    /// 创建默认渠道的发送器
    fn default_sender(&self) -> Arc<dyn MessageSender> {
        self.create_sender(self.default_kind())
    }
}
