//! 消息发送器工厂

use std::sync::Arc;

use parking_lot::RwLock;

use crate::domain::interfaces::{MessageSender, MessageSenderFactory, SenderKind};
use crate::domain::services::{EmailSender, SmsSender};

/// 默认发送器工厂
///
/// 每次调用都创建新的发送器；默认渠道可在运行时切换。
#[derive(Debug, Default)]
pub struct DefaultMessageSenderFactory {
    default_kind: RwLock<SenderKind>,
}

impl DefaultMessageSenderFactory {
    pub fn new(default_kind: SenderKind) -> Self {
        Self {
            default_kind: RwLock::new(default_kind),
        }
    }
}

impl MessageSenderFactory for DefaultMessageSenderFactory {
    fn create_sender(&self, kind: SenderKind) -> Arc<dyn MessageSender> {
        tracing::debug!(%kind, "Creating message sender");
        match kind {
            SenderKind::Email => Arc::new(EmailSender::new()),
            SenderKind::Sms => Arc::new(SmsSender::new()),
        }
    }

    fn set_default_sender(&self, kind: SenderKind) {
        let mut current = self.default_kind.write();
        tracing::info!(from = %*current, to = %kind, "Default message sender switched");
        *current = kind;
    }

    fn default_kind(&self) -> SenderKind {
        *self.default_kind.read()
    }
}
