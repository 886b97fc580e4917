//! 短信发送器

use crate::domain::interfaces::MessageSender;

/// 通过短信渠道发送消息
#[derive(Debug, Default, Clone, Copy)]
pub struct SmsSender;

impl SmsSender {
    pub fn new() -> Self {
        tracing::debug!("SmsSender created");
        Self
    }
}

impl MessageSender for SmsSender {
    fn send(&self, message: &str) -> String {
        tracing::info!(channel = "sms", %message, "Sending message");
        format!("📱 SMS sent: {}", message)
    }

    fn sender_type(&self) -> &'static str {
        "SMS"
    }
}
