//! 邮件发送器

use crate::domain::interfaces::MessageSender;

/// 通过邮件渠道发送消息
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailSender;

impl EmailSender {
    pub fn new() -> Self {
        tracing::debug!("EmailSender created");
        Self
    }
}

impl MessageSender for EmailSender {
    fn send(&self, message: &str) -> String {
        tracing::info!(channel = "email", %message, "Sending message");
        format!("✉️ Email sent: {}", message)
    }

    fn sender_type(&self) -> &'static str {
        "Email"
    }
}
