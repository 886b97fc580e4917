//! 控制台视图模型
//!
//! 每个视图模型绑定一个作用域：同一个视图模型下的所有订单共享一个仓储，
//! 视图模型被丢弃时作用域随之结束。

use std::sync::Arc;

use crate::domain::services::{DynamicOrderService, OrderService};
use crate::domain::SenderKind;
use crate::errors::AppError;
use crate::infrastructure::{ServiceContainer, ServiceScope};

use super::registration::orders_config;

const WELCOME: &str = "Welcome to IoC Demo! 🎉\n\nReady to process orders...\n\n";
const CLEARED: &str = "Output cleared! 🧹\n\n";

/// 视图模型支持的命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    PlaceOrder,
    ShowOrders,
    ClearOutput,
    SwitchSender(SenderKind),
    ProcessWith(SenderKind),
    SetOrderId(String),
}

impl ConsoleCommand {
    /// 解析一行控制台输入，无法识别时返回 `None`
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match (head.to_ascii_lowercase().as_str(), rest) {
            ("place", "") => Some(ConsoleCommand::PlaceOrder),
            ("show", "") | ("orders", "") => Some(ConsoleCommand::ShowOrders),
            ("clear", "") => Some(ConsoleCommand::ClearOutput),
            ("switch", kind) => kind.parse().ok().map(ConsoleCommand::SwitchSender),
            ("process", kind) => kind.parse().ok().map(ConsoleCommand::ProcessWith),
            ("id", id) if !id.is_empty() => Some(ConsoleCommand::SetOrderId(id.to_string())),
            _ => None,
        }
    }
}

pub struct MainViewModel {
    order_service: Arc<OrderService>,
    dynamic_service: Arc<DynamicOrderService>,
    order_id_input: String,
    output: String,
    message_sender_type: &'static str,
    current_sender_type: SenderKind,
    // 最后释放：服务持有的仓储属于这个作用域
    scope: ServiceScope,
}

impl MainViewModel {
    /// 在新的作用域中解析视图模型的依赖
    pub fn new(container: &ServiceContainer) -> Result<Self, AppError> {
        let scope = container.create_scope_named("main-view-model");
        let order_service = scope.resolve::<OrderService>()?;
        let dynamic_service = scope.resolve::<DynamicOrderService>()?;
        let initial_order_id = orders_config(container)?.initial_order_id.clone();

        let message_sender_type = order_service.message_sender_type();
        let current_sender_type = dynamic_service.default_sender_kind();
        tracing::info!(
            sender = message_sender_type,
            scope_id = %scope.id(),
            "MainViewModel initialized"
        );

        Ok(Self {
            order_service,
            dynamic_service,
            order_id_input: initial_order_id,
            output: WELCOME.to_string(),
            message_sender_type,
            current_sender_type,
            scope,
        })
    }

    pub fn order_id_input(&self) -> &str {
        &self.order_id_input
    }

    pub fn set_order_id_input(&mut self, order_id: impl Into<String>) {
        self.order_id_input = order_id.into();
    }

    pub fn output(&self) -> &str {
        &self.output
    }

    /// 构造时注入的发送器渠道
    pub fn message_sender_type(&self) -> &'static str {
        self.message_sender_type
    }

    /// 当前默认渠道
    pub fn current_sender_type(&self) -> SenderKind {
        self.current_sender_type
    }

    pub fn scope(&self) -> &ServiceScope {
        &self.scope
    }

    /// 下单与按渠道处理订单需要非空订单号
    pub fn can_place_order(&self) -> bool {
        !self.order_id_input.trim().is_empty()
    }

    /// 执行命令，返回本次新增的输出
    pub fn execute(&mut self, command: ConsoleCommand) -> String {
        let before = self.output.len();
        match command {
            ConsoleCommand::PlaceOrder => self.place_order(),
            ConsoleCommand::ShowOrders => self.show_orders(),
            ConsoleCommand::ClearOutput => {
                // 清空会缩短缓冲区，直接返回清空后的全部输出
                self.clear_output();
                return self.output.clone();
            }
            ConsoleCommand::SwitchSender(kind) => self.switch_sender(kind),
            ConsoleCommand::ProcessWith(kind) => self.process_order_with(kind),
            ConsoleCommand::SetOrderId(id) => self.set_order_id_input(id),
        }
        self.output.get(before..).unwrap_or(self.output.as_str()).to_string()
    }

    pub fn place_order(&mut self) {
        if !self.can_place_order() {
            tracing::debug!("Place order ignored: empty order id");
            return;
        }

        let order_id = self.order_id_input.clone();
        tracing::info!(order_id = %order_id, "Placing order via console");

        let timestamp = chrono::Local::now().format("%H:%M:%S");
        self.append_output(&format!("[{}] Processing order: {}", timestamp, order_id));

        let result = self.order_service.place_order(&order_id);
        let failed = result.starts_with('❌');
        self.append_output(&result);
        if failed {
            self.append_output("");
            return;
        }
        self.append_output("✅ Order completed successfully!\n");

        if let Some(next) = next_order_id(&order_id) {
            self.order_id_input = next;
        }
    }

    pub fn show_orders(&mut self) {
        tracing::debug!("Order summary requested");
        self.append_output("📊 Retrieving order summary...");
        let summary = self.order_service.order_summary();
        self.append_output(&format!("📋 {}", summary));
    }

    pub fn clear_output(&mut self) {
        tracing::debug!("Clearing output");
        self.output = CLEARED.to_string();
    }

    /// 切换默认渠道
    ///
    /// 发送器工厂是单例，切换对整个容器生效，其他作用域中的 `DynamicOrderService` 同样受影响。
    pub fn switch_sender(&mut self, kind: SenderKind) {
        self.dynamic_service.switch_default_sender(kind);
        self.current_sender_type = kind;
        self.append_output(&format!("🔄 Current display switched to {} sender", kind));
        tracing::info!(sender = %kind, "Default sender switched via console");
    }

    pub fn process_order_with(&mut self, kind: SenderKind) {
        if !self.can_place_order() {
            tracing::debug!("Process order ignored: empty order id");
            return;
        }

        let order_id = self.order_id_input.clone();
        let icon = match kind {
            SenderKind::Email => "📧",
            SenderKind::Sms => "📱",
        };
        self.append_output(&format!(
            "{} Processing order {} with {} sender...",
            icon, order_id, kind
        ));

        if self.dynamic_service.process_order_with(&order_id, kind) {
            self.append_output(&format!(
                "✅ Order {} processed successfully with {}!",
                order_id, kind
            ));
            self.append_output(&format!("📊 {}", self.dynamic_service.order_summary()));
        } else {
            self.append_output(&format!(
                "❌ Failed to process order {} with {}",
                order_id, kind
            ));
        }
    }

    fn append_output(&mut self, message: &str) {
        self.output.push_str(message);
        self.output.push('\n');
    }
}

/// `ORDER-NNN` 形式的订单号自增，保留至少三位数字
pub fn next_order_id(order_id: &str) -> Option<String> {
    let number: u32 = order_id.strip_prefix("ORDER-")?.parse().ok()?;
    Some(format!("ORDER-{:03}", number.checked_add(1)?))
}

impl std::fmt::Debug for MainViewModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainViewModel")
            .field("order_id_input", &self.order_id_input)
            .field("message_sender_type", &self.message_sender_type)
            .field("current_sender_type", &self.current_sender_type)
            .field("scope", &self.scope)
            .finish()
    }
}
