//! 应用层
//!
//! 组合根（服务注册）、控制台视图模型以及命令的执行入口。

pub mod lifetimes;
pub mod registration;
pub mod view_model;

pub use lifetimes::{demonstrate_lifetimes, LifetimeReport};
pub use registration::{
    build_container, register_core, register_core_with_email, register_core_with_sms,
    register_email_sender, register_message_sender, register_sender_for, register_sms_sender,
};
pub use view_model::{next_order_id, ConsoleCommand, MainViewModel};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::args::Command;
use crate::config::AppConfig;
use crate::domain::services::{DynamicOrderService, OrderService};
use crate::domain::SenderKind;
use crate::errors::{io_error, AppError};
use crate::infrastructure::ServiceContainer;

const CONSOLE_HELP: &str = "Commands: place | show | clear | id <ORDER-ID> | switch <email|sms> | process <email|sms> | help | quit";

/// 演示应用
pub struct DemoApp {
    config: AppConfig,
    container: ServiceContainer,
}

impl DemoApp {
    /// 按配置构建容器并创建应用
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let container = build_container(&config)?;
        Ok(Self { config, container })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn container(&self) -> &ServiceContainer {
        &self.container
    }

    /// 运行子命令，结果写到标准输出
    pub async fn run(&self, command: Command, sender: Option<SenderKind>) -> Result<(), AppError> {
        match command {
            Command::Place { order_ids } => {
                for line in self.place_orders(&order_ids)? {
                    println!("{}", line);
                }
            }
            Command::Process { order_id } => {
                let kind = sender.unwrap_or(self.config.messaging.default_sender);
                println!("{}", self.process_order(&order_id, kind)?);
            }
            Command::Lifetimes => {
                for line in self.lifetimes()? {
                    println!("{}", line);
                }
            }
            Command::Interactive => {
                let input = tokio::io::BufReader::new(tokio::io::stdin());
                self.run_interactive(input, tokio::io::stdout()).await?;
            }
        }
        Ok(())
    }

    /// 在同一个作用域内依次下单，最后附上订单汇总
    pub fn place_orders(&self, order_ids: &[String]) -> Result<Vec<String>, AppError> {
        let scope = self.container.create_scope_named("place-orders");
        let service = scope.resolve::<OrderService>()?;

        let mut lines: Vec<String> = order_ids
            .iter()
            .map(|order_id| service.place_order(order_id))
            .collect();
        lines.push(service.order_summary());
        Ok(lines)
    }

    /// 通过发送器工厂以指定渠道处理一个订单
    pub fn process_order(&self, order_id: &str, kind: SenderKind) -> Result<String, AppError> {
        let scope = self.container.create_scope_named("process-order");
        let service = scope.resolve::<DynamicOrderService>()?;

        let message = if service.process_order_with(order_id, kind) {
            format!("✅ Order {} processed successfully with {}!", order_id, kind)
        } else {
            format!("❌ Failed to process order {} with {}", order_id, kind)
        };
        Ok(message)
    }

    /// 生命周期演示结果与容器统计
    pub fn lifetimes(&self) -> Result<Vec<String>, AppError> {
        let report = demonstrate_lifetimes(&self.container)?;
        let mut lines = report.lines();
        lines.push(self.container.stats().performance_summary());
        Ok(lines)
    }

    /// 交互式控制台：逐行读取命令，直到输入结束或 `quit`
    pub async fn run_interactive<R, W>(&self, input: R, mut output: W) -> Result<(), AppError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut view_model = MainViewModel::new(&self.container)?;
        write_out(&mut output, view_model.output()).await?;
        write_out(&mut output, &format!("{}\n", CONSOLE_HELP)).await?;

        let mut lines = input.lines();
        loop {
            let prompt = format!(
                "[{} | {}]> ",
                view_model.order_id_input(),
                view_model.current_sender_type()
            );
            write_out(&mut output, &prompt).await?;

            let Some(line) = lines
                .next_line()
                .await
                .map_err(|e| io_error("reading console input", e))?
            else {
                break;
            };

            let reply = match line.trim() {
                "" => continue,
                "quit" | "exit" => break,
                "help" => format!("{}\n", CONSOLE_HELP),
                other => match ConsoleCommand::parse(other) {
                    Some(command) => view_model.execute(command),
                    None => format!("Unknown command: {}\n{}\n", other, CONSOLE_HELP),
                },
            };
            write_out(&mut output, &reply).await?;
        }

        tracing::info!(
            scoped_instances = view_model.scope().instance_count(),
            "Interactive session finished"
        );
        Ok(())
    }
}

async fn write_out<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> Result<(), AppError> {
    output
        .write_all(text.as_bytes())
        .await
        .map_err(|e| io_error("writing console output", e))?;
    output
        .flush()
        .await
        .map_err(|e| io_error("flushing console output", e))
}
