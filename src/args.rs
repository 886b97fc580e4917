use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::domain::SenderKind;

/// iocdemo - 依赖注入容器演示
#[derive(Parser, Debug)]
#[command(name = "iocdemo", version)]
#[command(about = "依赖注入容器演示：订单处理、消息发送与服务生命周期")]
pub struct Args {
    /// 子命令
    #[command(subcommand)]
    pub command: Command,

    /// 配置文件路径（默认 ~/.config/iocdemo/config.toml）
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// 覆盖默认发送渠道 (email|sms)
    #[arg(long, global = true, value_name = "KIND", value_parser = parse_sender)]
    pub sender: Option<SenderKind>,

    /// 严格注册模式：拒绝重复注册
    #[arg(long, global = true)]
    pub strict: bool,

    /// 日志级别 (trace|debug|info|warn|error)
    #[arg(long, global = true, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 在同一个作用域内依次下单
    Place {
        /// 订单号
        #[arg(required = true)]
        order_ids: Vec<String>,
    },
    /// 通过发送器工厂处理订单，渠道取 `--sender`，未指定时使用默认渠道
    Process {
        /// 订单号
        order_id: String,
    },
    /// 演示单例、作用域与瞬态生命周期
    Lifetimes,
    /// 交互式控制台
    Interactive,
}

fn parse_sender(value: &str) -> Result<SenderKind, String> {
    value.parse().map_err(|e: crate::domain::DomainError| e.to_string())
}
