use anyhow::Context;
use clap::Parser;

use iocdemo::args::Args;
use iocdemo::config::AppConfig;
use iocdemo::logging::{init_logging, parse_level};
use iocdemo::DemoApp;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path),
        None => AppConfig::load(),
    }
    .context("Failed to load configuration")?;

    // 命令行参数优先于配置文件与环境变量
    if args.strict {
        config.container.strict_registration = true;
    }
    if let Some(kind) = args.sender {
        config.messaging.default_sender = kind;
    }
    if let Some(level) = &args.log_level {
        config.logging.level = parse_level(level).context("Invalid --log-level")?;
    }

    init_logging(config.logging_config()).context("Failed to initialize logging")?;

    let app = DemoApp::new(config).context("Failed to build service container")?;
    let result = app.run(args.command, args.sender).await;

    app.container().dispose();
    tracing::debug!(stats = %app.container().stats().performance_summary(), "Shutting down");
    result.context("Command failed")
}
