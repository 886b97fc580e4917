use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::{io_error, AppError, ConfigError};

/// 日志格式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// 人类可读格式
    #[default]
    Pretty,
    /// JSON 格式（当前以紧凑格式输出）
    Json,
    /// 紧凑格式
    Compact,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            "compact" => Ok(LogFormat::Compact),
            other => Err(ConfigError::invalid("logging.format", other)),
        }
    }
}

/// 解析日志级别，大小写不敏感
pub fn parse_level(value: &str) -> Result<Level, ConfigError> {
    Level::from_str(value.trim()).map_err(|_| ConfigError::invalid("logging.level", value))
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别（`RUST_LOG` 存在时以其为准）
    pub level: Level,
    /// 输出格式
    pub format: LogFormat,
    /// 额外写入的日志文件
    pub file_output: Option<PathBuf>,
    /// 是否显示目标模块
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 控制台是否输出颜色
    pub ansi: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            file_output: None,
            show_target: true,
            show_thread_ids: false,
            ansi: true,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            level: Level::DEBUG,
            show_thread_ids: true,
            ..Self::default()
        }
    }

    /// 创建测试环境配置
    pub fn testing() -> Self {
        Self {
            level: Level::ERROR,
            format: LogFormat::Compact,
            show_target: false,
            ansi: false,
            ..Self::default()
        }
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_output = Some(path.into());
        self
    }

    fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.level.to_string().to_lowercase()))
    }
}

fn open_log_file(path: &Path) -> Result<File, AppError> {
    if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .map_err(|e| io_error(format!("creating log directory {}", dir.display()), e))?;
    }
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| io_error(format!("opening log file {}", path.display()), e))
}

/// 初始化日志系统
///
/// 控制台输出之外，可以额外追加写入一个日志文件（无颜色）。
/// 全局订阅者只能设置一次，重复初始化会返回错误。
pub fn init_logging(config: LoggingConfig) -> Result<(), AppError> {
    let file_writer = config
        .file_output
        .as_deref()
        .map(open_log_file)
        .transpose()?
        .map(Mutex::new);
    let file_layer = file_writer.map(|writer| {
        fmt::layer()
            .with_ansi(false)
            .with_target(config.show_target)
            .with_writer(writer)
    });

    let registry = tracing_subscriber::registry()
        .with(config.env_filter())
        .with(file_layer);

    let result = match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids)
                .with_ansi(config.ansi);
            registry.with(fmt_layer).try_init()
        }
        LogFormat::Json | LogFormat::Compact => {
            // json 输出降级为紧凑格式
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids)
                .with_ansi(config.ansi);
            registry.with(fmt_layer).try_init()
        }
    };
    result.map_err(|e| AppError::Logging(e.to_string()))?;

    tracing::info!(
        level = %config.level,
        format = ?config.format,
        file = ?config.file_output,
        "Logging system initialized"
    );

    Ok(())
}

/// 测试用日志：输出交给测试框架捕获，重复调用无副作用
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(LoggingConfig::testing().env_filter())
        .with_test_writer()
        .try_init();
}
