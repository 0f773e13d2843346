use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::LoggingError;

/// 日志环境配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoggingEnvironment {
    /// 开发环境
    Development,
    /// 测试环境
    Testing,
    /// 生产环境
    Production,
}

/// 日志格式配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读格式
    Pretty,
    /// JSON 格式
    Json,
    /// 紧凑格式
    Compact,
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub environment: LoggingEnvironment,
    /// 未设置 `filter` 且 `RUST_LOG` 为空时的默认级别
    pub level: Level,
    pub format: LogFormat,
    /// 显式的过滤指令，例如 `depinject=trace`
    pub filter: Option<String>,
    pub show_target: bool,
    pub show_thread_ids: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            environment: LoggingEnvironment::Development,
            level: Level::INFO,
            format: LogFormat::Pretty,
            filter: None,
            show_target: true,
            show_thread_ids: false,
        }
    }
}

impl LoggingConfig {
    /// 开发环境：输出每次解析的细节
    pub fn development() -> Self {
        Self {
            environment: LoggingEnvironment::Development,
            level: Level::DEBUG,
            format: LogFormat::Pretty,
            filter: None,
            show_target: true,
            show_thread_ids: true,
        }
    }

    pub fn production() -> Self {
        Self {
            environment: LoggingEnvironment::Production,
            level: Level::INFO,
            format: LogFormat::Json,
            filter: None,
            show_target: false,
            show_thread_ids: false,
        }
    }

    pub fn testing() -> Self {
        Self {
            environment: LoggingEnvironment::Testing,
            level: Level::ERROR,
            format: LogFormat::Compact,
            filter: None,
            show_target: false,
            show_thread_ids: false,
        }
    }

    pub fn with_filter(mut self, directives: &str) -> Self {
        self.filter = Some(directives.to_string());
        self
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        match &self.filter {
            Some(directives) => EnvFilter::try_new(directives)
                .map_err(|e| LoggingError::Filter(directives.clone(), e.to_string())),
            None => Ok(EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(self.level).into())
                .from_env_lossy()),
        }
    }
}

/// 初始化日志系统，全局只能成功一次
pub fn init_logging(config: LoggingConfig) -> Result<(), LoggingError> {
    let filter = config.env_filter()?;
    let ansi = config.environment != LoggingEnvironment::Production;

    let result = match config.format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids)
                .with_ansi(ansi);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_target(config.show_target)
                .with_thread_ids(config.show_thread_ids)
                .with_ansi(ansi);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
        }
    };
    result.map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(
        environment = ?config.environment,
        level = ?config.level,
        format = ?config.format,
        "Logging system initialized"
    );

    Ok(())
}

/// 操作计时器
pub struct OperationTimer {
    start: Instant,
    operation: String,
    metadata: HashMap<String, String>,
}

impl OperationTimer {
    pub fn new(operation: &str) -> Self {
        Self {
            start: Instant::now(),
            operation: operation.to_string(),
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(mut self, key: &str, value: &str) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    /// 完成计时并记录日志
    pub fn finish(self) -> Duration {
        let duration = self.start.elapsed();

        tracing::debug!(
            operation = %self.operation,
            duration_ms = duration.as_millis() as u64,
            duration_ns = duration.as_nanos() as u64,
            metadata = ?self.metadata,
            "Operation completed"
        );
        duration
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}
