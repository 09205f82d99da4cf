//! CLI 配置
//!
//! 把配置文件中的日志设置与命令行参数合并成各阶段的过滤级别

use lumo_config::{LogLevel, LoggingConfig, Phase};
use tracing::level_filters::LevelFilter;

/// CLI 日志配置
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub global: LevelFilter,
    pub lexer: Option<LevelFilter>,
    pub compiler: Option<LevelFilter>,
    pub vm: Option<LevelFilter>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self::from_logging(&LoggingConfig::default())
    }
}

impl LogConfig {
    /// Build from the `logging` section of a config file
    pub fn from_logging(logging: &LoggingConfig) -> Self {
        Self {
            global: to_level_filter(logging.level),
            lexer: logging.lexer.map(to_level_filter),
            compiler: logging.compiler.map(to_level_filter),
            vm: logging.vm.map(to_level_filter),
        }
    }

    /// Get log level for a specific phase
    pub fn level_for(&self, phase: Phase) -> LevelFilter {
        let specific = match phase {
            Phase::Lexer => self.lexer,
            Phase::Compiler => self.compiler,
            Phase::Vm => self.vm,
            Phase::Api | Phase::Cli => None,
        };
        specific.unwrap_or(self.global)
    }
}

pub fn to_level_filter(level: LogLevel) -> LevelFilter {
    match level {
        LogLevel::Off => LevelFilter::OFF,
        LogLevel::Error => LevelFilter::ERROR,
        LogLevel::Warn => LevelFilter::WARN,
        LogLevel::Info => LevelFilter::INFO,
        LogLevel::Debug => LevelFilter::DEBUG,
        LogLevel::Trace => LevelFilter::TRACE,
    }
}

/// 根据 -v 次数确定全局级别，0 表示沿用配置
pub fn verbosity_level(count: u8) -> Option<LevelFilter> {
    match count {
        0 => None,
        1 => Some(LevelFilter::INFO),
        2 => Some(LevelFilter::DEBUG),
        _ => Some(LevelFilter::TRACE),
    }
}
