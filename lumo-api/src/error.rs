//! API 错误类型
//!
//! 提供统一的错误类型和结构化错误报告。

use thiserror::Error;

pub use lumo_core::{AssemblyError, CompileError, RuntimeError};

/// Lumo 错误类型
#[derive(Error, Debug)]
pub enum LumoError {
    /// 编译错误（可能包含多条诊断）
    #[error("{0}")]
    Compile(#[from] CompileError),

    /// 运行时错误
    #[error("{0}")]
    Runtime(#[from] RuntimeError),

    /// 汇编文本错误
    #[error("Assembly error: {0}")]
    Assembly(#[from] AssemblyError),

    /// 读取源文件失败
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件取值不合法
    #[error("Config error: {0}")]
    Config(String),
}

impl LumoError {
    /// 获取错误行号（如果有）
    ///
    /// 源码错误是 1-based；汇编文本与汇编产生的运行时错误沿用汇编行号（0-based）。
    pub fn line(&self) -> Option<usize> {
        match self {
            LumoError::Compile(e) => e.line(),
            LumoError::Runtime(e) => e.line(),
            LumoError::Assembly(e) => Some(e.line()),
            LumoError::Io(_) | LumoError::Config(_) => None,
        }
    }

    /// 获取错误阶段名称
    pub fn phase(&self) -> &'static str {
        match self {
            LumoError::Compile(_) => "compiler",
            LumoError::Runtime(_) => "runtime",
            LumoError::Assembly(_) => "assembly",
            LumoError::Io(_) => "io",
            LumoError::Config(_) => "config",
        }
    }

    /// 转换为结构化错误报告
    ///
    /// 适用于需要结构化数据的场景，CLI 可以直接打印。
    pub fn to_report(&self) -> ErrorReport {
        let error_kind = match self {
            LumoError::Compile(_) => "CompileError".to_string(),
            LumoError::Runtime(RuntimeError::Type { .. }) => "TypeError".to_string(),
            LumoError::Runtime(RuntimeError::Output(_)) => "OutputError".to_string(),
            LumoError::Assembly(e) => assembly_kind(e).to_string(),
            LumoError::Io(e) => format!("{:?}", e.kind()),
            LumoError::Config(_) => "ConfigError".to_string(),
        };
        let message = match self {
            LumoError::Runtime(RuntimeError::Type { message, .. }) => message.clone(),
            other => other.to_string(),
        };
        ErrorReport {
            phase: self.phase(),
            line: self.line(),
            error_kind,
            message,
        }
    }
}

fn assembly_kind(e: &AssemblyError) -> &'static str {
    match e {
        AssemblyError::WrongOperandCount { .. } => "WrongOperandCount",
        AssemblyError::InvalidOperand { .. } => "InvalidOperand",
        AssemblyError::InvalidData { .. } => "InvalidData",
        AssemblyError::UnknownInstruction { .. } => "UnknownInstruction",
        AssemblyError::TooManyConstants { .. } => "TooManyConstants",
        AssemblyError::ConstantOutOfRange { .. } => "ConstantOutOfRange",
        AssemblyError::StackUnderflow { .. } => "StackUnderflow",
        AssemblyError::StackTooDeep { .. } => "StackTooDeep",
        AssemblyError::MissingReturn { .. } => "MissingReturn",
    }
}

/// 结构化错误报告
///
/// 上层应用可以根据自己的需求格式化。
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorReport {
    /// 错误阶段: compiler, runtime, assembly, io, config
    pub phase: &'static str,
    /// 错误行号（如果有）
    pub line: Option<usize>,
    /// 错误类型（可用于程序化处理）
    pub error_kind: String,
    /// 人类可读的错误消息
    pub message: String,
}

impl std::fmt::Display for ErrorReport {
    /// 默认的 CLI 友好格式
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "[line {}] {} error: {}", line, self.phase, self.message),
            None => write!(f, "[{}] {} error: {}", self.phase, self.phase, self.message),
        }
    }
}
