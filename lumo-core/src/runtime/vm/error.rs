//! 运行时错误

use std::io;

use thiserror::Error;

/// 运行时错误
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// 操作数类型不符合指令要求
    #[error("{message}\n[line {line}] in script")]
    Type { message: String, line: usize },

    /// 向输出写结果失败
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl RuntimeError {
    /// 出错指令对应的源码行
    pub fn line(&self) -> Option<usize> {
        match self {
            RuntimeError::Type { line, .. } => Some(*line),
            RuntimeError::Output(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_error_display() {
        let err = RuntimeError::Type {
            message: "Operand must be a number.".to_string(),
            line: 4,
        };
        assert_eq!(err.to_string(), "Operand must be a number.\n[line 4] in script");
        assert_eq!(err.line(), Some(4));
    }

    #[test]
    fn test_output_error_from_io() {
        let err: RuntimeError = io::Error::new(io::ErrorKind::BrokenPipe, "closed").into();
        assert!(err.to_string().starts_with("failed to write output"));
        assert_eq!(err.line(), None);
    }
}
