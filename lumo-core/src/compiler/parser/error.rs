//! 编译错误

use std::fmt;

use thiserror::Error;

/// 错误位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorLocation {
    /// 出错 token 的词素
    At(String),
    /// 输入结尾
    End,
    /// 扫描器产生的错误，没有位置片段
    None,
}

/// 一条编译诊断
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: usize,
    pub location: ErrorLocation,
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error", self.line)?;
        match &self.location {
            ErrorLocation::At(lexeme) => write!(f, " at '{lexeme}'")?,
            ErrorLocation::End => f.write_str(" at end")?,
            ErrorLocation::None => {}
        }
        write!(f, ": {}", self.message)
    }
}

/// 编译失败，携带所有报告过的诊断
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render(.diagnostics))]
pub struct CompileError {
    pub diagnostics: Vec<Diagnostic>,
}

impl CompileError {
    /// 第一条诊断的行号
    pub fn line(&self) -> Option<usize> {
        self.diagnostics.first().map(|d| d.line)
    }
}

fn render(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .iter()
        .map(Diagnostic::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}
