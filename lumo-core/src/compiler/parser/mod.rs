pub mod error;
pub mod parser;
pub mod rules;

// 重新导出常用类型
pub use error::{CompileError, Diagnostic, ErrorLocation};
pub use parser::{compile, Parser};
pub use rules::{rule_for, Infix, ParseRule, Precedence, Prefix};
