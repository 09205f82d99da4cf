//! Lumo 词法分析器
//!
//! 源码 → token 序列。扫描器是按需拉取的迭代器，编译器每次只取一个 token。

pub mod scanner;
pub mod token_kind;

use std::fmt::Write as _;

pub use scanner::{Scanner, Token};
pub use token_kind::TokenKind;

/// 把 token 流渲染成可读文本，每行一个 token
///
/// 格式：`{line:4} {kind:<20} '{lexeme}'`，与上一个 token 同行时行号替换为 `   | `。
pub fn dump_tokens(source: &str) -> String {
    let mut out = String::new();
    let mut last_line = None;

    for token in Scanner::new(source) {
        if last_line == Some(token.line) {
            out.push_str("   | ");
        } else {
            let _ = write!(out, "{:4} ", token.line);
            last_line = Some(token.line);
        }
        let _ = writeln!(out, "{:<20} '{}'", token.kind, token.lexeme);
    }

    out
}
