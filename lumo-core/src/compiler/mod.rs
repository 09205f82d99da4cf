//! 编译器：源码 → 字节码
//!
//! 单遍编译，没有 AST：Pratt 解析器在识别表达式的同时直接向 Chunk 写指令。

pub mod lexer;
pub mod parser;

pub use parser::{compile, CompileError, Diagnostic, ErrorLocation};
