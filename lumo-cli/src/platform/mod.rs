//! 平台相关的终端输出

pub mod cli;

pub use cli::{format_source_context, print_error_with_source};
