//! API 类型定义
//!
//! 编译和执行的输入输出类型。

use lumo_core::{Chunk, Value};

/// 编译输出
#[derive(Debug)]
pub struct CompileOutput {
    /// 字节码块
    pub chunk: Chunk,
    /// 反汇编文本（配置要求时生成）
    pub disassembly: Option<String>,
}

/// 执行输出
#[derive(Debug)]
pub struct ExecuteOutput {
    /// 返回值
    pub value: Value,
    /// 标准输出捕获
    pub stdout: String,
}
