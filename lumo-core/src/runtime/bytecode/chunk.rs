//! 字节码块
//!
//! 指令字节流 + 每字节对应的源码行号 + 常量池。

use std::fmt::Write as _;

use thiserror::Error;
use tracing::trace;

use super::opcode::OpCode;
use crate::runtime::value::Value;

/// 常量池容量（索引是 u8）
pub const MAX_CONSTANTS: usize = 256;

/// 字节码块错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChunkError {
    #[error("Too many constants in one chunk.")]
    TooManyConstants,
}

/// 字节码块
///
/// 不变式：`code.len() == lines.len()`。
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// 指令字节码
    pub code: Vec<u8>,
    /// 行号信息，与 code 一一对应
    pub lines: Vec<usize>,
    /// 常量池
    pub constants: Vec<Value>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一个字节（操作码或操作数）
    pub fn write(&mut self, byte: u8, line: usize) {
        self.code.push(byte);
        self.lines.push(line);
    }

    /// 写入操作码
    pub fn write_op(&mut self, op: OpCode, line: usize) {
        self.write(op as u8, line);
    }

    /// 添加常量，返回其索引
    pub fn add_constant(&mut self, value: Value) -> Result<u8, ChunkError> {
        if self.constants.len() >= MAX_CONSTANTS {
            return Err(ChunkError::TooManyConstants);
        }
        let index = self.constants.len() as u8;
        trace!(target: "lumo::compiler", index, value = %value, "Added constant");
        self.constants.push(value);
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// 反汇编整个字节码块
    pub fn disassemble(&self, name: &str) -> String {
        let mut out = format!("== {name} ==\n");
        let mut offset = 0;
        while offset < self.code.len() {
            let (line, next) = self.disassemble_instruction(offset);
            out.push_str(&line);
            out.push('\n');
            offset = next;
        }
        out
    }

    /// 反汇编单条指令，返回该行文本和下一条指令的偏移
    pub fn disassemble_instruction(&self, offset: usize) -> (String, usize) {
        let mut text = format!("{offset:04} ");
        if offset > 0 && self.lines.get(offset) == self.lines.get(offset - 1) {
            text.push_str("   | ");
        } else {
            let _ = write!(text, "{:4} ", self.lines.get(offset).copied().unwrap_or(0));
        }

        let byte = self.code[offset];
        match OpCode::try_from(byte) {
            Ok(OpCode::Constant) => {
                let Some(&index) = self.code.get(offset + 1) else {
                    let _ = write!(text, "{} <missing operand>", OpCode::Constant.name());
                    return (text, self.code.len());
                };
                let _ = write!(text, "{:<16} {:4} '", OpCode::Constant.name(), index);
                match self.constants.get(index as usize) {
                    Some(value) => {
                        let _ = write!(text, "{value}'");
                    }
                    None => text.push_str("<invalid>'"),
                }
                (text, offset + 2)
            }
            Ok(op) => {
                text.push_str(op.name());
                (text, offset + 1)
            }
            Err(unknown) => {
                let _ = write!(text, "Unknown opcode {unknown}");
                (text, offset + 1)
            }
        }
    }
}
