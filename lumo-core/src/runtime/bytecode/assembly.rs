//! 字节码汇编文本加载器
//!
//! 按行解析的文本格式：
//!
//! ```text
//! .data
//! 1.2
//! 3.4
//! .text
//! constant 0
//! constant 1
//! add
//! return
//! ```
//!
//! `.data` 段每行一个浮点数，依次成为常量 0, 1, 2, ...；`.text` 段每行一条指令。
//! 空行跳过，未知段里的内容忽略。指令的行号是汇编文本的行号（从 0 开始）。
//!
//! 指令集没有跳转，加载时顺序模拟一遍栈深度：不会下溢、不超过 `STACK_MAX`、
//! 以 `return` 结尾。通过检查的程序在虚拟机上不会触发栈的 panic。

use thiserror::Error;
use tracing::debug;

use super::chunk::Chunk;
use super::opcode::OpCode;
use crate::runtime::value::Value;
use crate::runtime::vm::STACK_MAX;

/// 汇编解析错误，`line` 从 0 开始
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssemblyError {
    #[error(
        "line {line}: wrong number of arguments for {mnemonic} instruction, expected {expected}, got {got}"
    )]
    WrongOperandCount {
        line: usize,
        mnemonic: String,
        expected: usize,
        got: usize,
    },

    #[error("line {line}: invalid operand '{operand}' for {mnemonic} instruction")]
    InvalidOperand {
        line: usize,
        mnemonic: String,
        operand: String,
    },

    #[error("line {line}: invalid data literal '{literal}'")]
    InvalidData { line: usize, literal: String },

    #[error("line {line}: unknown instruction {instruction}")]
    UnknownInstruction { line: usize, instruction: String },

    #[error("line {line}: too many constants (at most 256)")]
    TooManyConstants { line: usize },

    #[error("line {line}: constant index {index} out of range ({count} constants)")]
    ConstantOutOfRange { line: usize, index: u8, count: usize },

    #[error("line {line}: {mnemonic} needs {needed} values on the stack, found {depth}")]
    StackUnderflow {
        line: usize,
        mnemonic: String,
        needed: usize,
        depth: usize,
    },

    #[error("line {line}: stack depth exceeds {limit} slots")]
    StackTooDeep { line: usize, limit: usize },

    #[error("line {line}: program must end with return")]
    MissingReturn { line: usize },
}

impl AssemblyError {
    pub fn line(&self) -> usize {
        match self {
            AssemblyError::WrongOperandCount { line, .. }
            | AssemblyError::InvalidOperand { line, .. }
            | AssemblyError::InvalidData { line, .. }
            | AssemblyError::UnknownInstruction { line, .. }
            | AssemblyError::TooManyConstants { line }
            | AssemblyError::ConstantOutOfRange { line, .. }
            | AssemblyError::StackUnderflow { line, .. }
            | AssemblyError::StackTooDeep { line, .. }
            | AssemblyError::MissingReturn { line } => *line,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Data,
    Text,
    Unknown,
}

impl Chunk {
    /// 从汇编文本构建字节码块
    pub fn from_assembly(source: &str) -> Result<Chunk, AssemblyError> {
        let mut chunk = Chunk::new();
        let mut section = Section::None;
        let mut last_line = 0;
        // (指令所在行, 常量索引)，全部读完后再校验
        let mut constant_refs = Vec::new();

        for (line_no, raw) in source.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            last_line = line_no;

            if let Some(name) = line.strip_prefix('.') {
                section = match name {
                    "data" => Section::Data,
                    "text" => Section::Text,
                    _ => Section::Unknown,
                };
                continue;
            }

            match section {
                Section::Data => {
                    let number: f64 = line.parse().map_err(|_| AssemblyError::InvalidData {
                        line: line_no,
                        literal: line.to_string(),
                    })?;
                    chunk
                        .add_constant(Value::Number(number))
                        .map_err(|_| AssemblyError::TooManyConstants { line: line_no })?;
                }
                Section::Text => {
                    if let Some(index) = assemble_instruction(&mut chunk, line, line_no)? {
                        constant_refs.push((line_no, index));
                    }
                }
                Section::None | Section::Unknown => {}
            }
        }

        for (line, index) in constant_refs {
            if index as usize >= chunk.constants.len() {
                return Err(AssemblyError::ConstantOutOfRange {
                    line,
                    index,
                    count: chunk.constants.len(),
                });
            }
        }

        check_stack(&chunk, last_line)?;

        debug!(
            target: "lumo::compiler",
            code_len = chunk.code.len(),
            constants = chunk.constants.len(),
            "Assembled chunk"
        );
        Ok(chunk)
    }
}

/// 顺序模拟栈深度
///
/// `last_line` 是文本最后一个非空行，用于报告缺少 `return`。
fn check_stack(chunk: &Chunk, last_line: usize) -> Result<(), AssemblyError> {
    let mut depth = 0usize;
    let mut last_op = None;
    let mut offset = 0;

    while offset < chunk.code.len() {
        let line = chunk.lines[offset];
        let op = OpCode::try_from(chunk.code[offset])
            .unwrap_or_else(|byte| panic!("assembler wrote unknown opcode {byte}"));
        let (pops, pushes) = op.stack_effect();

        if depth < pops {
            return Err(AssemblyError::StackUnderflow {
                line,
                mnemonic: op.mnemonic().to_string(),
                needed: pops,
                depth,
            });
        }
        depth = depth - pops + pushes;
        if depth > STACK_MAX {
            return Err(AssemblyError::StackTooDeep {
                line,
                limit: STACK_MAX,
            });
        }

        last_op = Some(op);
        offset += 1 + op.operand_size();
    }

    match last_op {
        Some(OpCode::Return) => Ok(()),
        _ => Err(AssemblyError::MissingReturn { line: last_line }),
    }
}

/// 汇编一行指令，返回 `constant` 指令引用的常量索引
fn assemble_instruction(
    chunk: &mut Chunk,
    line: &str,
    line_no: usize,
) -> Result<Option<u8>, AssemblyError> {
    let mut parts = line.split_whitespace();
    let mnemonic = parts.next().unwrap_or_default();
    let operands: Vec<&str> = parts.collect();

    let op = OpCode::from_mnemonic(mnemonic).ok_or_else(|| AssemblyError::UnknownInstruction {
        line: line_no,
        instruction: line.to_string(),
    })?;

    if operands.len() != op.operand_size() {
        return Err(AssemblyError::WrongOperandCount {
            line: line_no,
            mnemonic: mnemonic.to_string(),
            expected: op.operand_size(),
            got: operands.len(),
        });
    }

    chunk.write_op(op, line_no);

    match operands.first() {
        Some(operand) => {
            let index: u8 = operand.parse().map_err(|_| AssemblyError::InvalidOperand {
                line: line_no,
                mnemonic: mnemonic.to_string(),
                operand: operand.to_string(),
            })?;
            chunk.write(index, line_no);
            Ok(Some(index))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROGRAM: &str = "\
.data
1.2
3.4
5.6

.text
constant 0
constant 1
add
constant 2
divide
negate
return
";

    #[test]
    fn test_assemble_program() {
        let chunk = Chunk::from_assembly(PROGRAM).unwrap();
        assert_eq!(chunk.constants.len(), 3);
        assert_eq!(
            chunk.code,
            vec![
                OpCode::Constant as u8,
                0,
                OpCode::Constant as u8,
                1,
                OpCode::Add as u8,
                OpCode::Constant as u8,
                2,
                OpCode::Divide as u8,
                OpCode::Negate as u8,
                OpCode::Return as u8,
            ]
        );
        // 0 起始的行号，操作数与操作码同行
        assert_eq!(chunk.lines, vec![6, 6, 7, 7, 8, 9, 9, 10, 11, 12]);
    }

    #[test]
    fn test_every_mnemonic_is_accepted() {
        let text = "\
.data
1
.text
constant 0
constant 0
constant 0
constant 0
constant 0
nil
true
false
equal
greater
less
add
subtract
multiply
divide
not
negate
return
";
        let chunk = Chunk::from_assembly(text).unwrap();
        for op in OpCode::ALL {
            assert!(chunk.code.contains(&(op as u8)), "{}", op.mnemonic());
        }
    }

    #[test]
    fn test_lines_outside_sections_are_ignored() {
        let chunk = Chunk::from_assembly("garbage\n.meta\nmore garbage\n.text\nnil\nreturn").unwrap();
        assert_eq!(chunk.code, vec![OpCode::Nil as u8, OpCode::Return as u8]);
    }

    #[test]
    fn test_wrong_operand_count() {
        let err = Chunk::from_assembly(".data\n1\n.text\nconstant\n").unwrap_err();
        assert_eq!(
            err,
            AssemblyError::WrongOperandCount {
                line: 3,
                mnemonic: "constant".to_string(),
                expected: 1,
                got: 0,
            }
        );
        assert_eq!(
            err.to_string(),
            "line 3: wrong number of arguments for constant instruction, expected 1, got 0"
        );

        let err = Chunk::from_assembly(".text\nadd 1\n").unwrap_err();
        assert!(matches!(err, AssemblyError::WrongOperandCount { got: 1, .. }));
    }

    #[test]
    fn test_invalid_operand() {
        let err = Chunk::from_assembly(".text\nconstant 256\n").unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidOperand { line: 1, .. }));
        let err = Chunk::from_assembly(".text\nconstant x\n").unwrap_err();
        assert!(matches!(err, AssemblyError::InvalidOperand { .. }));
    }

    #[test]
    fn test_invalid_data() {
        let err = Chunk::from_assembly(".data\nabc\n").unwrap_err();
        assert_eq!(
            err,
            AssemblyError::InvalidData {
                line: 1,
                literal: "abc".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_instruction() {
        let err = Chunk::from_assembly(".text\njump 3\n").unwrap_err();
        assert_eq!(err.to_string(), "line 1: unknown instruction jump 3");
        assert_eq!(err.line(), 1);
    }

    #[test]
    fn test_constant_out_of_range() {
        let err = Chunk::from_assembly(".data\n1\n.text\nconstant 1\nreturn\n").unwrap_err();
        assert_eq!(
            err,
            AssemblyError::ConstantOutOfRange {
                line: 3,
                index: 1,
                count: 1
            }
        );
    }

    #[test]
    fn test_data_may_follow_text() {
        let chunk = Chunk::from_assembly(".text\nconstant 0\nreturn\n.data\n42\n").unwrap();
        assert_eq!(chunk.constants.len(), 1);
    }

    #[test]
    fn test_stack_underflow() {
        let err = Chunk::from_assembly(".text\nadd\nreturn\n").unwrap_err();
        assert_eq!(
            err,
            AssemblyError::StackUnderflow {
                line: 1,
                mnemonic: "add".to_string(),
                needed: 2,
                depth: 0,
            }
        );
        assert_eq!(err.to_string(), "line 1: add needs 2 values on the stack, found 0");

        let err = Chunk::from_assembly(".text\nnil\nadd\nreturn\n").unwrap_err();
        assert!(matches!(err, AssemblyError::StackUnderflow { line: 2, depth: 1, .. }));

        let err = Chunk::from_assembly(".text\nreturn\n").unwrap_err();
        assert!(matches!(err, AssemblyError::StackUnderflow { line: 1, .. }));
    }

    #[test]
    fn test_stack_too_deep() {
        let mut text = String::from(".text\n");
        for _ in 0..=STACK_MAX {
            text.push_str("nil\n");
        }
        text.push_str("return\n");
        let err = Chunk::from_assembly(&text).unwrap_err();
        assert_eq!(
            err,
            AssemblyError::StackTooDeep {
                line: STACK_MAX + 1,
                limit: STACK_MAX
            }
        );

        // 恰好 STACK_MAX 个值可以
        let mut text = String::from(".text\n");
        for _ in 0..STACK_MAX {
            text.push_str("nil\n");
        }
        text.push_str("return\n");
        assert!(Chunk::from_assembly(&text).is_ok());
    }

    #[test]
    fn test_missing_return() {
        let err = Chunk::from_assembly(".text\nnil\n").unwrap_err();
        assert_eq!(err, AssemblyError::MissingReturn { line: 1 });

        let err = Chunk::from_assembly(".text\nnil\nreturn\nnil\n\n").unwrap_err();
        assert_eq!(err, AssemblyError::MissingReturn { line: 3 });

        let err = Chunk::from_assembly("").unwrap_err();
        assert_eq!(err, AssemblyError::MissingReturn { line: 0 });
    }
}
