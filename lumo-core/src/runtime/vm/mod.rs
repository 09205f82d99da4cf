//! 虚拟机
//!
//! 基于栈的字节码解释器。VM 对输出目标泛型，默认写标准输出，
//! 上层可以换成内存缓冲区来捕获结果。

mod error;
mod execution;
mod stack;

use std::io::{self, Stdout, Write};

use tracing::debug;

use crate::compiler::{compile, CompileError};
use crate::runtime::bytecode::Chunk;
use crate::runtime::value::Value;
use lumo_config::LimitConfig;

pub use error::RuntimeError;
pub use stack::{Stack, STACK_MAX};

/// 虚拟机配置
#[derive(Debug, Clone)]
pub struct VMConfig {
    /// 值栈槽位数，小于 `STACK_MAX` 时按 `STACK_MAX` 分配
    pub stack_size: usize,
}

impl Default for VMConfig {
    fn default() -> Self {
        Self {
            stack_size: STACK_MAX,
        }
    }
}

impl From<&LimitConfig> for VMConfig {
    fn from(limits: &LimitConfig) -> Self {
        Self {
            stack_size: limits.max_stack_size,
        }
    }
}

/// 源码解释执行结果
#[derive(Debug)]
pub enum InterpretResult {
    Ok(Value),
    CompileError(CompileError),
    RuntimeError(RuntimeError),
}

impl InterpretResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, InterpretResult::Ok(_))
    }
}

/// 虚拟机
pub struct VM<W: Write = Stdout> {
    /// 操作数栈
    stack: Stack,
    /// RETURN 的输出目标
    out: W,
}

impl VM<Stdout> {
    /// 创建输出到标准输出的虚拟机
    pub fn new() -> Self {
        Self::with_output(io::stdout())
    }
}

impl Default for VM<Stdout> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> VM<W> {
    pub fn with_output(out: W) -> Self {
        Self::with_config(VMConfig::default(), out)
    }

    pub fn with_config(config: VMConfig, out: W) -> Self {
        Self {
            stack: Stack::with_capacity(config.stack_size.max(STACK_MAX)),
            out,
        }
    }

    /// 执行字节码块，返回 RETURN 输出的值
    pub fn interpret(&mut self, chunk: &Chunk) -> Result<Value, RuntimeError> {
        debug!(
            target: "lumo::vm",
            code_len = chunk.code.len(),
            constants = chunk.constants.len(),
            "Interpreting chunk"
        );
        self.stack.reset();
        let result = execution::run(self, chunk);
        match &result {
            Ok(value) => debug!(target: "lumo::vm", result = %value, "Execution finished"),
            Err(e) => debug!(target: "lumo::vm", error = %e, "Execution failed"),
        }
        result
    }

    /// 编译并执行一段源码
    pub fn interpret_source(&mut self, source: &str) -> InterpretResult {
        let mut chunk = Chunk::new();
        if let Err(e) = compile(source, &mut chunk) {
            return InterpretResult::CompileError(e);
        }
        match self.interpret(&chunk) {
            Ok(value) => InterpretResult::Ok(value),
            Err(e) => InterpretResult::RuntimeError(e),
        }
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::bytecode::OpCode;

    fn run_chunk(chunk: &Chunk) -> (Result<Value, RuntimeError>, String) {
        let mut vm = VM::with_output(Vec::new());
        let result = vm.interpret(chunk);
        let out = String::from_utf8(vm.into_output()).unwrap();
        (result, out)
    }

    fn constant_chunk(values: &[f64], ops: &[OpCode]) -> Chunk {
        let mut chunk = Chunk::new();
        for v in values {
            let idx = chunk.add_constant(Value::Number(*v)).unwrap();
            chunk.write_op(OpCode::Constant, 1);
            chunk.write(idx, 1);
        }
        for op in ops {
            chunk.write_op(*op, 1);
        }
        chunk
    }

    #[test]
    fn test_arithmetic() {
        let chunk = constant_chunk(&[1.5, 3.0], &[OpCode::Add, OpCode::Negate, OpCode::Return]);
        let (result, out) = run_chunk(&chunk);
        assert_eq!(result.unwrap(), Value::Number(-4.5));
        assert_eq!(out, "-4.5\n");
    }

    #[test]
    fn test_operand_order() {
        let chunk = constant_chunk(&[10.0, 4.0], &[OpCode::Subtract, OpCode::Return]);
        assert_eq!(run_chunk(&chunk).1, "6\n");
        let chunk = constant_chunk(&[1.0, 4.0], &[OpCode::Divide, OpCode::Return]);
        assert_eq!(run_chunk(&chunk).1, "0.25\n");
        let chunk = constant_chunk(&[1.0, 4.0], &[OpCode::Less, OpCode::Return]);
        assert_eq!(run_chunk(&chunk).1, "true\n");
    }

    #[test]
    fn test_negate_type_error_resets_stack() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Nil, 1);
        chunk.write_op(OpCode::Negate, 2);
        chunk.write_op(OpCode::Return, 2);

        let mut vm = VM::with_output(Vec::new());
        let err = vm.interpret(&chunk).unwrap_err();
        assert_eq!(err.to_string(), "Operand must be a number.\n[line 2] in script");
        assert!(vm.stack().is_empty());
        assert!(vm.output().is_empty());
    }

    #[test]
    fn test_binary_type_error() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::True, 1);
        let idx = chunk.add_constant(Value::Number(1.0)).unwrap();
        chunk.write_op(OpCode::Constant, 1);
        chunk.write(idx, 1);
        chunk.write_op(OpCode::Add, 3);
        chunk.write_op(OpCode::Return, 3);

        let (result, out) = run_chunk(&chunk);
        let err = result.unwrap_err();
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().starts_with("Operands must be numbers."));
        assert!(out.is_empty());
    }

    #[test]
    fn test_custom_stack_size() {
        let vm = VM::with_config(VMConfig { stack_size: 512 }, Vec::new());
        assert_eq!(vm.stack().capacity(), 512);
        let limits = LimitConfig { max_stack_size: 1024 };
        assert_eq!(VMConfig::from(&limits).stack_size, 1024);
    }

    #[test]
    fn test_small_stack_size_is_raised_to_minimum() {
        let limits = LimitConfig { max_stack_size: 1 };
        let mut vm = VM::with_config(VMConfig::from(&limits), Vec::new());
        assert_eq!(vm.stack().capacity(), STACK_MAX);

        let mut chunk = Chunk::new();
        compile("1 + 2", &mut chunk).unwrap();
        assert_eq!(vm.interpret(&chunk).unwrap(), Value::Number(3.0));
    }

    #[test]
    #[should_panic(expected = "unknown opcode")]
    fn test_unknown_opcode_panics() {
        let mut chunk = Chunk::new();
        chunk.write(0xFF, 1);
        let _ = VM::with_output(Vec::new()).interpret(&chunk);
    }

    #[test]
    #[should_panic(expected = "ran past end of chunk")]
    fn test_missing_return_panics() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Nil, 1);
        let _ = VM::with_output(Vec::new()).interpret(&chunk);
    }

    #[test]
    fn test_interpret_source() {
        let mut vm = VM::with_output(Vec::new());
        assert!(vm.interpret_source("1 + 2").is_ok());
        assert!(matches!(
            vm.interpret_source("1 +"),
            InterpretResult::CompileError(_)
        ));
        assert!(matches!(
            vm.interpret_source("-nil"),
            InterpretResult::RuntimeError(_)
        ));
        assert_eq!(String::from_utf8(vm.into_output()).unwrap(), "3\n");
    }

    #[test]
    fn test_vm_is_reusable_after_error() {
        let mut vm = VM::with_output(Vec::new());
        let _ = vm.interpret_source("1 + nil");
        assert!(vm.interpret_source("2 * 3").is_ok());
        assert_eq!(String::from_utf8(vm.into_output()).unwrap(), "6\n");
    }
}
