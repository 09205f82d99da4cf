//! run() 主执行循环

use std::io::Write;

use tracing::debug;

use super::error::RuntimeError;
use super::VM;
use crate::runtime::bytecode::{Chunk, OpCode};
use crate::runtime::value::Value;

/// 执行字节码直到 RETURN 或运行时错误
pub(super) fn run<W: Write>(vm: &mut VM<W>, chunk: &Chunk) -> Result<Value, RuntimeError> {
    let mut ip = 0;

    loop {
        // 调试: 打印当前栈状态和指令
        #[cfg(feature = "trace_execution")]
        trace_instruction(vm, chunk, ip);

        let instruction = read_byte(chunk, &mut ip);
        let op = match OpCode::try_from(instruction) {
            Ok(op) => op,
            Err(byte) => panic!("unknown opcode {byte} at offset {}", ip - 1),
        };

        match op {
            OpCode::Constant => {
                let index = read_byte(chunk, &mut ip) as usize;
                let Some(value) = chunk.constants.get(index) else {
                    panic!("constant index {index} out of range at offset {}", ip - 2);
                };
                vm.stack.push(value.clone());
            }
            OpCode::Nil => vm.stack.push(Value::Nil),
            OpCode::True => vm.stack.push(Value::Bool(true)),
            OpCode::False => vm.stack.push(Value::Bool(false)),

            OpCode::Equal => {
                let b = vm.stack.pop();
                let a = vm.stack.pop();
                vm.stack.push(Value::Bool(a.equal(&b)));
            }

            // ===== 比较 / 算术：只接受数字 =====
            OpCode::Greater => {
                let (a, b) = number_operands(vm, chunk, ip)?;
                vm.stack.push(Value::Bool(a > b));
            }
            OpCode::Less => {
                let (a, b) = number_operands(vm, chunk, ip)?;
                vm.stack.push(Value::Bool(a < b));
            }
            OpCode::Add => {
                let (a, b) = number_operands(vm, chunk, ip)?;
                vm.stack.push(Value::Number(a + b));
            }
            OpCode::Subtract => {
                let (a, b) = number_operands(vm, chunk, ip)?;
                vm.stack.push(Value::Number(a - b));
            }
            OpCode::Multiply => {
                let (a, b) = number_operands(vm, chunk, ip)?;
                vm.stack.push(Value::Number(a * b));
            }
            OpCode::Divide => {
                let (a, b) = number_operands(vm, chunk, ip)?;
                vm.stack.push(Value::Number(a / b));
            }

            OpCode::Not => {
                let value = vm.stack.pop();
                vm.stack.push(Value::Bool(value.is_falsey()));
            }
            OpCode::Negate => {
                let Value::Number(n) = *vm.stack.peek(0) else {
                    return Err(runtime_error(vm, chunk, ip, "Operand must be a number."));
                };
                vm.stack.pop();
                vm.stack.push(Value::Number(-n));
            }

            OpCode::Return => {
                let value = vm.stack.pop();
                value.write_to(&mut vm.out)?;
                writeln!(vm.out)?;
                vm.out.flush()?;
                return Ok(value);
            }
        }
    }
}

/// 读取 ip 处的字节并前进；越过代码末尾是致命错误
#[inline]
fn read_byte(chunk: &Chunk, ip: &mut usize) -> u8 {
    let Some(&byte) = chunk.code.get(*ip) else {
        panic!("instruction pointer {} ran past end of chunk", *ip);
    };
    *ip += 1;
    byte
}

/// 检查栈顶两个值都是数字后出栈，返回 (a, b)
fn number_operands<W: Write>(
    vm: &mut VM<W>,
    chunk: &Chunk,
    ip: usize,
) -> Result<(f64, f64), RuntimeError> {
    let (Value::Number(a), Value::Number(b)) = (vm.stack.peek(1), vm.stack.peek(0)) else {
        return Err(runtime_error(vm, chunk, ip, "Operands must be numbers."));
    };
    let (a, b) = (*a, *b);
    vm.stack.pop();
    vm.stack.pop();
    Ok((a, b))
}

/// 构造运行时错误并清空栈
///
/// 行号取正在执行的指令，即 `ip - 1` 处的操作码。
fn runtime_error<W: Write>(vm: &mut VM<W>, chunk: &Chunk, ip: usize, message: &str) -> RuntimeError {
    let line = chunk.lines.get(ip.saturating_sub(1)).copied().unwrap_or(0);
    debug!(target: "lumo::vm", line, message, "Runtime error");
    vm.stack.reset();
    RuntimeError::Type {
        message: message.to_string(),
        line,
    }
}

#[cfg(feature = "trace_execution")]
fn trace_instruction<W: Write>(vm: &VM<W>, chunk: &Chunk, ip: usize) {
    use std::fmt::Write as _;

    let mut slots = String::from("          ");
    for value in vm.stack.iter() {
        let _ = write!(slots, "[ {value} ]");
    }
    let (instruction, _) = chunk.disassemble_instruction(ip);
    tracing::trace!(target: "lumo::vm", "{slots}\n{instruction}");
}
