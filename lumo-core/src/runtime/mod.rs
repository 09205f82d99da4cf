//! Lumo 运行时
//!
//! 值模型、字节码容器、汇编加载器和虚拟机。

pub mod bytecode;
pub mod object;
pub mod value;
pub mod vm;

pub use bytecode::{AssemblyError, Chunk, ChunkError, OpCode};
pub use object::{Obj, ObjString};
pub use value::{format_number, Value, ValueError};
pub use vm::{InterpretResult, RuntimeError, Stack, VMConfig, STACK_MAX, VM};
