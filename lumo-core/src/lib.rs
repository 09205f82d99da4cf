//! Lumo Core - scanner, compiler, bytecode and virtual machine
//!
//! Only operates on in-memory data structures. The single IO point is the
//! VM output sink, which callers choose (stdout or an in-memory buffer).
//!
//! Configuration is passed explicitly via parameters, not via global state.

pub mod compiler;
pub mod runtime;

use std::io::Write;

// Re-export common types
pub use compiler::lexer::{dump_tokens, Scanner, Token, TokenKind};
pub use compiler::{compile, CompileError, Diagnostic, ErrorLocation};
pub use runtime::bytecode::{AssemblyError, Chunk, ChunkError, OpCode};
pub use runtime::value::{Value, ValueError};
pub use runtime::vm::{InterpretResult, RuntimeError, VMConfig, STACK_MAX, VM};

// Re-export config types from lumo-config
pub use lumo_config::{CompilerConfig, LimitConfig, Phase};

/// Compile `source` into a fresh chunk and run it on `vm`
pub fn interpret<W: Write>(source: &str, vm: &mut VM<W>) -> InterpretResult {
    vm.interpret_source(source)
}
