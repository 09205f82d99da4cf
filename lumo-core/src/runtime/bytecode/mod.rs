//! 字节码：操作码、字节码块、汇编文本加载

pub mod assembly;
pub mod chunk;
pub mod opcode;

pub use assembly::AssemblyError;
pub use chunk::{Chunk, ChunkError, MAX_CONSTANTS};
pub use opcode::OpCode;
