//! Lumo API - Execution orchestration layer
//!
//! Provides unified execution interface, including:
//! - Execution flow orchestration
//! - Configuration abstraction (RunConfig)
//! - Unified error handling (LumoError)
//!
//! For CLI convenience, this crate provides a global singleton API.
//! For library use, prefer the explicit `run(source, &config)` API.

use tracing::{debug, info};

use lumo_core::{Chunk, VMConfig, VM};

// Re-export config
pub mod config;
pub use config::{
    config as get_config, config_or_default, init as init_config, is_initialized,
    validate as validate_config, RunConfig,
};

// Re-export config types from lumo_config
pub use lumo_config::{
    CompilerConfig, LimitConfig, LogFormat, LogLevel, LoggingConfig, LumoConfig, Phase,
};

// Re-export error and types
pub mod error;
pub mod types;
pub use error::{ErrorReport, LumoError};
pub use types::{CompileOutput, ExecuteOutput};

// Re-export core types
pub use lumo_config;
pub use lumo_core::{dump_tokens, Value};

/// Execute with explicit configuration
///
/// This is the recommended API for library users.
pub fn run(source: &str, config: &RunConfig) -> Result<ExecuteOutput, LumoError> {
    info!(target: "lumo::api", "Starting execution");

    let compiled = compile_with_config(source, config)?;
    let result = execute_with_config(&compiled.chunk, config)?;

    info!(target: "lumo::api", "Execution completed");
    Ok(result)
}

/// Compile with explicit configuration
pub fn compile_with_config(source: &str, config: &RunConfig) -> Result<CompileOutput, LumoError> {
    info!(target: "lumo::api", "Starting compiler");

    let mut chunk = Chunk::new();
    lumo_core::compile(source, &mut chunk)?;

    debug!(
        target: "lumo::api",
        "compilation completed: constants={}, code_bytes={}",
        chunk.constants.len(),
        chunk.code.len(),
    );

    Ok(with_disassembly(chunk, config))
}

/// Load a chunk from the textual assembly format
pub fn assemble_with_config(text: &str, config: &RunConfig) -> Result<CompileOutput, LumoError> {
    info!(target: "lumo::api", "Loading assembly");

    let chunk = Chunk::from_assembly(text)?;
    Ok(with_disassembly(chunk, config))
}

fn with_disassembly(chunk: Chunk, config: &RunConfig) -> CompileOutput {
    let disassembly = config
        .wants_disassembly()
        .then(|| chunk.disassemble("code"));
    CompileOutput { chunk, disassembly }
}

/// Execute a chunk with explicit configuration, capturing what it prints
pub fn execute_with_config(chunk: &Chunk, config: &RunConfig) -> Result<ExecuteOutput, LumoError> {
    let mut vm = VM::with_config(VMConfig::from(&config.limits), Vec::new());
    let value = vm.interpret(chunk)?;
    let stdout = String::from_utf8_lossy(&vm.into_output()).into_owned();

    debug!(target: "lumo::api", result = %value, "VM finished");
    Ok(ExecuteOutput { value, stdout })
}

/// Load and execute an assembly program with explicit configuration
pub fn run_assembly(text: &str, config: &RunConfig) -> Result<ExecuteOutput, LumoError> {
    let loaded = assemble_with_config(text, config)?;
    execute_with_config(&loaded.chunk, config)
}

// ==================== Legacy API (using global config) ====================

/// Compile source code (uses global config)
///
/// # Panics
/// If global config is not initialized
pub fn compile(source: &str) -> Result<CompileOutput, LumoError> {
    let config = get_config();
    compile_with_config(source, config)
}

/// Execute bytecode (uses global config)
///
/// # Panics
/// If global config is not initialized
pub fn execute(chunk: &Chunk) -> Result<ExecuteOutput, LumoError> {
    let config = get_config();
    execute_with_config(chunk, config)
}

/// Compile and run (uses global config)
///
/// # Panics
/// If global config is not initialized
pub fn compile_and_run(source: &str) -> Result<ExecuteOutput, LumoError> {
    let config = get_config();
    run(source, config)
}

/// Quick run with default config (auto-initializes if needed)
pub fn quick_run(source: &str) -> Result<ExecuteOutput, LumoError> {
    run(source, config_or_default())
}
