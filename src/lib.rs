//! Lumo - A small bytecode expression engine
//!
//! Source text is scanned, compiled in a single pass into a chunk of bytecode,
//! and executed by a stack-based virtual machine.
//!
//! # Architecture
//!
//! ```text
//! lumo-config/  - Configuration data structures
//! lumo-core/    - Scanner, compiler, value model, chunk, VM (no IO)
//! lumo-api/     - Execution orchestration and unified errors
//! lumo-cli/     - The `lumo` binary
//! ```
//!
//! # Quick Start
//!
//! ```
//! use lumo::{run, RunConfig};
//!
//! let output = run("(-1 + 2) * 3 - -4", &RunConfig::default()).unwrap();
//! assert_eq!(output.stdout, "7\n");
//! ```

pub use lumo_api::*;
