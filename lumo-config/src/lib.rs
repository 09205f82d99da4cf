//! Lumo Config - Pure configuration data structures
//!
//! This crate contains only data structures, no logic or global state.
//! It serves as the shared configuration vocabulary across all Lumo crates,
//! and every structure can be deserialized from a JSON config file.

use serde::Deserialize;

/// Top-level configuration, as read from a `lumo.json` file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LumoConfig {
    pub compiler: CompilerConfig,
    pub limits: LimitConfig,
    pub logging: LoggingConfig,
}

/// Configuration for compiler behavior
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Disassemble the chunk after every successful compile
    pub print_code: bool,
}

/// Configuration for execution limits
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LimitConfig {
    /// Maximum number of value stack slots in the VM
    pub max_stack_size: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            max_stack_size: 256,
        }
    }
}

/// Log verbosity, ordered from quietest to noisiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Colored multi-line output (development)
    Pretty,
    /// One line per event
    #[default]
    Compact,
    /// JSON lines (tool integration)
    Json,
}

/// Logging configuration with optional per-phase overrides
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub lexer: Option<LogLevel>,
    pub compiler: Option<LogLevel>,
    pub vm: Option<LogLevel>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::default(),
            lexer: None,
            compiler: None,
            vm: None,
        }
    }
}

impl LoggingConfig {
    /// Effective level for a phase (falls back to the global level)
    pub fn level_for(&self, phase: Phase) -> LogLevel {
        let specific = match phase {
            Phase::Lexer => self.lexer,
            Phase::Compiler => self.compiler,
            Phase::Vm => self.vm,
            Phase::Api | Phase::Cli => None,
        };
        specific.unwrap_or(self.level)
    }
}

/// Execution phase enum for phase-specific configuration
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Lexer,
    Compiler,
    Vm,
    Api,
    Cli,
}

impl Phase {
    pub const ALL: [Phase; 5] = [Phase::Lexer, Phase::Compiler, Phase::Vm, Phase::Api, Phase::Cli];

    /// Get the string name of the phase
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Lexer => "lexer",
            Phase::Compiler => "compiler",
            Phase::Vm => "vm",
            Phase::Api => "api",
            Phase::Cli => "cli",
        }
    }

    /// Get the log target name for this phase
    pub fn target(&self) -> String {
        format!("lumo::{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limit_config() {
        let cfg = LimitConfig::default();
        assert_eq!(cfg.max_stack_size, 256);
    }

    #[test]
    fn test_default_compiler_config() {
        let cfg = CompilerConfig::default();
        assert!(!cfg.print_code);
    }

    #[test]
    fn test_phase_as_str() {
        assert_eq!(Phase::Lexer.as_str(), "lexer");
        assert_eq!(Phase::Vm.target(), "lumo::vm");
    }

    #[test]
    fn test_level_for_falls_back_to_global() {
        let cfg = LoggingConfig {
            level: LogLevel::Info,
            vm: Some(LogLevel::Trace),
            ..Default::default()
        };
        assert_eq!(cfg.level_for(Phase::Vm), LogLevel::Trace);
        assert_eq!(cfg.level_for(Phase::Compiler), LogLevel::Info);
    }

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Off < LogLevel::Error);
        assert!(LogLevel::Debug < LogLevel::Trace);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let json = r#"{
            "compiler": { "print_code": true },
            "logging": { "level": "debug", "format": "json", "lexer": "trace" }
        }"#;
        let cfg: LumoConfig = serde_json::from_str(json).unwrap();
        assert!(cfg.compiler.print_code);
        assert_eq!(cfg.limits.max_stack_size, 256);
        assert_eq!(cfg.logging.level, LogLevel::Debug);
        assert_eq!(cfg.logging.format, LogFormat::Json);
        assert_eq!(cfg.logging.level_for(Phase::Lexer), LogLevel::Trace);
    }

    #[test]
    fn test_deserialize_empty_object_uses_defaults() {
        let cfg: LumoConfig = serde_json::from_str("{}").unwrap();
        assert!(!cfg.compiler.print_code);
        assert_eq!(cfg.logging.level, LogLevel::Warn);
        assert_eq!(cfg.logging.format, LogFormat::Compact);
    }
}
