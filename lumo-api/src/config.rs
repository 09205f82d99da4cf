//! 执行配置
//!
//! `RunConfig` 由配置文件构建；CLI 启动时把它放进进程级单例。

use lumo_config::{CompilerConfig, LimitConfig, LumoConfig};
use lumo_core::STACK_MAX;
use once_cell::sync::OnceCell;

use crate::error::LumoError;

/// 一次编译 + 执行所需的全部选项
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// `--dump-bytecode`: print the listing before running
    pub dump_bytecode: bool,
    pub compiler: CompilerConfig,
    /// Stack sizing for the VM
    pub limits: LimitConfig,
}

impl RunConfig {
    /// Whether compile output should carry a disassembly listing
    pub fn wants_disassembly(&self) -> bool {
        self.dump_bytecode || self.compiler.print_code
    }
}

impl From<&LumoConfig> for RunConfig {
    fn from(config: &LumoConfig) -> Self {
        Self {
            dump_bytecode: false,
            compiler: config.compiler.clone(),
            limits: config.limits.clone(),
        }
    }
}

/// 检查配置文件里的取值
///
/// 栈槽位数不能低于 `STACK_MAX`，否则合法程序也会溢出。
pub fn validate(config: &LumoConfig) -> Result<(), LumoError> {
    let size = config.limits.max_stack_size;
    if size < STACK_MAX {
        return Err(LumoError::Config(format!(
            "limits.max_stack_size must be at least {STACK_MAX}, got {size}"
        )));
    }
    Ok(())
}

// 进程级单例，只设置一次
static GLOBAL_CONFIG: OnceCell<RunConfig> = OnceCell::new();

/// Install the process-wide config
///
/// # Panics
/// When called a second time
pub fn init(config: RunConfig) {
    if GLOBAL_CONFIG.set(config).is_err() {
        panic!("Config already initialized");
    }
}

/// The process-wide config
///
/// # Panics
/// Before `init` has been called
pub fn config() -> &'static RunConfig {
    match GLOBAL_CONFIG.get() {
        Some(config) => config,
        None => panic!("Config not initialized"),
    }
}

/// Get global config, installing the default one if nothing was initialized
pub fn config_or_default() -> &'static RunConfig {
    GLOBAL_CONFIG.get_or_init(RunConfig::default)
}

/// Whether `init` (or `config_or_default`) has installed a config
pub fn is_initialized() -> bool {
    GLOBAL_CONFIG.get().is_some()
}
