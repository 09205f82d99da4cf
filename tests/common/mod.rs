//! 集成测试共享工具

#![allow(dead_code)]

use lumo::{run, run_assembly, LumoError, RunConfig};

/// 用默认配置运行源码，返回程序输出
pub fn output_of(source: &str) -> Result<String, LumoError> {
    run(source, &RunConfig::default()).map(|out| out.stdout)
}

/// 用默认配置运行汇编文本，返回程序输出
pub fn assembly_output_of(text: &str) -> Result<String, LumoError> {
    run_assembly(text, &RunConfig::default()).map(|out| out.stdout)
}

/// 运行并期望失败，返回错误
pub fn expect_error(source: &str) -> LumoError {
    match run(source, &RunConfig::default()) {
        Ok(out) => panic!("expected error for {source:?}, got output {:?}", out.stdout),
        Err(e) => e,
    }
}
