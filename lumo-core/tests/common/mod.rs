//! 测试辅助工具
//!
//! 提供端到端测试的辅助函数

#![allow(dead_code)]

use lumo_core::{compile, Chunk, CompileError, Value, VM};

/// 编译并执行 Lumo 代码，捕获 RETURN 打印的内容
///
/// # Example
/// ```
/// let result = run_code("1 + 2").unwrap();
/// assert_eq!(result.output, "3\n");
/// ```
pub fn run_code(code: &str) -> Result<ExecResult, ExecError> {
    let mut chunk = Chunk::new();
    compile(code, &mut chunk).map_err(ExecError::Compiler)?;
    run_chunk(&chunk)
}

/// 执行一个现成的字节码块
pub fn run_chunk(chunk: &Chunk) -> Result<ExecResult, ExecError> {
    let mut vm = VM::with_output(Vec::new());
    let return_value = vm
        .interpret(chunk)
        .map_err(|e| ExecError::Runtime(e.to_string()))?;
    let output = String::from_utf8_lossy(&vm.into_output()).into_owned();
    Ok(ExecResult {
        return_value,
        output,
    })
}

/// 执行并只取输出文本（去掉结尾换行）
pub fn eval(code: &str) -> String {
    match run_code(code) {
        Ok(result) => result.output.trim_end_matches('\n').to_string(),
        Err(e) => panic!("{code:?} failed: {e}"),
    }
}

/// 执行结果
#[derive(Debug)]
pub struct ExecResult {
    /// 返回值
    pub return_value: Value,
    /// 标准输出
    pub output: String,
}

/// 执行错误
#[derive(Debug)]
pub enum ExecError {
    Compiler(CompileError),
    Runtime(String),
}

impl std::fmt::Display for ExecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecError::Compiler(e) => write!(f, "Compiler error: {}", e),
            ExecError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for ExecError {}

/// 获取数字值
pub fn get_number(result: &ExecResult) -> Option<f64> {
    result.return_value.as_number().ok()
}

/// 获取布尔值
pub fn get_bool(result: &ExecResult) -> Option<bool> {
    result.return_value.as_bool().ok()
}

/// 获取字符串值
pub fn get_string(result: &ExecResult) -> Option<String> {
    let s = result.return_value.as_string().ok()?;
    Some(String::from_utf8_lossy(s.as_bytes()).into_owned())
}
