//! Lumo CLI - Command line interface
//!
//! 三种运行方式：
//! - `lumo`              交互式 REPL
//! - `lumo <file>`       编译并执行源文件
//! - `lumo -b <file>`    加载并执行汇编文本

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, ValueEnum};
use tracing::{debug, info};

mod config;
mod logging;
mod platform;

use crate::config::{to_level_filter, verbosity_level, LogConfig};
use crate::platform::print_error_with_source;
use lumo_api::{
    assemble_with_config, compile_with_config, dump_tokens, execute_with_config, get_config,
    init_config, validate_config, LogFormat, LogLevel, LumoConfig, LumoError, RunConfig,
};

// sysexits.h
const EXIT_USAGE: i32 = 64;
const EXIT_DATAERR: i32 = 65;
const EXIT_SOFTWARE: i32 = 70;
const EXIT_IOERR: i32 = 74;
const EXIT_CONFIG: i32 = 78;

const USAGE: &str = "Usage: lumo [path] | lumo -b [bytecode path]";

#[derive(Parser)]
#[command(
    name = "lumo",
    about = "Lumo bytecode expression engine",
    version = "0.1.0"
)]
struct Cli {
    /// Source file, or `-b <file>` to run an assembly file; none starts the REPL
    #[arg(value_name = "ARGS", allow_hyphen_values = true)]
    args: Vec<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log level for the lexer phase
    #[arg(long, value_enum)]
    log_lexer: Option<LogLevelArg>,

    /// Log level for the compiler phase
    #[arg(long, value_enum)]
    log_compiler: Option<LogLevelArg>,

    /// Log level for the VM phase
    #[arg(long, value_enum)]
    log_vm: Option<LogLevelArg>,

    /// Log output format (defaults to the config file's format)
    #[arg(long, value_enum)]
    log_format: Option<LogFormatArg>,

    /// Also write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// JSON configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the disassembled chunk before running it
    #[arg(long)]
    dump_bytecode: bool,

    /// Print the token stream instead of running
    #[arg(long)]
    tokens: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevelArg {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LogLevel {
    fn from(arg: LogLevelArg) -> Self {
        match arg {
            LogLevelArg::Off => LogLevel::Off,
            LogLevelArg::Error => LogLevel::Error,
            LogLevelArg::Warn => LogLevel::Warn,
            LogLevelArg::Info => LogLevel::Info,
            LogLevelArg::Debug => LogLevel::Debug,
            LogLevelArg::Trace => LogLevel::Trace,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let lumo_config = match &cli.config {
        Some(path) => match read_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(EXIT_CONFIG);
            }
        },
        None => LumoConfig::default(),
    };

    let log_config = build_log_config(&cli, &lumo_config);
    let log_format = cli
        .log_format
        .map(LogFormat::from)
        .unwrap_or(lumo_config.logging.format);
    if let Err(e) = logging::init_with_file(&log_config, log_format, cli.log_file.as_deref()) {
        eprintln!("Warning: failed to initialize logging: {}", e);
    }

    let mut run_config = RunConfig::from(&lumo_config);
    run_config.dump_bytecode = cli.dump_bytecode;
    init_config(run_config);

    debug!(target: "lumo::cli", args = ?cli.args, "configuration ready");

    let code = match cli.args.as_slice() {
        [] => repl(cli.tokens),
        [path] => run_file(Path::new(path), cli.tokens),
        [_, path] => run_bytecode(Path::new(path)),
        _ => {
            println!("{}", USAGE);
            EXIT_USAGE
        }
    };
    process::exit(code);
}

/// Read, parse and validate a JSON config file
fn read_config(path: &Path) -> Result<LumoConfig, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("无法读取 '{}': {}", path.display(), e))?;
    let config: LumoConfig = serde_json::from_str(&content)
        .map_err(|e| format!("解析 '{}' 失败: {}", path.display(), e))?;
    validate_config(&config).map_err(|e| format!("'{}': {}", path.display(), e))?;
    Ok(config)
}

/// 配置文件给出基础级别，命令行参数覆盖
fn build_log_config(cli: &Cli, lumo_config: &LumoConfig) -> LogConfig {
    let mut log_config = LogConfig::from_logging(&lumo_config.logging);
    if let Some(level) = verbosity_level(cli.verbose) {
        log_config.global = level;
    }
    let phase_level = |arg: Option<LogLevelArg>| arg.map(|a| to_level_filter(a.into()));
    if let Some(level) = phase_level(cli.log_lexer) {
        log_config.lexer = Some(level);
    }
    if let Some(level) = phase_level(cli.log_compiler) {
        log_config.compiler = Some(level);
    }
    if let Some(level) = phase_level(cli.log_vm) {
        log_config.vm = Some(level);
    }
    log_config
}

fn exit_code(e: &LumoError) -> i32 {
    match e {
        LumoError::Compile(_) | LumoError::Assembly(_) => EXIT_DATAERR,
        LumoError::Runtime(_) => EXIT_SOFTWARE,
        LumoError::Io(_) => EXIT_IOERR,
        LumoError::Config(_) => EXIT_CONFIG,
    }
}

/// 编译并执行一段源码，打印反汇编（如果开启）和程序输出
fn run_source(source: &str) -> Result<(), LumoError> {
    let config = get_config();
    let compiled = compile_with_config(source, config)?;
    if let Some(listing) = &compiled.disassembly {
        print!("{}", listing);
    }
    let output = execute_with_config(&compiled.chunk, config)?;
    print!("{}", output.stdout);
    Ok(())
}

fn repl(tokens: bool) -> i32 {
    info!(target: "lumo::cli", "Starting REPL");

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut line = String::new();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return EXIT_IOERR;
        }

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => {
                println!();
                return 0;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error: {}", e);
                return EXIT_IOERR;
            }
        }

        let source = line.trim_end_matches(['\n', '\r']);
        if source.is_empty() {
            return 0;
        }

        if tokens {
            print!("{}", dump_tokens(source));
            continue;
        }

        // 出错后继续读下一行
        if let Err(e) = run_source(source) {
            print_error_with_source(&e, source, 1);
        }
    }
}

fn run_file(path: &Path, tokens: bool) -> i32 {
    info!(target: "lumo::cli", path = %path.display(), "Running source file");

    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", path.display(), e);
            return EXIT_IOERR;
        }
    };

    if tokens {
        print!("{}", dump_tokens(&source));
        return 0;
    }

    match run_source(&source) {
        Ok(()) => 0,
        Err(e) => {
            print_error_with_source(&e, &source, 1);
            exit_code(&e)
        }
    }
}

fn run_bytecode(path: &Path) -> i32 {
    info!(target: "lumo::cli", path = %path.display(), "Running assembly file");

    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: Cannot read '{}': {}", path.display(), e);
            return EXIT_IOERR;
        }
    };

    let config = get_config();
    let result = assemble_with_config(&text, config).and_then(|loaded| {
        if let Some(listing) = &loaded.disassembly {
            print!("{}", listing);
        }
        execute_with_config(&loaded.chunk, config)
    });

    match result {
        Ok(output) => {
            print!("{}", output.stdout);
            0
        }
        Err(e) => {
            // 汇编行号从 0 开始
            print_error_with_source(&e, &text, 0);
            exit_code(&e)
        }
    }
}
