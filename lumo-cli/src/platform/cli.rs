//! CLI 格式化输出
//!
//! 提供命令行友好的错误显示和源码上下文打印。

use lumo_api::LumoError;

/// 错误行前后显示的上下文行数
const CONTEXT_LINES: usize = 2;

/// 打印错误并显示源代码上下文
///
/// `first_line` 是错误行号的起点：源码为 1，汇编文本为 0。
pub fn print_error_with_source(e: &LumoError, source: &str, first_line: usize) {
    eprintln!("{}", e);

    if let Some(line) = e.line() {
        let error_line = (line + 1).saturating_sub(first_line);
        if let Some(context) = format_source_context(source, error_line) {
            eprint!("{}", context);
        }
    }
}

/// 渲染源代码上下文（错误行前后几行），行号越界时返回 `None`
pub fn format_source_context(source: &str, error_line: usize) -> Option<String> {
    let lines: Vec<&str> = source.lines().collect();
    let total_lines = lines.len();

    if error_line == 0 || error_line > total_lines {
        return None;
    }

    // 计算要显示的行范围
    let start_line = error_line.saturating_sub(CONTEXT_LINES).max(1);
    let end_line = (error_line + CONTEXT_LINES).min(total_lines);

    // 计算行号的最大宽度用于对齐
    let width = end_line.to_string().len();
    let separator = "-".repeat(width + 1);

    let mut out = format!("{}|--\n", separator);
    for line_no in start_line..=end_line {
        let content = lines[line_no - 1];
        out.push_str(&format!("{:>width$} | {}\n", line_no, content));

        if line_no == error_line {
            // 没有列信息，标记整行的非空白部分
            let indent = content.len() - content.trim_start().len();
            let marker_len = content.trim().len().max(1);
            out.push_str(&format!(
                "{:width$} | {}{}\n",
                "",
                " ".repeat(indent),
                "^".repeat(marker_len)
            ));
        }
    }
    out.push_str(&format!("{}|--\n", separator));
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_marks_error_line() {
        let source = "1 +\n  nil * 2\n3";
        let context = format_source_context(source, 2).unwrap();
        let lines: Vec<&str> = context.lines().collect();
        assert_eq!(lines[0], "--|--");
        assert_eq!(lines[1], "1 | 1 +");
        assert_eq!(lines[2], "2 |   nil * 2");
        assert_eq!(lines[3], "  |   ^^^^^^^");
        assert_eq!(lines[4], "3 | 3");
        assert_eq!(lines[5], "--|--");
    }

    #[test]
    fn test_context_window() {
        let source = (1..=10).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let context = format_source_context(&source, 6).unwrap();
        assert!(context.contains("\n4 | 4\n"));
        assert!(context.contains("\n8 | 8\n"));
        assert!(!context.contains("3 | 3"));
        assert!(!context.contains("9 | 9"));
    }

    #[test]
    fn test_out_of_range_line() {
        assert_eq!(format_source_context("1", 0), None);
        assert_eq!(format_source_context("1", 2), None);
    }
}
