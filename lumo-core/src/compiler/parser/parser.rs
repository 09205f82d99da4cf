//! Pratt 解析器 + 字节码生成
//!
//! 没有 AST：每个前缀/中缀动作识别完语法后立即向 Chunk 写指令。

use tracing::{debug, trace};

use super::error::{CompileError, Diagnostic, ErrorLocation};
use super::rules::{rule_for, Infix, Precedence, Prefix};
use crate::compiler::lexer::{Scanner, Token, TokenKind};
use crate::runtime::bytecode::{Chunk, OpCode};
use crate::runtime::value::Value;
use crate::runtime::vm::STACK_MAX;

/// `parse_precedence` 的最大嵌套层数
///
/// 每层在值栈上最多留下一个值，所以通过编译的程序栈深度不超过 `STACK_MAX`。
const MAX_NESTING: usize = STACK_MAX;

/// 编译一个表达式到 `chunk`
///
/// 出错时 chunk 保留已经写入的字节码，返回的错误包含所有诊断。
pub fn compile(source: &str, chunk: &mut Chunk) -> Result<(), CompileError> {
    debug!(target: "lumo::compiler", len = source.len(), "Compiling");

    let mut parser = Parser::new(source, chunk);
    parser.advance();
    parser.expression();
    parser.consume(TokenKind::Eof, "Expect end of expression.");
    parser.finish()
}

/// 解析器状态，每次 `compile` 新建一个
pub struct Parser<'src, 'c> {
    scanner: Scanner<'src>,
    current: Token<'src>,
    previous: Token<'src>,
    had_error: bool,
    panic_mode: bool,
    /// 当前 `parse_precedence` 嵌套层数
    depth: usize,
    chunk: &'c mut Chunk,
    diagnostics: Vec<Diagnostic>,
}

impl<'src, 'c> Parser<'src, 'c> {
    pub fn new(source: &'src str, chunk: &'c mut Chunk) -> Self {
        let start = Token::new(TokenKind::Eof, "", 1);
        Self {
            scanner: Scanner::new(source),
            current: start,
            previous: start,
            had_error: false,
            panic_mode: false,
            depth: 0,
            chunk,
            diagnostics: Vec::new(),
        }
    }

    // ===== token 游标 =====

    /// 前进一个 token，沿途报告扫描错误
    ///
    /// 扫描器产出 Eof 后不再产出任何 token，此时 `current` 停在 Eof 上。
    fn advance(&mut self) {
        self.previous = self.current;

        while let Some(token) = self.scanner.next() {
            self.current = token;
            if token.kind != TokenKind::Error {
                break;
            }
            self.error_at_current(token.lexeme);
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.current.kind == kind {
            self.advance();
            return;
        }
        self.error_at_current(message);
    }

    // ===== 表达式 =====

    fn expression(&mut self) {
        self.parse_precedence(Precedence::Assignment);
    }

    fn parse_precedence(&mut self, precedence: Precedence) {
        if self.depth >= MAX_NESTING {
            self.error("Expression nesting too deep.");
            return;
        }
        self.depth += 1;
        self.parse_operand(precedence);
        self.depth -= 1;
    }

    fn parse_operand(&mut self, precedence: Precedence) {
        self.advance();

        let Some(prefix) = rule_for(self.previous.kind).prefix else {
            self.error("Expect expression.");
            return;
        };
        self.apply_prefix(prefix);

        while precedence <= rule_for(self.current.kind).precedence {
            self.advance();
            if let Some(infix) = rule_for(self.previous.kind).infix {
                self.apply_infix(infix);
            }
        }
    }

    fn apply_prefix(&mut self, prefix: Prefix) {
        match prefix {
            Prefix::Grouping => self.grouping(),
            Prefix::Unary => self.unary(),
            Prefix::Number => self.number(),
            Prefix::String => self.string(),
            Prefix::Literal => self.literal(),
        }
    }

    fn apply_infix(&mut self, infix: Infix) {
        match infix {
            Infix::Binary => self.binary(),
        }
    }

    fn grouping(&mut self) {
        self.expression();
        self.consume(TokenKind::RightParen, "Expect ')' after expression.");
    }

    fn unary(&mut self) {
        let operator = self.previous.kind;

        self.parse_precedence(Precedence::Unary);

        match operator {
            TokenKind::Bang => self.emit_op(OpCode::Not),
            TokenKind::Minus => self.emit_op(OpCode::Negate),
            _ => unreachable!("unary rule on {operator}"),
        }
    }

    fn binary(&mut self) {
        let operator = self.previous.kind;
        let rule = rule_for(operator);
        self.parse_precedence(rule.precedence.next());

        match operator {
            TokenKind::BangEqual => self.emit_ops(OpCode::Equal, OpCode::Not),
            TokenKind::EqualEqual => self.emit_op(OpCode::Equal),
            TokenKind::Greater => self.emit_op(OpCode::Greater),
            TokenKind::GreaterEqual => self.emit_ops(OpCode::Less, OpCode::Not),
            TokenKind::Less => self.emit_op(OpCode::Less),
            TokenKind::LessEqual => self.emit_ops(OpCode::Greater, OpCode::Not),
            TokenKind::Plus => self.emit_op(OpCode::Add),
            TokenKind::Minus => self.emit_op(OpCode::Subtract),
            TokenKind::Star => self.emit_op(OpCode::Multiply),
            TokenKind::Slash => self.emit_op(OpCode::Divide),
            _ => unreachable!("binary rule on {operator}"),
        }
    }

    fn number(&mut self) {
        match self.previous.lexeme.parse::<f64>() {
            Ok(n) => self.emit_constant(Value::Number(n)),
            Err(_) => self.error("Invalid number literal."),
        }
    }

    fn string(&mut self) {
        // 去掉两端引号
        let lexeme = self.previous.lexeme;
        let interior = &lexeme.as_bytes()[1..lexeme.len() - 1];
        self.emit_constant(Value::copy_string(interior));
    }

    fn literal(&mut self) {
        match self.previous.kind {
            TokenKind::False => self.emit_op(OpCode::False),
            TokenKind::Nil => self.emit_op(OpCode::Nil),
            TokenKind::True => self.emit_op(OpCode::True),
            other => unreachable!("literal rule on {other}"),
        }
    }

    // ===== 字节码生成 =====

    fn emit_byte(&mut self, byte: u8) {
        self.chunk.write(byte, self.previous.line);
    }

    fn emit_op(&mut self, op: OpCode) {
        trace!(target: "lumo::compiler", op = op.name(), line = self.previous.line, "Emit");
        self.chunk.write_op(op, self.previous.line);
    }

    fn emit_ops(&mut self, first: OpCode, second: OpCode) {
        self.emit_op(first);
        self.emit_op(second);
    }

    fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_op(OpCode::Constant);
        self.emit_byte(index);
    }

    /// 常量池满时报错并返回索引 0，编译继续
    fn make_constant(&mut self, value: Value) -> u8 {
        match self.chunk.add_constant(value) {
            Ok(index) => index,
            Err(e) => {
                self.error(&e.to_string());
                0
            }
        }
    }

    /// 扫描到输入结尾，写入 RETURN，汇总结果
    fn finish(mut self) -> Result<(), CompileError> {
        while self.current.kind != TokenKind::Eof {
            self.advance();
        }
        self.emit_op(OpCode::Return);

        debug!(
            target: "lumo::compiler",
            code_len = self.chunk.code.len(),
            constants = self.chunk.constants.len(),
            had_error = self.had_error,
            "Compilation finished"
        );

        if self.had_error {
            Err(CompileError {
                diagnostics: self.diagnostics,
            })
        } else {
            Ok(())
        }
    }

    // ===== 错误报告 =====

    fn error(&mut self, message: &str) {
        self.error_at(self.previous, message);
    }

    fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message);
    }

    /// panic 模式下后续错误全部抑制
    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.panic_mode {
            trace!(target: "lumo::compiler", line = token.line, message, "Suppressed error");
            return;
        }
        self.panic_mode = true;
        self.had_error = true;

        let location = match token.kind {
            TokenKind::Eof => ErrorLocation::End,
            TokenKind::Error => ErrorLocation::None,
            _ => ErrorLocation::At(token.lexeme.to_string()),
        };
        let diagnostic = Diagnostic {
            line: token.line,
            location,
            message: message.to_string(),
        };
        debug!(target: "lumo::compiler", %diagnostic, "Compile error");
        self.diagnostics.push(diagnostic);
    }
}
