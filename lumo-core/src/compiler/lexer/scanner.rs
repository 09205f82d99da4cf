//! Lumo 语言 Scanner 实现
//!
//! 拉取式（pull-based）词法分析器：编译器每次调用 `next()` 只扫描一个 token，
//! 扫描进度完全由游标状态保存，不需要额外线程或通道。
//!
//! 支持：
//! - 单字符 / 双字符运算符（最长匹配）
//! - 数字、字符串（可跨行）、标识符与关键字
//! - `//` 单行注释

use std::iter::FusedIterator;

use tracing::trace;

use super::token_kind::TokenKind;

/// 词法单元
///
/// `lexeme` 借用源码缓冲区；错误 token 的 `lexeme` 是错误消息本身。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub line: usize,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, lexeme: &'src str, line: usize) -> Self {
        Self { kind, lexeme, line }
    }
}

/// Lumo 扫描器
pub struct Scanner<'src> {
    source: &'src str,
    /// 当前 token 的起始字节位置
    start: usize,
    /// 下一个待扫描的字节位置
    current: usize,
    line: usize,
    /// 已经产出 Eof，之后不再扫描
    finished: bool,
}

impl<'src> Scanner<'src> {
    pub fn new(source: &'src str) -> Self {
        trace!(target: "lumo::lexer", len = source.len(), "Creating new Scanner");
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            finished: false,
        }
    }

    /// 扫描下一个 token
    fn scan_token(&mut self) -> Token<'src> {
        self.skip_whitespace_and_comments();
        self.start = self.current;

        if self.is_at_end() {
            return self.make_token(TokenKind::Eof);
        }

        let c = self.advance();

        // 根据首字符分发
        match c {
            b'(' => self.make_token(TokenKind::LeftParen),
            b')' => self.make_token(TokenKind::RightParen),
            b'{' => self.make_token(TokenKind::LeftBrace),
            b'}' => self.make_token(TokenKind::RightBrace),
            b';' => self.make_token(TokenKind::Semicolon),
            b',' => self.make_token(TokenKind::Comma),
            b'.' => self.make_token(TokenKind::Dot),
            b'-' => self.make_token(TokenKind::Minus),
            b'+' => self.make_token(TokenKind::Plus),
            b'/' => self.make_token(TokenKind::Slash),
            b'*' => self.make_token(TokenKind::Star),

            b'!' => self.scan_pair(TokenKind::BangEqual, TokenKind::Bang),
            b'=' => self.scan_pair(TokenKind::EqualEqual, TokenKind::Equal),
            b'<' => self.scan_pair(TokenKind::LessEqual, TokenKind::Less),
            b'>' => self.scan_pair(TokenKind::GreaterEqual, TokenKind::Greater),

            b'"' => self.scan_string(),
            c if is_digit(c) => self.scan_number(),
            c if is_alpha(c) => self.scan_identifier(),

            c => {
                // 非 ASCII 字符整体跳过，只报一次错
                if !c.is_ascii() {
                    self.skip_rest_of_char();
                }
                self.error_token("Unexpected character.")
            }
        }
    }

    /// 跳过空白符和注释，换行时递增行号
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\r' | b'\t') => {
                    self.current += 1;
                }
                Some(b'\n') => {
                    self.line += 1;
                    self.current += 1;
                }
                Some(b'/') if self.peek_next() == Some(b'/') => {
                    // 注释一直到行尾，换行符留给下一轮处理
                    while !matches!(self.peek(), Some(b'\n') | None) {
                        self.current += 1;
                    }
                }
                _ => return,
            }
        }
    }

    /// `!` `=` `<` `>`：后面跟 `=` 时取双字符形式
    fn scan_pair(&mut self, double: TokenKind, single: TokenKind) -> Token<'src> {
        if self.match_byte(b'=') {
            self.make_token(double)
        } else {
            self.make_token(single)
        }
    }

    fn scan_string(&mut self) -> Token<'src> {
        let start_line = self.line;
        while let Some(c) = self.peek() {
            if c == b'"' {
                break;
            }
            if c == b'\n' {
                self.line += 1;
            }
            self.current += 1;
        }

        if self.is_at_end() {
            return Token::new(TokenKind::Error, "unterminated string.", start_line);
        }

        // 闭合的引号
        self.current += 1;
        Token::new(TokenKind::String, self.lexeme(), start_line)
    }

    fn scan_number(&mut self) -> Token<'src> {
        self.consume_digits();

        // 小数点后必须紧跟数字：`3.` 是 NUMBER DOT
        if self.peek() == Some(b'.') && self.peek_next().is_some_and(is_digit) {
            self.current += 1;
            self.consume_digits();
        }

        self.make_token(TokenKind::Number)
    }

    fn scan_identifier(&mut self) -> Token<'src> {
        while self.peek().is_some_and(|c| is_alpha(c) || is_digit(c)) {
            self.current += 1;
        }
        let kind = TokenKind::keyword_or_identifier(self.lexeme());
        self.make_token(kind)
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(is_digit) {
            self.current += 1;
        }
    }

    fn skip_rest_of_char(&mut self) {
        while self.current < self.source.len() && !self.source.is_char_boundary(self.current) {
            self.current += 1;
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.source.as_bytes()[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> Option<u8> {
        self.source.as_bytes().get(self.current).copied()
    }

    fn peek_next(&self) -> Option<u8> {
        self.source.as_bytes().get(self.current + 1).copied()
    }

    fn match_byte(&mut self, expected: u8) -> bool {
        if self.peek() == Some(expected) {
            self.current += 1;
            true
        } else {
            false
        }
    }

    fn lexeme(&self) -> &'src str {
        &self.source[self.start..self.current]
    }

    fn make_token(&self, kind: TokenKind) -> Token<'src> {
        Token::new(kind, self.lexeme(), self.line)
    }

    fn error_token(&self, message: &'static str) -> Token<'src> {
        Token::new(TokenKind::Error, message, self.line)
    }
}

impl<'src> Iterator for Scanner<'src> {
    type Item = Token<'src>;

    /// 产出下一个 token；Eof 只产出一次，之后永远返回 `None`
    fn next(&mut self) -> Option<Token<'src>> {
        if self.finished {
            return None;
        }

        let token = self.scan_token();
        trace!(
            target: "lumo::lexer",
            kind = %token.kind,
            line = token.line,
            lexeme = token.lexeme,
            "Scanned token"
        );

        if token.kind == TokenKind::Eof {
            self.finished = true;
        }
        Some(token)
    }
}

impl FusedIterator for Scanner<'_> {}

fn is_digit(c: u8) -> bool {
    c.is_ascii_digit()
}

fn is_alpha(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}
