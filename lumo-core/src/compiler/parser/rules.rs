//! 解析规则表
//!
//! 每种 token 对应一个前缀动作、一个中缀动作和中缀绑定优先级。
//! 表由 `match` 静态给出，新增 `TokenKind` 变体时编译器会强制补全。

use crate::compiler::lexer::TokenKind;

/// 优先级，从低到高
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assignment,
    Or,
    And,
    Equality,
    Comparison,
    Term,
    Factor,
    Unary,
    Call,
    Primary,
}

impl Precedence {
    /// 高一级的优先级（二元运算右操作数用，保证左结合）
    pub fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call | Precedence::Primary => Precedence::Primary,
        }
    }
}

/// 前缀解析动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prefix {
    Grouping,
    Unary,
    Number,
    String,
    Literal,
}

/// 中缀解析动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infix {
    Binary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseRule {
    pub prefix: Option<Prefix>,
    pub infix: Option<Infix>,
    pub precedence: Precedence,
}

impl ParseRule {
    const fn new(prefix: Option<Prefix>, infix: Option<Infix>, precedence: Precedence) -> Self {
        Self {
            prefix,
            infix,
            precedence,
        }
    }
}

/// 查询 token 类型对应的解析规则
pub fn rule_for(kind: TokenKind) -> ParseRule {
    use Precedence as P;
    use TokenKind as T;

    match kind {
        T::LeftParen => ParseRule::new(Some(Prefix::Grouping), None, P::None),
        T::Minus => ParseRule::new(Some(Prefix::Unary), Some(Infix::Binary), P::Term),
        T::Plus => ParseRule::new(None, Some(Infix::Binary), P::Term),
        T::Slash | T::Star => ParseRule::new(None, Some(Infix::Binary), P::Factor),
        T::Bang => ParseRule::new(Some(Prefix::Unary), None, P::None),
        T::BangEqual | T::EqualEqual => ParseRule::new(None, Some(Infix::Binary), P::Equality),
        T::Greater | T::GreaterEqual | T::Less | T::LessEqual => {
            ParseRule::new(None, Some(Infix::Binary), P::Comparison)
        }
        T::String => ParseRule::new(Some(Prefix::String), None, P::None),
        T::Number => ParseRule::new(Some(Prefix::Number), None, P::None),
        T::False | T::Nil | T::True => ParseRule::new(Some(Prefix::Literal), None, P::None),

        T::RightParen
        | T::LeftBrace
        | T::RightBrace
        | T::Comma
        | T::Dot
        | T::Semicolon
        | T::Equal
        | T::Identifier
        | T::And
        | T::Class
        | T::Else
        | T::For
        | T::Fun
        | T::If
        | T::Or
        | T::Print
        | T::Return
        | T::Super
        | T::This
        | T::Var
        | T::While
        | T::Error
        | T::Eof => ParseRule::new(None, None, P::None),
    }
}
