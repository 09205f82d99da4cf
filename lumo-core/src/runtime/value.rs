//! 运行时值
//!
//! `Value` 是带标签的和类型，读取载荷必须先匹配标签，不可能按错误的类型解释数据。

use std::fmt;
use std::io::{self, Write};
use std::rc::Rc;

use thiserror::Error;

use super::object::{Obj, ObjString};

/// 值访问错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}

/// Lumo 值
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Number(f64),
    Obj(Rc<Obj>),
}

impl Value {
    /// 复制一份字节内容创建字符串值
    pub fn copy_string(bytes: &[u8]) -> Self {
        Value::Obj(Rc::new(Obj::String(ObjString::copy(bytes))))
    }

    /// 接管缓冲区创建字符串值
    pub fn take_string(bytes: Vec<u8>) -> Self {
        Value::Obj(Rc::new(Obj::String(ObjString::take(bytes))))
    }

    // ===== 类型判断 =====

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    pub fn is_obj(&self) -> bool {
        matches!(self, Value::Obj(_))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::Obj(obj) if matches!(**obj, Obj::String(_)))
    }

    /// nil 和 false 为假，其余（包括 0 和空字符串）都为真
    pub fn is_falsey(&self) -> bool {
        matches!(self, Value::Nil | Value::Bool(false))
    }

    // ===== 取值 =====

    pub fn as_bool(&self) -> Result<bool, ValueError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(other.mismatch("bool")),
        }
    }

    pub fn as_number(&self) -> Result<f64, ValueError> {
        match self {
            Value::Number(n) => Ok(*n),
            other => Err(other.mismatch("number")),
        }
    }

    pub fn as_string(&self) -> Result<&ObjString, ValueError> {
        match self {
            Value::Obj(obj) => match &**obj {
                Obj::String(s) => Ok(s),
            },
            other => Err(other.mismatch("string")),
        }
    }

    fn mismatch(&self, expected: &'static str) -> ValueError {
        ValueError::TypeMismatch {
            expected,
            found: self.type_name(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Number(_) => "number",
            Value::Obj(obj) => obj.type_name(),
        }
    }

    /// 值相等：标签不同一律不等，字符串比较内容
    pub fn equal(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Obj(a), Value::Obj(b)) => a == b,
            _ => false,
        }
    }

    /// 输出值的文本形式，字符串按原始字节写出
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self {
            Value::Obj(obj) => match &**obj {
                Obj::String(s) => out.write_all(s.as_bytes()),
            },
            other => write!(out, "{other}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => f.write_str("nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => f.write_str(&format_number(*n)),
            Value::Obj(obj) => write!(f, "{obj}"),
        }
    }
}

/// 通用浮点格式（`%g` 风格）
///
/// 最短往返数字；十进制指数 < -4 或 >= 6 时使用 `d.ddde±XX` 形式，指数至少两位。
pub fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "+Inf" } else { "-Inf" }.to_string();
    }
    if n == 0.0 {
        return if n.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    let sci = format!("{n:e}");
    let Some((mantissa, exp)) = sci.split_once('e') else {
        return sci;
    };
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= 6 {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.abs())
    } else {
        format!("{n}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predicates() {
        assert!(Value::Nil.is_nil());
        assert!(Value::Bool(true).is_bool());
        assert!(Value::Number(1.0).is_number());
        let s = Value::copy_string(b"hi");
        assert!(s.is_obj());
        assert!(s.is_string());
        assert!(!Value::Nil.is_string());
    }

    #[test]
    fn test_accessors_check_tag() {
        assert_eq!(Value::Bool(true).as_bool(), Ok(true));
        assert_eq!(Value::Number(2.5).as_number(), Ok(2.5));
        assert_eq!(
            Value::Nil.as_number(),
            Err(ValueError::TypeMismatch {
                expected: "number",
                found: "nil"
            })
        );
        assert_eq!(
            Value::Number(1.0).as_string().unwrap_err().to_string(),
            "type mismatch: expected string, found number"
        );
        assert_eq!(
            Value::copy_string(b"abc").as_string().unwrap().as_bytes(),
            b"abc"
        );
    }

    #[test]
    fn test_copy_string_does_not_alias_caller_buffer() {
        let mut buf = b"abc".to_vec();
        let v = Value::copy_string(&buf);
        buf.clear();
        buf.extend_from_slice(b"xyz");
        assert_eq!(v.to_string(), "abc");
    }

    #[test]
    fn test_take_string() {
        let v = Value::take_string(b"owned".to_vec());
        assert_eq!(v.as_string().unwrap().len(), 5);
    }

    #[test]
    fn test_equal_has_no_coercion() {
        assert!(Value::Nil.equal(&Value::Nil));
        assert!(!Value::Nil.equal(&Value::Bool(false)));
        assert!(!Value::Number(0.0).equal(&Value::Bool(false)));
        assert!(!Value::copy_string(b"").equal(&Value::Nil));
        assert!(Value::Bool(true).equal(&Value::Bool(true)));
        assert!(!Value::Number(1.0).equal(&Value::Number(2.0)));
    }

    #[test]
    fn test_string_equality_is_structural() {
        let a = Value::copy_string(b"lumo");
        let b = Value::take_string(b"lumo".to_vec());
        assert!(a.equal(&b));
        assert!(b.equal(&a));
        assert!(!a.equal(&Value::copy_string(b"lum")));
    }

    #[test]
    fn test_is_falsey() {
        assert!(Value::Nil.is_falsey());
        assert!(Value::Bool(false).is_falsey());
        assert!(!Value::Bool(true).is_falsey());
        assert!(!Value::Number(0.0).is_falsey());
        assert!(!Value::copy_string(b"").is_falsey());
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Nil.to_string(), "nil");
        assert_eq!(Value::Bool(false).to_string(), "false");
        assert_eq!(Value::Number(7.0).to_string(), "7");
        assert_eq!(Value::copy_string(b"a b").to_string(), "a b");
    }

    #[test]
    fn test_write_to_uses_raw_bytes() {
        let mut out = Vec::new();
        Value::copy_string(&[0xff, b'x']).write_to(&mut out).unwrap();
        assert_eq!(out, vec![0xff, b'x']);
    }

    #[test]
    fn test_format_number_plain() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(-0.0), "-0");
        assert_eq!(format_number(7.0), "7");
        assert_eq!(format_number(-3.5), "-3.5");
        assert_eq!(format_number(0.1), "0.1");
        assert_eq!(format_number(0.0001), "0.0001");
        assert_eq!(format_number(123456.0), "123456");
    }

    #[test]
    fn test_format_number_exponent() {
        assert_eq!(format_number(1e6), "1e+06");
        assert_eq!(format_number(1234567.0), "1.234567e+06");
        assert_eq!(format_number(0.00001), "1e-05");
        assert_eq!(format_number(1.5e-10), "1.5e-10");
        assert_eq!(format_number(1e100), "1e+100");
    }

    #[test]
    fn test_format_number_special() {
        assert_eq!(format_number(f64::INFINITY), "+Inf");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Inf");
        assert_eq!(format_number(f64::NAN), "NaN");
    }
}
