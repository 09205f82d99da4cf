//! 堆对象
//!
//! 目前只有字符串一种对象。对象由 `Rc` 共享，生命周期不超过一次运行，没有 GC 也没有驻留。

use std::fmt;

/// 堆对象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Obj {
    String(ObjString),
}

impl Obj {
    pub fn type_name(&self) -> &'static str {
        match self {
            Obj::String(_) => "string",
        }
    }
}

impl fmt::Display for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obj::String(s) => write!(f, "{s}"),
        }
    }
}

/// 字符串对象，按字节存储内容
///
/// 相等性比较内容（先长度后逐字节），与对象身份无关。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjString {
    bytes: Vec<u8>,
}

impl ObjString {
    /// 深拷贝调用方的缓冲区，之后调用方可以随意修改原缓冲区
    pub fn copy(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.to_vec(),
        }
    }

    /// 接管调用方的缓冲区，不复制
    pub fn take(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl fmt::Display for ObjString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.bytes))
    }
}
