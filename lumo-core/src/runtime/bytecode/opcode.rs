//! 操作码定义

/// 字节码操作码
///
/// 每个操作码占 1 字节；只有 `Constant` 带一个 u8 操作数（常量池索引）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OpCode {
    Constant = 0x00,
    Nil = 0x01,
    True = 0x02,
    False = 0x03,
    Equal = 0x04,
    Greater = 0x05,
    Less = 0x06,
    Add = 0x07,
    Subtract = 0x08,
    Multiply = 0x09,
    Divide = 0x0A,
    Not = 0x0B,
    Negate = 0x0C,
    Return = 0x0D,
}

impl OpCode {
    /// 按编码顺序排列的全部操作码
    pub const ALL: [OpCode; 14] = [
        OpCode::Constant,
        OpCode::Nil,
        OpCode::True,
        OpCode::False,
        OpCode::Equal,
        OpCode::Greater,
        OpCode::Less,
        OpCode::Add,
        OpCode::Subtract,
        OpCode::Multiply,
        OpCode::Divide,
        OpCode::Not,
        OpCode::Negate,
        OpCode::Return,
    ];

    /// 反汇编时显示的名称
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Constant => "OP_CONSTANT",
            OpCode::Nil => "OP_NIL",
            OpCode::True => "OP_TRUE",
            OpCode::False => "OP_FALSE",
            OpCode::Equal => "OP_EQUAL",
            OpCode::Greater => "OP_GREATER",
            OpCode::Less => "OP_LESS",
            OpCode::Add => "OP_ADD",
            OpCode::Subtract => "OP_SUBTRACT",
            OpCode::Multiply => "OP_MULTIPLY",
            OpCode::Divide => "OP_DIVIDE",
            OpCode::Not => "OP_NOT",
            OpCode::Negate => "OP_NEGATE",
            OpCode::Return => "OP_RETURN",
        }
    }

    /// 汇编文本中的助记符
    pub fn mnemonic(self) -> &'static str {
        match self {
            OpCode::Constant => "constant",
            OpCode::Nil => "nil",
            OpCode::True => "true",
            OpCode::False => "false",
            OpCode::Equal => "equal",
            OpCode::Greater => "greater",
            OpCode::Less => "less",
            OpCode::Add => "add",
            OpCode::Subtract => "subtract",
            OpCode::Multiply => "multiply",
            OpCode::Divide => "divide",
            OpCode::Not => "not",
            OpCode::Negate => "negate",
            OpCode::Return => "return",
        }
    }

    pub fn from_mnemonic(mnemonic: &str) -> Option<OpCode> {
        OpCode::ALL.into_iter().find(|op| op.mnemonic() == mnemonic)
    }

    /// 操作数字节数
    pub fn operand_size(self) -> usize {
        match self {
            OpCode::Constant => 1,
            _ => 0,
        }
    }

    /// 对值栈的影响：(弹出个数, 压入个数)
    pub fn stack_effect(self) -> (usize, usize) {
        match self {
            OpCode::Constant | OpCode::Nil | OpCode::True | OpCode::False => (0, 1),
            OpCode::Equal
            | OpCode::Greater
            | OpCode::Less
            | OpCode::Add
            | OpCode::Subtract
            | OpCode::Multiply
            | OpCode::Divide => (2, 1),
            OpCode::Not | OpCode::Negate => (1, 1),
            OpCode::Return => (1, 0),
        }
    }
}

impl TryFrom<u8> for OpCode {
    /// 无法识别的字节原样返回
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        OpCode::ALL.get(byte as usize).copied().ok_or(byte)
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}
