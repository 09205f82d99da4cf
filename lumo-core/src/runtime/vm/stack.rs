//! 定长值栈
//!
//! 溢出、下溢都是编译器或虚拟机自身的缺陷，直接 panic。

use crate::runtime::value::Value;

/// 值栈的最小槽位数，编译器和汇编器保证程序的栈深度不超过它
pub const STACK_MAX: usize = 256;

#[derive(Debug, Clone)]
pub struct Stack {
    slots: Vec<Value>,
    capacity: usize,
}

impl Stack {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: Value) {
        if self.slots.len() >= self.capacity {
            panic!("stack overflow: capacity {} exceeded", self.capacity);
        }
        self.slots.push(value);
    }

    pub fn pop(&mut self) -> Value {
        match self.slots.pop() {
            Some(value) => value,
            None => panic!("stack underflow"),
        }
    }

    /// 查看距栈顶 `distance` 的值（0 为栈顶），不出栈
    pub fn peek(&self, distance: usize) -> &Value {
        let len = self.slots.len();
        if distance >= len {
            panic!("stack underflow: peek({distance}) with {len} values");
        }
        &self.slots[len - 1 - distance]
    }

    pub fn reset(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 从栈底到栈顶
    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.slots.iter()
    }
}
