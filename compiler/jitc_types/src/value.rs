// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

/// A runtime value produced by literals and by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Value {
    /// Result of something that produces nothing, e.g. an empty block.
    #[default]
    Void,

    /// 32-bit signed integer.
    Integer(i32),

    /// 32-bit floating-point number (single precision).
    Floating(f32),
}

impl Value {
    pub fn is_integer(&self) -> bool {
        matches!(self, Value::Integer(_))
    }

    pub fn as_integer(&self) -> Option<i32> {
        if let Value::Integer(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    pub fn as_floating(&self) -> Option<f32> {
        if let Value::Floating(value) = self {
            Some(*value)
        } else {
            None
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(value)
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Integer(value) => write!(f, "{value}"),
            Value::Floating(value) => write!(f, "{value}"),
        }
    }
}
