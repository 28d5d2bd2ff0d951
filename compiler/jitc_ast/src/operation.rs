// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum BinaryOp {
    Assign,   // an AST node with "=" as the root node
    Add,      // an AST node with "+" as the root node
    Subtract, // an AST node with "-" as the root node
    Multiply, // an AST node with "*" as the root node
    Divide,   // an AST node with "/" as the root node
}

impl BinaryOp {
    pub fn is_arithmetic(&self) -> bool {
        !matches!(self, BinaryOp::Assign)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Assign => "=",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
        }
    }
}

impl Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
