// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::collections::HashMap;

use jitc_types::{Symbol, Value};

/// One level of variable bindings.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    locals: HashMap<Symbol, Value>,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn declare(&mut self, symbol: Symbol, value: Value) -> Option<Value> {
        self.locals.insert(symbol, value)
    }

    pub fn lookup(&self, symbol: Symbol) -> Option<Value> {
        self.locals.get(&symbol).copied()
    }

    pub fn contains(&self, symbol: Symbol) -> bool {
        self.locals.contains_key(&symbol)
    }

    pub fn len(&self) -> usize {
        self.locals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locals.is_empty()
    }
}
