// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Display;

/// Dense id of an interned identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(pub u32);

impl Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "${}", self.0)
    }
}

/// Interns identifier text for one compilation context. Strings live in the
/// arena for `'tcx`, so both directions of the lookup hand out borrowed data.
pub struct StringInterner<'tcx> {
    pub arena: &'tcx typed_arena::Arena<String>,
    cache: RefCell<HashMap<&'tcx str, Symbol>>,
    strings: RefCell<Vec<&'tcx str>>,
}

impl<'tcx> StringInterner<'tcx> {
    pub fn new(arena: &'tcx typed_arena::Arena<String>) -> Self {
        Self {
            arena,
            cache: RefCell::new(HashMap::new()),
            strings: RefCell::new(Vec::new()),
        }
    }

    pub fn intern(&self, s: &str) -> Symbol {
        let mut cache = self.cache.borrow_mut();
        if let Some(existing) = cache.get(s) {
            return *existing;
        }

        let allocated = self.arena.alloc(s.to_string());
        let permanent_ref: &'tcx str = allocated.as_str();

        let mut strings = self.strings.borrow_mut();
        let symbol = Symbol(strings.len() as u32);
        strings.push(permanent_ref);
        cache.insert(permanent_ref, symbol);
        symbol
    }

    pub fn lookup(&self, symbol: Symbol) -> Option<&'tcx str> {
        self.strings.borrow().get(symbol.0 as usize).copied()
    }

    pub fn get(&self, s: &str) -> Option<Symbol> {
        self.cache.borrow().get(s).copied()
    }

    pub fn len(&self) -> usize {
        self.strings.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
