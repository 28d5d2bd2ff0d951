// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrCode {
    /// Unexpected character
    LEX1000     = 1000,

    /// Integer literal does not fit in 32 bits
    PAR2000     = 2000,

    /// Unexpected token
    PAR2001     = 2001,

    /// Missing semicolon
    PAR2002     = 2002,

    /// Assignment target is not an identifier
    PAR2003     = 2003,

    /// Variable read before assignment
    INT3000     = 3000,

    /// Division by zero
    INT3001     = 3001,

    /// Arithmetic on a non-integer value
    INT3002     = 3002,

    /// Operation has no machine code lowering
    CMP4000     = 4000,

    /// Nothing to execute
    CMP4001     = 4001,

    /// Interpreter and native results differ
    CMP4002     = 4002,

    /// Initial binding cannot be stored natively
    CMP4003     = 4003,

    /// Executable memory could not be prepared
    JIT5000     = 5000,
}

impl Display for ErrCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
