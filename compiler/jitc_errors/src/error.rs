// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use crate::code::ErrCode;
use crate::span::Span;

/// Errors caused by the program being compiled, as opposed to bugs in the
/// compiler itself (those go through `bug!`).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    #[error("unexpected character `{ch}`")]
    UnexpectedChar { ch: char, span: Span },

    #[error("integer literal `{lexeme}` is too large")]
    IntegerTooLarge { lexeme: String, span: Span },

    #[error("expected {expected}, found `{found}`")]
    UnexpectedToken { expected: &'static str, found: String, span: Span },

    #[error("expected `;` after expression")]
    ExpectedSemicolon { span: Span },

    #[error("left-hand side of `=` must be an identifier")]
    InvalidAssignTarget { span: Span },

    #[error("variable `{name}` is used before it is assigned")]
    UndefinedVariable { name: String },

    #[error("division by zero")]
    DivisionByZero,

    #[error("operator `{op}` needs integer operands")]
    NonIntegerOperand { op: &'static str },

    #[error("operation `{op}` cannot be lowered to machine code")]
    UnsupportedOperation { op: &'static str },

    #[error("program has no expression to execute")]
    EmptyProgram,

    #[error("native code returned {executed} but the interpreter produced {interpreted}")]
    ResultMismatch { interpreted: i32, executed: i32 },

    #[error("initial binding `{name}` is not an integer")]
    NonIntegerBinding { name: String },

    /// `call` and `errno` are set when an OS call failed.
    #[error("jit: {message}")]
    Jit {
        message: String,
        call: Option<&'static str>,
        errno: Option<i32>,
    },
}

impl CompileError {
    pub fn code(&self) -> ErrCode {
        match self {
            CompileError::UnexpectedChar { .. }         => ErrCode::LEX1000,
            CompileError::IntegerTooLarge { .. }        => ErrCode::PAR2000,
            CompileError::UnexpectedToken { .. }        => ErrCode::PAR2001,
            CompileError::ExpectedSemicolon { .. }      => ErrCode::PAR2002,
            CompileError::InvalidAssignTarget { .. }    => ErrCode::PAR2003,
            CompileError::UndefinedVariable { .. }      => ErrCode::INT3000,
            CompileError::DivisionByZero                => ErrCode::INT3001,
            CompileError::NonIntegerOperand { .. }      => ErrCode::INT3002,
            CompileError::UnsupportedOperation { .. }   => ErrCode::CMP4000,
            CompileError::EmptyProgram                  => ErrCode::CMP4001,
            CompileError::ResultMismatch { .. }         => ErrCode::CMP4002,
            CompileError::NonIntegerBinding { .. }      => ErrCode::CMP4003,
            CompileError::Jit { .. }                    => ErrCode::JIT5000,
        }
    }

    /// Source location of the error, when the failing stage still had one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::UnexpectedChar { span, .. }
            | CompileError::IntegerTooLarge { span, .. }
            | CompileError::UnexpectedToken { span, .. }
            | CompileError::ExpectedSemicolon { span }
            | CompileError::InvalidAssignTarget { span } => Some(*span),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_and_messages() {
        let err = CompileError::IntegerTooLarge {
            lexeme: "99999999999".to_string(),
            span: Span::single_line(1, 4, 11),
        };
        assert_eq!(err.code(), ErrCode::PAR2000);
        assert_eq!(err.to_string(), "integer literal `99999999999` is too large");
        assert_eq!(err.span(), Some(Span::single_line(1, 4, 11)));

        assert_eq!(CompileError::DivisionByZero.code(), ErrCode::INT3001);
        assert_eq!(CompileError::DivisionByZero.span(), None);
    }
}
