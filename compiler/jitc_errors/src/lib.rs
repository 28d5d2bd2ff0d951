// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod code;
pub mod diagnostic;
pub mod error;
pub mod span;
pub mod terminal;

pub use code::ErrCode;
pub use error::CompileError;
pub use span::{SourcePos, Span};

/// Result type shared by every stage that can fail on user input.
pub type CompileResult<T> = Result<T, CompileError>;
