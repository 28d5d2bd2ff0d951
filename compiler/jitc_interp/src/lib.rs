// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod interpreter;
mod scope;

pub use interpreter::Interpreter;
pub use scope::Scope;
