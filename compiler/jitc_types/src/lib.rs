// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod value;
mod str_interner;

pub use value::*;
pub use str_interner::*;
