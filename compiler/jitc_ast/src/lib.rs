// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod ast_node;
mod operation;

pub use ast_node::*;
pub use operation::*;
