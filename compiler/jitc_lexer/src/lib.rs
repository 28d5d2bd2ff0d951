// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod token;
mod tokenizer_impl;

pub use token::*;
pub use tokenizer_impl::Tokenizer;
