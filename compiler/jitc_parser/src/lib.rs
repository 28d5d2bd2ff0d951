// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod parser_impl;

pub use parser_impl::Parser;

use jitc_ast::{Ast, NodeId};
use jitc_errors::CompileResult;
use jitc_lexer::Tokenizer;
use jitc_types::StringInterner;

/// Tokenizes and parses `source` into `ast`, returning the root block.
pub fn parse_program(source: &str, ast: &mut Ast, interner: &StringInterner) -> CompileResult<NodeId> {
    let tokens = Tokenizer::new(source).tokenize()?;
    log::debug!("parser: {} tokens", tokens.len());
    Parser::new(tokens, ast, interner).parse_program()
}
