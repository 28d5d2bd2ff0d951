// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

#![allow(non_camel_case_types)]

use jitc_errors::Span;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    T_IDENTIFIER,
    T_INT_NUM,
    T_EQUAL,     // =
    T_PLUS,      // +
    T_MINUS,     // -
    T_STAR,      // *
    T_SLASH,     // /
    T_LPAREN,    // (
    T_RPAREN,    // )
    T_SEMICOLON, // ;
    T_EOF,
}

impl TokenKind {
    /// Human readable name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::T_IDENTIFIER => "identifier",
            TokenKind::T_INT_NUM => "integer literal",
            TokenKind::T_EQUAL => "`=`",
            TokenKind::T_PLUS => "`+`",
            TokenKind::T_MINUS => "`-`",
            TokenKind::T_STAR => "`*`",
            TokenKind::T_SLASH => "`/`",
            TokenKind::T_LPAREN => "`(`",
            TokenKind::T_RPAREN => "`)`",
            TokenKind::T_SEMICOLON => "`;`",
            TokenKind::T_EOF => "end of input",
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TokenPos {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Token<'src> {
    pub kind: TokenKind,
    pub lexeme: &'src str,
    pub pos: TokenPos,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, lexeme: &'src str, pos: TokenPos) -> Token<'src> {
        Token { kind, lexeme, pos }
    }

    pub fn span(&self) -> Span {
        Span::single_line(self.pos.line, self.pos.column, self.lexeme.chars().count().max(1))
    }
}
