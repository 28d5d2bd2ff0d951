// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::collections::HashMap;

use jitc_errors::{CompileError, CompileResult, Span};
use lazy_static::lazy_static;

use crate::token::{Token, TokenKind, TokenPos};

lazy_static! {
    static ref PUNCTUATORS: HashMap<char, TokenKind> = {
        let mut _puncts: HashMap<char, TokenKind> = HashMap::new();
        _puncts.insert('=', TokenKind::T_EQUAL);
        _puncts.insert('+', TokenKind::T_PLUS);
        _puncts.insert('-', TokenKind::T_MINUS);
        _puncts.insert('*', TokenKind::T_STAR);
        _puncts.insert('/', TokenKind::T_SLASH);
        _puncts.insert('(', TokenKind::T_LPAREN);
        _puncts.insert(')', TokenKind::T_RPAREN);
        _puncts.insert(';', TokenKind::T_SEMICOLON);
        _puncts
    };
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

pub struct Tokenizer<'src> {
    source: &'src str,
    /// Byte offset of the next unread character.
    offset: usize,
    line: usize,
    column: usize,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 0,
        }
    }

    /// Splits the whole source into tokens. The last token is always `T_EOF`.
    pub fn tokenize(&mut self) -> CompileResult<Vec<Token<'src>>> {
        let mut tokens: Vec<Token<'src>> = Vec::new();
        loop {
            let token = self.next_token()?;
            let kind = token.kind;
            tokens.push(token);
            if kind == TokenKind::T_EOF {
                break;
            }
        }
        Ok(tokens)
    }

    fn next_token(&mut self) -> CompileResult<Token<'src>> {
        self.skip_whitespace();

        let pos = TokenPos { line: self.line, column: self.column };
        let start = self.offset;
        let Some(c) = self.peek_char() else {
            return Ok(Token::new(TokenKind::T_EOF, "", pos));
        };

        let kind = if c.is_ascii_digit() {
            // underscores are digit separators: 1_000
            self.advance_while(|c| c.is_ascii_digit() || c == '_');
            TokenKind::T_INT_NUM
        } else if is_ident_start(c) {
            self.advance_while(is_ident_continue);
            TokenKind::T_IDENTIFIER
        } else if let Some(kind) = PUNCTUATORS.get(&c) {
            self.advance_char();
            *kind
        } else {
            return Err(CompileError::UnexpectedChar {
                ch: c,
                span: Span::single_line(pos.line, pos.column, 1),
            });
        };

        Ok(Token::new(kind, &self.source[start..self.offset], pos))
    }

    fn skip_whitespace(&mut self) {
        self.advance_while(|c| matches!(c, ' ' | '\t' | '\r' | '\n'));
    }

    fn advance_while(&mut self, predicate: impl Fn(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !predicate(c) {
                break;
            }
            self.advance_char();
        }
    }

    fn peek_char(&self) -> Option<char> {
        self.source[self.offset..].chars().next()
    }

    fn advance_char(&mut self) {
        if let Some(c) = self.peek_char() {
            self.offset += c.len_utf8();
            if c == '\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }
}
