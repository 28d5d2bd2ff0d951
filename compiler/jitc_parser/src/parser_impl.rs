// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use jitc_ast::{Ast, AstNode, BinaryOp, NodeId};
use jitc_errors::{CompileError, CompileResult};
use jitc_lexer::{Token, TokenKind};
use jitc_types::{StringInterner, Value};

type ParseOutput = CompileResult<NodeId>;

/// Recursive-descent parser turning tokens into AST nodes.
///
/// Precedence, lowest first: `=` (right associative), `+ -`, `* /`
/// (both left associative).
pub struct Parser<'p, 'src, 'tcx> {
    /// Tokens that are going to be parsed; always terminated by `T_EOF`.
    tokens: Vec<Token<'src>>,

    /// Index of the current token.
    current: usize,

    ast: &'p mut Ast,
    interner: &'p StringInterner<'tcx>,
}

impl<'p, 'src, 'tcx> Parser<'p, 'src, 'tcx> {
    pub fn new(tokens: Vec<Token<'src>>, ast: &'p mut Ast, interner: &'p StringInterner<'tcx>) -> Self {
        Self {
            tokens,
            current: 0,
            ast,
            interner,
        }
    }

    /// `program := (expression ";")* EOF`, the last `;` being optional.
    pub fn parse_program(&mut self) -> ParseOutput {
        let start = self.peek().span();
        let mut exprs = vec![];

        while !self.check(TokenKind::T_EOF) {
            exprs.push(self.parse_expression()?);
            if self.check(TokenKind::T_SEMICOLON) {
                self.advance();
            } else if !self.check(TokenKind::T_EOF) {
                return Err(CompileError::ExpectedSemicolon { span: self.peek().span() });
            }
        }

        let span = start.merge(self.peek().span());
        Ok(self.ast.alloc(AstNode::Block(exprs), span))
    }

    pub fn parse_expression(&mut self) -> ParseOutput {
        self.parse_assignment()
    }

    fn parse_assignment(&mut self) -> ParseOutput {
        let target = self.parse_addition()?;
        if !self.check(TokenKind::T_EQUAL) {
            return Ok(target);
        }

        let eq_token = self.advance();
        if !matches!(self.ast.node(target), AstNode::Ident(_)) {
            return Err(CompileError::InvalidAssignTarget {
                span: self.ast.span(target).merge(eq_token.span()),
            });
        }
        let value = self.parse_assignment()?;
        Ok(self.create_binary(target, BinaryOp::Assign, value))
    }

    fn parse_addition(&mut self) -> ParseOutput {
        let left = self.parse_factor()?;
        self.try_parsing_binary(left, &[TokenKind::T_PLUS, TokenKind::T_MINUS], Self::parse_factor)
    }

    fn parse_factor(&mut self) -> ParseOutput {
        let left = self.parse_primary()?;
        self.try_parsing_binary(left, &[TokenKind::T_STAR, TokenKind::T_SLASH], Self::parse_primary)
    }

    fn try_parsing_binary(
        &mut self,
        mut left: NodeId,
        tokens: &[TokenKind],
        operand: fn(&mut Self) -> ParseOutput,
    ) -> ParseOutput {
        while tokens.contains(&self.peek().kind) {
            let op = match self.advance().kind {
                TokenKind::T_PLUS => BinaryOp::Add,
                TokenKind::T_MINUS => BinaryOp::Subtract,
                TokenKind::T_STAR => BinaryOp::Multiply,
                TokenKind::T_SLASH => BinaryOp::Divide,
                _ => unreachable!("operator set is checked above"),
            };
            let right = operand(self)?;
            left = self.create_binary(left, op, right);
        }
        Ok(left)
    }

    fn parse_primary(&mut self) -> ParseOutput {
        let current_token = self.advance();
        match current_token.kind {
            TokenKind::T_INT_NUM => {
                let value = Self::parse_integer(&current_token)?;
                Ok(self.ast.alloc(AstNode::Value(Value::Integer(value)), current_token.span()))
            }
            TokenKind::T_IDENTIFIER => {
                let symbol = self.interner.intern(current_token.lexeme);
                Ok(self.ast.alloc(AstNode::Ident(symbol), current_token.span()))
            }
            TokenKind::T_LPAREN => {
                let inner = self.parse_expression()?;
                self.consume(TokenKind::T_RPAREN)?;
                Ok(inner)
            }
            _ => Err(Self::unexpected(&current_token, "expression")),
        }
    }

    /// Decimal literal with optional `_` separators; anything above
    /// `i32::MAX` is rejected.
    fn parse_integer(token: &Token) -> CompileResult<i32> {
        let mut value: i32 = 0;
        for c in token.lexeme.chars().filter(|c| *c != '_') {
            let digit = c.to_digit(10).unwrap_or_else(|| unreachable!("tokenizer only emits digits"));
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(digit as i32))
                .ok_or_else(|| CompileError::IntegerTooLarge {
                    lexeme: token.lexeme.to_string(),
                    span: token.span(),
                })?;
        }
        Ok(value)
    }

    fn create_binary(&mut self, lhs: NodeId, op: BinaryOp, rhs: NodeId) -> NodeId {
        let span = self.ast.span(lhs).merge(self.ast.span(rhs));
        self.ast.alloc(AstNode::Binary { lhs, op, rhs }, span)
    }

    fn unexpected(token: &Token, expected: &'static str) -> CompileError {
        let found = if token.kind == TokenKind::T_EOF {
            TokenKind::T_EOF.describe().to_string()
        } else {
            token.lexeme.to_string()
        };
        CompileError::UnexpectedToken { expected, found, span: token.span() }
    }

    fn peek(&self) -> Token<'src> {
        self.tokens[self.current]
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn consume(&mut self, kind: TokenKind) -> CompileResult<Token<'src>> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(Self::unexpected(&self.peek(), kind.describe()))
        }
    }

    /// Returns the current token and moves past it. Stays on `T_EOF` once
    /// reached.
    fn advance(&mut self) -> Token<'src> {
        let token = self.peek();
        if token.kind != TokenKind::T_EOF {
            self.current += 1;
        }
        token
    }
}
