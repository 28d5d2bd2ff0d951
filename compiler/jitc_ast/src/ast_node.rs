// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use jitc_errors::Span;
use jitc_types::{Symbol, Value};
use jitc_utils::bug;

use crate::operation::BinaryOp;

/// Handle of a node inside an [`Ast`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

/// Represents a node in the Abstract Syntax Tree (AST).
///
/// Children are referenced by [`NodeId`] into the owning arena, so the
/// whole tree can be cloned or dropped as one unit.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Literal value.
    Value(Value),

    /// Reference to a named local.
    Ident(Symbol),

    Binary {
        lhs: NodeId,
        op: BinaryOp,
        rhs: NodeId,
    },

    /// Sequence of expressions; evaluates to the last one.
    Block(Vec<NodeId>),
}

/// Arena owning every node of one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct Ast {
    nodes: Vec<AstNode>,
    spans: Vec<Span>,
}

impl Ast {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, node: AstNode, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        self.spans.push(span);
        id
    }

    pub fn value(&mut self, value: Value) -> NodeId {
        self.alloc(AstNode::Value(value), Span::default())
    }

    pub fn int(&mut self, value: i32) -> NodeId {
        self.value(Value::Integer(value))
    }

    pub fn ident(&mut self, symbol: Symbol) -> NodeId {
        self.alloc(AstNode::Ident(symbol), Span::default())
    }

    pub fn binary(&mut self, lhs: NodeId, op: BinaryOp, rhs: NodeId) -> NodeId {
        self.alloc(AstNode::Binary { lhs, op, rhs }, Span::default())
    }

    pub fn block(&mut self, exprs: Vec<NodeId>) -> NodeId {
        self.alloc(AstNode::Block(exprs), Span::default())
    }

    pub fn get(&self, id: NodeId) -> Option<&AstNode> {
        self.nodes.get(id.0 as usize)
    }

    /// Fetches a node that must exist; a dangling handle is a compiler bug.
    pub fn node(&self, id: NodeId) -> &AstNode {
        self.get(id).unwrap_or_else(|| bug!("AST node {:?} does not exist", id))
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.spans.get(id.0 as usize).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_hands_out_sequential_ids() {
        let mut ast = Ast::new();
        let x = ast.ident(Symbol(0));
        let ten = ast.int(10);
        let assign = ast.binary(x, BinaryOp::Assign, ten);
        let root = ast.block(vec![assign]);

        assert_eq!(x, NodeId(0));
        assert_eq!(root, NodeId(3));
        assert_eq!(ast.len(), 4);
        assert_eq!(
            ast.node(assign),
            &AstNode::Binary { lhs: x, op: BinaryOp::Assign, rhs: ten }
        );
        assert_eq!(ast.node(root), &AstNode::Block(vec![assign]));
    }

    #[test]
    #[should_panic(expected = "does not exist")]
    fn test_dangling_handle_is_a_bug() {
        let ast = Ast::new();
        ast.node(NodeId(7));
    }
}
