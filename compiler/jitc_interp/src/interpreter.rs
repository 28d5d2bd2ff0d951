// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use jitc_ast::{Ast, AstNode, BinaryOp, NodeId};
use jitc_errors::{CompileError, CompileResult};
use jitc_types::{StringInterner, Symbol, Value};

use crate::scope::Scope;

/// Tree-walking evaluator. Integer arithmetic wraps on overflow so the
/// results line up with what the generated x86-64 code computes.
#[derive(Debug)]
pub struct Interpreter {
    scopes: Vec<Scope>,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    pub fn new() -> Self {
        Self { scopes: vec![Scope::new()] }
    }

    /// Interpreter whose root scope starts with `bindings`.
    pub fn with_bindings(bindings: impl IntoIterator<Item = (Symbol, Value)>) -> Self {
        let mut root = Scope::new();
        for (symbol, value) in bindings {
            root.declare(symbol, value);
        }
        Self { scopes: vec![root] }
    }

    pub fn enter_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Drops the innermost scope. The root scope is never removed.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn lookup(&self, symbol: Symbol) -> Option<Value> {
        self.scopes.iter().rev().find_map(|scope| scope.lookup(symbol))
    }

    pub fn eval(&mut self, ast: &Ast, node: NodeId, interner: &StringInterner) -> CompileResult<Value> {
        match ast.node(node) {
            AstNode::Value(value) => Ok(*value),
            AstNode::Ident(symbol) => self.lookup(*symbol).ok_or_else(|| CompileError::UndefinedVariable {
                name: interner.lookup(*symbol).map_or_else(|| symbol.to_string(), str::to_string),
            }),
            AstNode::Binary { lhs, op: BinaryOp::Assign, rhs } => {
                let AstNode::Ident(target) = ast.node(*lhs) else {
                    return Err(CompileError::InvalidAssignTarget { span: ast.span(*lhs) });
                };
                let target = *target;
                let value = self.eval(ast, *rhs, interner)?;
                self.assign(target, value);
                Ok(value)
            }
            AstNode::Binary { lhs, op, rhs } => {
                let op = *op;
                let left = self.eval(ast, *lhs, interner)?;
                let right = self.eval(ast, *rhs, interner)?;
                Self::eval_arithmetic(op, left, right)
            }
            AstNode::Block(children) => {
                let mut last = Value::Void;
                for child in children {
                    last = self.eval(ast, *child, interner)?;
                }
                Ok(last)
            }
        }
    }

    fn eval_arithmetic(op: BinaryOp, left: Value, right: Value) -> CompileResult<Value> {
        let (Some(a), Some(b)) = (left.as_integer(), right.as_integer()) else {
            return Err(CompileError::NonIntegerOperand { op: op.symbol() });
        };
        let result = match op {
            BinaryOp::Add => a.wrapping_add(b),
            BinaryOp::Subtract => a.wrapping_sub(b),
            BinaryOp::Multiply => a.wrapping_mul(b),
            BinaryOp::Divide => {
                if b == 0 {
                    return Err(CompileError::DivisionByZero);
                }
                a.wrapping_div(b)
            }
            BinaryOp::Assign => unreachable!("assignment is evaluated separately"),
        };
        Ok(Value::Integer(result))
    }

    /// Updates the innermost scope that already binds `symbol`, or binds it
    /// in the current scope.
    fn assign(&mut self, symbol: Symbol, value: Value) {
        let idx = self
            .scopes
            .iter()
            .rposition(|scope| scope.contains(symbol))
            .unwrap_or(self.scopes.len() - 1);
        log::trace!("interp: {} = {} (scope {})", symbol, value, idx);
        self.scopes[idx].declare(symbol, value);
    }
}

#[cfg(test)]
mod tests {
    use jitc_ast::{Ast, BinaryOp};
    use jitc_errors::CompileError;
    use jitc_types::{StringInterner, Value};

    use super::Interpreter;

    #[test]
    fn test_single_assignment_yields_value() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let x = ast.ident(interner.intern("x"));
        let ten = ast.int(10);
        let assign = ast.binary(x, BinaryOp::Assign, ten);
        let root = ast.block(vec![assign]);

        let mut interp = Interpreter::new();
        assert_eq!(interp.eval(&ast, root, &interner), Ok(Value::Integer(10)));
        assert_eq!(interp.lookup(interner.intern("x")), Some(Value::Integer(10)));
    }

    #[test]
    fn test_assignment_then_addition() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let sym = interner.intern("x");
        let x0 = ast.ident(sym);
        let ten = ast.int(10);
        let assign = ast.binary(x0, BinaryOp::Assign, ten);
        let x1 = ast.ident(sym);
        let five = ast.int(5);
        let add = ast.binary(x1, BinaryOp::Add, five);
        let root = ast.block(vec![assign, add]);

        assert_eq!(Interpreter::new().eval(&ast, root, &interner), Ok(Value::Integer(15)));
    }

    #[test]
    fn test_initial_bindings() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let y = interner.intern("y");
        let lhs = ast.ident(y);
        let rhs = ast.int(3);
        let mul = ast.binary(lhs, BinaryOp::Multiply, rhs);

        let mut interp = Interpreter::with_bindings([(y, Value::Integer(7))]);
        assert_eq!(interp.eval(&ast, mul, &interner), Ok(Value::Integer(21)));
    }

    #[test]
    fn test_undefined_variable() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let z = ast.ident(interner.intern("z"));
        let err = Interpreter::new().eval(&ast, z, &interner).unwrap_err();
        assert_eq!(err, CompileError::UndefinedVariable { name: "z".to_string() });
    }

    #[test]
    fn test_division() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let a = ast.int(-7);
        let b = ast.int(2);
        let div = ast.binary(a, BinaryOp::Divide, b);
        let zero = ast.int(0);
        let div_zero = ast.binary(a, BinaryOp::Divide, zero);

        let mut interp = Interpreter::new();
        assert_eq!(interp.eval(&ast, div, &interner), Ok(Value::Integer(-3)));
        assert_eq!(interp.eval(&ast, div_zero, &interner), Err(CompileError::DivisionByZero));
    }

    #[test]
    fn test_arithmetic_wraps() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let max = ast.int(i32::MAX);
        let one = ast.int(1);
        let add = ast.binary(max, BinaryOp::Add, one);
        assert_eq!(Interpreter::new().eval(&ast, add, &interner), Ok(Value::Integer(i32::MIN)));
    }

    #[test]
    fn test_empty_block_is_void() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let root = ast.block(vec![]);
        assert_eq!(Interpreter::new().eval(&ast, root, &interner), Ok(Value::Void));
    }

    #[test]
    fn test_floating_operand_is_rejected() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let f = ast.value(Value::Floating(1.5));
        let one = ast.int(1);
        let add = ast.binary(f, BinaryOp::Add, one);
        assert_eq!(
            Interpreter::new().eval(&ast, add, &interner),
            Err(CompileError::NonIntegerOperand { op: "+" })
        );
    }

    #[test]
    fn test_inner_scope_updates_outer_binding() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let x = interner.intern("x");
        let target = ast.ident(x);
        let two = ast.int(2);
        let assign = ast.binary(target, BinaryOp::Assign, two);

        let mut interp = Interpreter::with_bindings([(x, Value::Integer(1))]);
        interp.enter_scope();
        interp.eval(&ast, assign, &interner).unwrap();
        interp.exit_scope();
        assert_eq!(interp.lookup(x), Some(Value::Integer(2)));
    }
}
