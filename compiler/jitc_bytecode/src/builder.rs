// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexMap;

use jitc_ast::{Ast, AstNode, BinaryOp, NodeId};
use jitc_types::{Symbol, Value};
use jitc_utils::bug;

use crate::instruction::*;
use crate::dump_instructions;
use crate::vreg::VReg;

/// Lowers AST nodes into a flat, append-only bytecode sequence.
///
/// Locals live in one flat namespace: each identifier gets a stack slot the
/// first time it is referenced and keeps it for the rest of the unit.
#[derive(Debug, Default)]
pub struct BcBuilder {
    instructions: Vec<BcInstruction>,

    /// Stack slot operand (`s32*` register) of each local.
    locals: IndexMap<Symbol, BcOperand>,

    next_free_register: u32,
}

impl BcBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> &[BcInstruction] {
        &self.instructions
    }

    pub fn locals(&self) -> &IndexMap<Symbol, BcOperand> {
        &self.locals
    }

    /// Number of virtual registers handed out so far.
    pub fn register_count(&self) -> u32 {
        self.next_free_register
    }

    pub fn build_expression(&mut self, ast: &Ast, node: NodeId) -> BcOperand {
        match ast.node(node) {
            AstNode::Value(Value::Integer(value)) => BcOperand::Immediate { value: *value, ty: BcType::S32 },
            AstNode::Value(other) => bug!("cannot lower non-integer literal `{}`", other),
            AstNode::Ident(symbol) => self.local_slot(*symbol),
            AstNode::Binary { lhs, op: BinaryOp::Assign, rhs } => {
                let target = self.build_expression(ast, *lhs);
                if !target.is_pointer() {
                    bug!("assignment target {:?} is not a stack slot", target);
                }
                let value = self.build_expression(ast, *rhs);
                let value = self.build_load(value);
                self.build_store(target, value);
                target
            }
            AstNode::Binary { lhs, op, rhs } => {
                let opcode = match op {
                    BinaryOp::Add => BcOpcode::Add,
                    BinaryOp::Subtract => BcOpcode::Sub,
                    BinaryOp::Multiply => BcOpcode::Mul,
                    BinaryOp::Divide => BcOpcode::Div,
                    BinaryOp::Assign => unreachable!(),
                };
                // lhs is loaded before rhs is built; deeply right-nested
                // expressions keep every left operand live
                let left = self.build_expression(ast, *lhs);
                let left = self.build_load(left);
                let right = self.build_expression(ast, *rhs);
                let right = self.build_load(right);
                self.build_binary(opcode, left, right)
            }
            AstNode::Block(children) => {
                let mut last = BcOperand::None;
                for child in children {
                    last = self.build_expression(ast, *child);
                }
                if !children.is_empty() {
                    self.build_return(last);
                }
                last
            }
        }
    }

    /// Reserves a stack slot: `s32* rN = push s32* 4`.
    pub fn build_push(&mut self) -> BcOperand {
        let dest = self.new_register(BcType::S32Ptr);
        let size = BcOperand::Immediate { value: BcType::S32.element_size(), ty: BcType::S32Ptr };
        self.emit(BcInstruction::new(BcOpcode::Push, dest, size, BcOperand::None));
        dest
    }

    /// Value-typed operands are returned as they are; stack slots are read
    /// into a fresh value register.
    pub fn build_load(&mut self, src: BcOperand) -> BcOperand {
        if !src.is_pointer() {
            return src;
        }
        let dest = self.new_register(BcType::S32);
        self.emit(BcInstruction::new(BcOpcode::Load, dest, src, BcOperand::None));
        dest
    }

    pub fn build_store(&mut self, address: BcOperand, value: BcOperand) {
        self.emit(BcInstruction::new(BcOpcode::Store, BcOperand::None, address, value));
    }

    pub fn build_binary(&mut self, opcode: BcOpcode, lhs: BcOperand, rhs: BcOperand) -> BcOperand {
        if !opcode.is_arithmetic() {
            bug!("`{}` is not a binary arithmetic opcode", opcode.mnemonic());
        }
        let dest = self.new_register(BcType::S32);
        self.emit(BcInstruction::new(opcode, dest, lhs, rhs));
        dest
    }

    pub fn build_return(&mut self, value: BcOperand) {
        self.emit(BcInstruction::new(BcOpcode::Return, BcOperand::None, value, BcOperand::None));
    }

    pub fn dump(&self) -> String {
        dump_instructions(&self.instructions)
    }

    /// Seeds a local with an initial value: reserves its slot and stores
    /// `value` into it.
    pub fn build_binding(&mut self, symbol: Symbol, value: i32) -> BcOperand {
        let slot = self.local_slot(symbol);
        self.build_store(slot, BcOperand::Immediate { value, ty: BcType::S32 });
        slot
    }

    fn local_slot(&mut self, symbol: Symbol) -> BcOperand {
        if let Some(slot) = self.locals.get(&symbol) {
            return *slot;
        }
        let slot = self.build_push();
        self.locals.insert(symbol, slot);
        slot
    }

    fn new_register(&mut self, ty: BcType) -> BcOperand {
        let id = VReg(self.next_free_register);
        self.next_free_register += 1;
        BcOperand::Register { id, ty }
    }

    fn emit(&mut self, instr: BcInstruction) {
        log::trace!("bytecode: {}", instr);
        self.instructions.push(instr);
    }
}

#[cfg(test)]
mod tests {
    use jitc_ast::{Ast, BinaryOp, NodeId};
    use jitc_types::{StringInterner, Symbol};

    use super::*;

    fn assign(ast: &mut Ast, name: Symbol, value: i32) -> NodeId {
        let target = ast.ident(name);
        let value = ast.int(value);
        ast.binary(target, BinaryOp::Assign, value)
    }

    #[test]
    fn test_single_assignment_lowering() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let stmt = assign(&mut ast, interner.intern("x"), 10);
        let root = ast.block(vec![stmt]);

        let mut builder = BcBuilder::new();
        builder.build_expression(&ast, root);

        let instrs = builder.instructions();
        assert_eq!(instrs.iter().filter(|i| i.opcode == BcOpcode::Push).count(), 1);
        let stores: Vec<_> = instrs.iter().filter(|i| i.opcode == BcOpcode::Store).collect();
        assert_eq!(stores.len(), 1);
        assert_eq!(stores[0].src1, BcOperand::Immediate { value: 10, ty: BcType::S32 });
        assert_eq!(instrs.last().map(|i| i.opcode), Some(BcOpcode::Return));
        assert_eq!(
            builder.dump(),
            "s32* r0 = push s32* 4\n\
             store s32* r0, s32 10\n\
             return s32* r0"
        );
    }

    #[test]
    fn test_assignment_then_addition_lowering() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let x = interner.intern("x");
        let stmt = assign(&mut ast, x, 10);
        let lhs = ast.ident(x);
        let five = ast.int(5);
        let add = ast.binary(lhs, BinaryOp::Add, five);
        let root = ast.block(vec![stmt, add]);

        let mut builder = BcBuilder::new();
        let result = builder.build_expression(&ast, root);

        assert_eq!(result, BcOperand::Register { id: VReg(2), ty: BcType::S32 });
        assert_eq!(
            builder.dump(),
            "s32* r0 = push s32* 4\n\
             store s32* r0, s32 10\n\
             s32 r1 = load s32* r0\n\
             s32 r2 = add s32 r1, s32 5\n\
             return s32 r2"
        );
    }

    #[test]
    fn test_locals_are_allocated_once() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let x = interner.intern("x");
        let y = interner.intern("y");
        let first = assign(&mut ast, x, 1);
        let second = assign(&mut ast, x, 2);
        let third = assign(&mut ast, y, 3);
        let root = ast.block(vec![first, second, third]);

        let mut builder = BcBuilder::new();
        builder.build_expression(&ast, root);

        let pushes = builder.instructions().iter().filter(|i| i.opcode == BcOpcode::Push).count();
        assert_eq!(pushes, 2);
        assert_eq!(builder.locals().len(), 2);
        assert_eq!(builder.locals().keys().copied().collect::<Vec<_>>(), vec![x, y]);
    }

    #[test]
    fn test_register_ids_strictly_increase() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let sa = assign(&mut ast, a, 6);
        let sb = assign(&mut ast, b, 7);
        let la = ast.ident(a);
        let lb = ast.ident(b);
        let mul = ast.binary(la, BinaryOp::Multiply, lb);
        let root = ast.block(vec![sa, sb, mul]);

        let mut builder = BcBuilder::new();
        builder.build_expression(&ast, root);

        let ids: Vec<u32> = builder
            .instructions()
            .iter()
            .filter_map(|i| i.dest.vreg())
            .map(|v| v.0)
            .collect();
        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(builder.register_count(), 5);
    }

    #[test]
    fn test_division_lowers_to_div() {
        let mut ast = Ast::new();
        let a = ast.int(8);
        let b = ast.int(2);
        let div = ast.binary(a, BinaryOp::Divide, b);
        let root = ast.block(vec![div]);

        let mut builder = BcBuilder::new();
        builder.build_expression(&ast, root);
        assert_eq!(builder.dump(), "s32 r0 = div s32 8, s32 2\nreturn s32 r0");
    }

    #[test]
    fn test_empty_block_emits_nothing() {
        let mut ast = Ast::new();
        let root = ast.block(vec![]);
        let mut builder = BcBuilder::new();
        assert_eq!(builder.build_expression(&ast, root), BcOperand::None);
        assert!(builder.instructions().is_empty());
    }

    #[test]
    fn test_binding_seeds_slot_before_program() {
        let arena = typed_arena::Arena::new();
        let interner = StringInterner::new(&arena);
        let mut ast = Ast::new();
        let y = interner.intern("y");
        let load = ast.ident(y);
        let one = ast.int(1);
        let add = ast.binary(load, BinaryOp::Add, one);
        let root = ast.block(vec![add]);

        let mut builder = BcBuilder::new();
        let slot = builder.build_binding(y, 20);
        builder.build_expression(&ast, root);

        assert_eq!(builder.locals().get(&y), Some(&slot));
        assert_eq!(
            builder.dump(),
            "s32* r0 = push s32* 4\n\
             store s32* r0, s32 20\n\
             s32 r1 = load s32* r0\n\
             s32 r2 = add s32 r1, s32 1\n\
             return s32 r2"
        );
    }

    #[test]
    #[should_panic(expected = "non-integer literal")]
    fn test_floating_literal_is_rejected() {
        let mut ast = Ast::new();
        let f = ast.value(jitc_types::Value::Floating(2.5));
        BcBuilder::new().build_expression(&ast, f);
    }
}
