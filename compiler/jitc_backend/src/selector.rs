// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use indexmap::IndexMap;

use jitc_bytecode::{BcInstruction, BcOpcode, BcOperand, BcType, VReg};
use jitc_errors::{CompileError, CompileResult};
use jitc_target::X64Register;
use jitc_utils::bug;

use crate::instruction::{X64Instruction, X64Opcode, X64Operand};

/// Lowers bytecode into x64 instructions over virtual registers and
/// `rbp`-relative stack slots.
#[derive(Debug, Default)]
pub struct X64Builder {
    instructions: Vec<X64Instruction>,

    /// Displacement from `rbp` of each stack slot register.
    stack_offsets: IndexMap<VReg, i32>,

    /// Current bottom of the reserved stack area, relative to `rbp`. Only
    /// ever decreases.
    stack_pointer: i32,
}

impl X64Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn instructions(&self) -> &[X64Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<X64Instruction> {
        self.instructions
    }

    pub fn stack_offsets(&self) -> &IndexMap<VReg, i32> {
        &self.stack_offsets
    }

    pub fn stack_pointer(&self) -> i32 {
        self.stack_pointer
    }

    /// Bytes to reserve below `rbp`, rounded up to keep `rsp` 16-byte
    /// aligned.
    pub fn frame_size(&self) -> i32 {
        let reserved = -self.stack_pointer;
        (reserved + 15) & !15
    }

    pub fn lower_all(&mut self, bytecode: &[BcInstruction]) -> CompileResult<()> {
        for instr in bytecode {
            self.lower(instr)?;
        }
        log::debug!(
            "x64 selector: {} bytecode -> {} instructions, {} stack bytes",
            bytecode.len(),
            self.instructions.len(),
            -self.stack_pointer
        );
        Ok(())
    }

    pub fn lower(&mut self, instr: &BcInstruction) -> CompileResult<()> {
        match instr.opcode {
            BcOpcode::Noop => self.emit(X64Instruction::nullary(X64Opcode::Noop)),
            BcOpcode::Push => self.lower_push(instr),
            BcOpcode::Load => {
                let dest = self.convert(&instr.dest);
                let src = self.convert(&instr.src0);
                self.emit(X64Instruction::new(X64Opcode::Mov, dest, src));
            }
            BcOpcode::Store => {
                let address = self.convert(&instr.src0);
                let value = self.convert(&instr.src1);
                self.emit(X64Instruction::new(X64Opcode::Mov, address, value));
            }
            BcOpcode::Add => self.lower_binary(X64Opcode::Add, instr),
            // deliberately `sub`, not `add`: lowering to `add` computes a + b
            BcOpcode::Sub => self.lower_binary(X64Opcode::Sub, instr),
            BcOpcode::Mul => self.lower_binary(X64Opcode::Imul, instr),
            BcOpcode::Div => return Err(CompileError::UnsupportedOperation { op: "/" }),
            BcOpcode::Return => {
                if !instr.src0.is_none() {
                    let value = self.convert(&instr.src0);
                    self.emit(X64Instruction::new(X64Opcode::Mov, X64Operand::fixed(X64Register::RAX), value));
                }
                self.emit(X64Instruction::nullary(X64Opcode::Ret));
            }
        }
        Ok(())
    }

    fn lower_push(&mut self, instr: &BcInstruction) {
        let Some(vreg) = instr.dest.vreg() else {
            bug!("push without a destination register");
        };
        let size = match instr.src0 {
            BcOperand::Immediate { value, .. } if value > 0 => value,
            other => bug!("push needs a positive size, got {:?}", other),
        };
        self.stack_pointer -= size;
        if self.stack_offsets.insert(vreg, self.stack_pointer).is_some() {
            bug!("stack slot for {} reserved twice", vreg);
        }
    }

    /// `mov dest, lhs` followed by the destructive two-operand form.
    fn lower_binary(&mut self, opcode: X64Opcode, instr: &BcInstruction) {
        let dest = self.convert(&instr.dest);
        let lhs = self.convert(&instr.src0);
        let rhs = self.convert(&instr.src1);
        self.emit(X64Instruction::new(X64Opcode::Mov, dest, lhs));
        self.emit(X64Instruction::new(opcode, dest, rhs));
    }

    fn convert(&self, operand: &BcOperand) -> X64Operand {
        match operand {
            BcOperand::None => X64Operand::None,
            BcOperand::Register { id, ty: BcType::S32Ptr } => match self.stack_offsets.get(id) {
                Some(disp) => X64Operand::Memory { base: X64Register::RBP, disp: *disp },
                None => bug!("stack slot {} used before it was pushed", id),
            },
            BcOperand::Register { id, ty: BcType::S32 } => X64Operand::virtual_reg(*id),
            BcOperand::Immediate { value, .. } => X64Operand::Immediate(*value),
        }
    }

    fn emit(&mut self, instr: X64Instruction) {
        log::trace!("x64: {}", instr);
        self.instructions.push(instr);
    }
}
