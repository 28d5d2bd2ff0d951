// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

use crate::vreg::VReg;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BcOpcode {
    Noop,
    Push,
    Load,
    Store,
    Add,
    Sub,
    Mul,
    Div,
    Return,
}

impl BcOpcode {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            BcOpcode::Noop => "noop",
            BcOpcode::Push => "push",
            BcOpcode::Load => "load",
            BcOpcode::Store => "store",
            BcOpcode::Add => "add",
            BcOpcode::Sub => "sub",
            BcOpcode::Mul => "mul",
            BcOpcode::Div => "div",
            BcOpcode::Return => "return",
        }
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(self, BcOpcode::Add | BcOpcode::Sub | BcOpcode::Mul | BcOpcode::Div)
    }
}

/// Element type of an operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BcType {
    /// 32-bit signed value.
    S32,

    /// Address of a 32-bit stack slot.
    S32Ptr,
}

impl BcType {
    pub fn is_pointer(&self) -> bool {
        matches!(self, BcType::S32Ptr)
    }

    /// Size in bytes of the pointee (or of the value itself).
    pub fn element_size(&self) -> i32 {
        4
    }
}

impl Display for BcType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BcType::S32 => write!(f, "s32"),
            BcType::S32Ptr => write!(f, "s32*"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BcOperand {
    #[default]
    None,
    Register { id: VReg, ty: BcType },
    Immediate { value: i32, ty: BcType },
}

impl BcOperand {
    pub fn ty(&self) -> Option<BcType> {
        match self {
            BcOperand::None => None,
            BcOperand::Register { ty, .. } | BcOperand::Immediate { ty, .. } => Some(*ty),
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, BcOperand::None)
    }

    pub fn is_pointer(&self) -> bool {
        self.ty().is_some_and(|ty| ty.is_pointer())
    }

    pub fn vreg(&self) -> Option<VReg> {
        match self {
            BcOperand::Register { id, .. } => Some(*id),
            _ => None,
        }
    }
}

impl Display for BcOperand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BcOperand::None => Ok(()),
            BcOperand::Register { id, ty } => write!(f, "{ty} {id}"),
            BcOperand::Immediate { value, ty } => write!(f, "{ty} {value}"),
        }
    }
}

/// Three-address bytecode instruction. Unused slots hold `BcOperand::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BcInstruction {
    pub opcode: BcOpcode,
    pub dest: BcOperand,
    pub src0: BcOperand,
    pub src1: BcOperand,
}

impl BcInstruction {
    pub fn new(opcode: BcOpcode, dest: BcOperand, src0: BcOperand, src1: BcOperand) -> Self {
        Self { opcode, dest, src0, src1 }
    }
}

/// `dest = opcode src0, src1`, leaving out the parts that are absent.
impl Display for BcInstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.dest.is_none() {
            write!(f, "{} = ", self.dest)?;
        }
        write!(f, "{}", self.opcode.mnemonic())?;
        if !self.src0.is_none() {
            write!(f, " {}", self.src0)?;
        }
        if !self.src1.is_none() {
            write!(f, ", {}", self.src1)?;
        }
        Ok(())
    }
}
