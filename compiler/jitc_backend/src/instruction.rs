// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

use jitc_bytecode::VReg;
use jitc_target::X64Register;
use jitc_utils::bug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum X64Opcode {
    Noop,
    Mov,
    Add,
    Sub,
    Imul,
    Idiv,
    Ret,
    Push,
    Pop,
}

impl X64Opcode {
    pub fn mnemonic(&self) -> &'static str {
        match self {
            X64Opcode::Noop => "noop",
            X64Opcode::Mov => "mov",
            X64Opcode::Add => "add",
            X64Opcode::Sub => "sub",
            X64Opcode::Imul => "imul",
            X64Opcode::Idiv => "idiv",
            X64Opcode::Ret => "ret",
            X64Opcode::Push => "push",
            X64Opcode::Pop => "pop",
        }
    }
}

/// Register operand. Virtual registers start out without a physical
/// register; fixed registers (`rax` for the return value, the frame
/// registers) carry no virtual id at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct X64RegOperand {
    pub vreg: Option<VReg>,
    pub phys: Option<X64Register>,
}

impl X64RegOperand {
    pub fn is_allocated(&self) -> bool {
        self.phys.is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum X64Operand {
    #[default]
    None,
    Register(X64RegOperand),

    /// `[base + disp]`
    Memory { base: X64Register, disp: i32 },
    Immediate(i32),
}

impl X64Operand {
    pub fn virtual_reg(vreg: VReg) -> Self {
        X64Operand::Register(X64RegOperand { vreg: Some(vreg), phys: None })
    }

    pub fn fixed(reg: X64Register) -> Self {
        X64Operand::Register(X64RegOperand { vreg: None, phys: Some(reg) })
    }

    pub fn is_none(&self) -> bool {
        matches!(self, X64Operand::None)
    }

    pub fn as_register(&self) -> Option<&X64RegOperand> {
        match self {
            X64Operand::Register(reg) => Some(reg),
            _ => None,
        }
    }
}

impl Display for X64Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            X64Operand::None => Ok(()),
            X64Operand::Register(X64RegOperand { phys: Some(reg), .. }) => write!(f, "{reg}"),
            X64Operand::Register(X64RegOperand { vreg: Some(vreg), phys: None }) => write!(f, "%{vreg}"),
            X64Operand::Register(X64RegOperand { vreg: None, phys: None }) => write!(f, "%?"),
            X64Operand::Memory { base, disp } if *disp < 0 => write!(f, "[{base}-{}]", disp.unsigned_abs()),
            X64Operand::Memory { base, disp } => write!(f, "[{base}+{disp}]"),
            X64Operand::Immediate(value) => write!(f, "{value}"),
        }
    }
}

/// Operand-kind combination of an instruction. Drives both register
/// allocation and byte encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum X64Encoding {
    R,
    RR,
    RM,
    MR,
    RI,
    MI,
}

impl X64Encoding {
    /// `None` for operandless instructions. Every other combination outside
    /// the six legal tags is a lowering bug.
    pub fn classify(op0: &X64Operand, op1: &X64Operand) -> Option<X64Encoding> {
        use X64Operand::*;
        match (op0, op1) {
            (None, None) => Option::None,
            (Register(_), None) => Some(X64Encoding::R),
            (Register(_), Register(_)) => Some(X64Encoding::RR),
            (Register(_), Memory { .. }) => Some(X64Encoding::RM),
            (Memory { .. }, Register(_)) => Some(X64Encoding::MR),
            (Register(_), Immediate(_)) => Some(X64Encoding::RI),
            (Memory { .. }, Immediate(_)) => Some(X64Encoding::MI),
            (a, b) => bug!("illegal x64 operand combination `{:?}`, `{:?}`", a, b),
        }
    }

    pub fn has_memory(&self) -> bool {
        matches!(self, X64Encoding::RM | X64Encoding::MR | X64Encoding::MI)
    }

    pub fn has_immediate(&self) -> bool {
        matches!(self, X64Encoding::RI | X64Encoding::MI)
    }
}

impl Display for X64Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct X64Instruction {
    pub opcode: X64Opcode,
    pub op0: X64Operand,
    pub op1: X64Operand,

    /// Computed once from the operand kinds when the instruction is built.
    pub encoding: Option<X64Encoding>,
}

impl X64Instruction {
    pub fn new(opcode: X64Opcode, op0: X64Operand, op1: X64Operand) -> Self {
        let encoding = X64Encoding::classify(&op0, &op1);
        Self { opcode, op0, op1, encoding }
    }

    pub fn unary(opcode: X64Opcode, op0: X64Operand) -> Self {
        Self::new(opcode, op0, X64Operand::None)
    }

    pub fn nullary(opcode: X64Opcode) -> Self {
        Self::new(opcode, X64Operand::None, X64Operand::None)
    }
}

/// `(ENC) mnemonic op0, op1`
impl Display for X64Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = self.encoding.map(|enc| format!("({enc})")).unwrap_or_default();
        write!(f, "{tag:<5}{}", self.opcode.mnemonic())?;
        if !self.op0.is_none() {
            write!(f, " {}", self.op0)?;
        }
        if !self.op1.is_none() {
            write!(f, ", {}", self.op1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_classification() {
        let reg = X64Operand::virtual_reg(VReg(0));
        let mem = X64Operand::Memory { base: X64Register::RBP, disp: -4 };
        let imm = X64Operand::Immediate(7);

        assert_eq!(X64Instruction::nullary(X64Opcode::Ret).encoding, None);
        assert_eq!(X64Instruction::unary(X64Opcode::Push, reg).encoding, Some(X64Encoding::R));
        assert_eq!(X64Instruction::new(X64Opcode::Mov, reg, reg).encoding, Some(X64Encoding::RR));
        assert_eq!(X64Instruction::new(X64Opcode::Mov, reg, mem).encoding, Some(X64Encoding::RM));
        assert_eq!(X64Instruction::new(X64Opcode::Mov, mem, reg).encoding, Some(X64Encoding::MR));
        assert_eq!(X64Instruction::new(X64Opcode::Mov, reg, imm).encoding, Some(X64Encoding::RI));
        assert_eq!(X64Instruction::new(X64Opcode::Mov, mem, imm).encoding, Some(X64Encoding::MI));
    }

    #[test]
    #[should_panic(expected = "illegal x64 operand combination")]
    fn test_memory_to_memory_is_illegal() {
        let mem = X64Operand::Memory { base: X64Register::RBP, disp: -4 };
        X64Instruction::new(X64Opcode::Mov, mem, mem);
    }

    #[test]
    #[should_panic(expected = "illegal x64 operand combination")]
    fn test_immediate_destination_is_illegal() {
        X64Instruction::new(X64Opcode::Add, X64Operand::Immediate(1), X64Operand::Immediate(2));
    }

    #[test]
    fn test_instruction_display() {
        let eax = X64Operand::fixed(X64Register::RAX);
        let ecx = X64Operand::fixed(X64Register::RCX);
        let slot = X64Operand::Memory { base: X64Register::RBP, disp: -8 };

        assert_eq!(X64Instruction::new(X64Opcode::Mov, eax, ecx).to_string(), "(RR) mov eax, ecx");
        assert_eq!(X64Instruction::new(X64Opcode::Mov, slot, X64Operand::Immediate(10)).to_string(), "(MI) mov [rbp-8], 10");
        assert_eq!(X64Instruction::unary(X64Opcode::Push, X64Operand::fixed(X64Register::RBP)).to_string(), "(R)  push rbp");
        assert_eq!(X64Instruction::nullary(X64Opcode::Ret).to_string(), "     ret");
        assert_eq!(X64Instruction::new(X64Opcode::Add, X64Operand::virtual_reg(VReg(3)), eax).to_string(), "(RR) add %r3, eax");
    }
}
