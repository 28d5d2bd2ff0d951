// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod encoder;
pub mod frame;
pub mod instruction;
pub mod machine_code;
pub mod regalloc;
pub mod selector;

pub use encoder::encode;
pub use instruction::*;
pub use machine_code::MachineCode;
pub use regalloc::{Allocation, RegisterAllocator};
pub use selector::X64Builder;

use itertools::Itertools;

use jitc_bytecode::BcInstruction;
use jitc_errors::CompileResult;

/// Allocated x64 code of one unit, frame included.
#[derive(Debug, Clone)]
pub struct X64Function {
    pub instructions: Vec<X64Instruction>,
    pub frame_size: i32,
    pub allocation: Allocation,
}

impl X64Function {
    /// Selects, allocates and frames `bytecode`.
    pub fn lower(bytecode: &[BcInstruction]) -> CompileResult<Self> {
        let mut builder = X64Builder::new();
        builder.lower_all(bytecode)?;
        let frame_size = builder.frame_size();

        let mut body = builder.into_instructions();
        let allocation = RegisterAllocator::new().allocate(&mut body);
        let instructions = frame::insert_frame(body, frame_size, &allocation.callee_saved());

        Ok(Self { instructions, frame_size, allocation })
    }

    pub fn encode(&self) -> MachineCode {
        encode(&self.instructions)
    }

    /// One instruction per line, `(ENC) mnemonic op0, op1`.
    pub fn dump(&self) -> String {
        self.instructions.iter().map(|instr| instr.to_string()).join("\n")
    }
}

#[cfg(test)]
mod tests {
    use jitc_bytecode::{BcInstruction, BcOpcode, BcOperand, BcType, VReg};

    use super::X64Function;

    fn slot(id: u32) -> BcOperand {
        BcOperand::Register { id: VReg(id), ty: BcType::S32Ptr }
    }

    fn value(id: u32) -> BcOperand {
        BcOperand::Register { id: VReg(id), ty: BcType::S32 }
    }

    fn imm(v: i32) -> BcOperand {
        BcOperand::Immediate { value: v, ty: BcType::S32 }
    }

    /// `x = 10; x + 5;`
    fn assign_then_add() -> Vec<BcInstruction> {
        vec![
            BcInstruction::new(BcOpcode::Push, slot(0), BcOperand::Immediate { value: 4, ty: BcType::S32Ptr }, BcOperand::None),
            BcInstruction::new(BcOpcode::Store, BcOperand::None, slot(0), imm(10)),
            BcInstruction::new(BcOpcode::Load, value(1), slot(0), BcOperand::None),
            BcInstruction::new(BcOpcode::Add, value(2), value(1), imm(5)),
            BcInstruction::new(BcOpcode::Return, BcOperand::None, value(2), BcOperand::None),
        ]
    }

    #[test]
    fn test_lowered_listing() {
        let func = X64Function::lower(&assign_then_add()).unwrap();
        assert_eq!(func.frame_size, 16);
        assert_eq!(
            func.dump(),
            "(R)  push rbp\n\
             (RR) mov rbp, rsp\n\
             (RI) sub rsp, 16\n\
             (MI) mov [rbp-4], 10\n\
             (RM) mov eax, [rbp-4]\n\
             (RR) mov ecx, eax\n\
             (RI) add ecx, 5\n\
             (RR) mov eax, ecx\n\
             (RR) mov rsp, rbp\n\
             (R)  pop rbp\n     ret"
        );
    }

    #[test]
    fn test_machine_code_bytes() {
        let code = X64Function::lower(&assign_then_add()).unwrap().encode();
        assert_eq!(
            code.as_bytes(),
            &[
                0x55, 0x48, 0x8B, 0xEC, 0x48, 0x81, 0xEC, 0x10, 0x00, 0x00, 0x00, 0xC7, 0x85, 0xFC, 0xFF,
                0xFF, 0xFF, 0x0A, 0x00, 0x00, 0x00, 0x8B, 0x85, 0xFC, 0xFF, 0xFF, 0xFF, 0x8B, 0xC8, 0x81,
                0xC1, 0x05, 0x00, 0x00, 0x00, 0x8B, 0xC1, 0x48, 0x8B, 0xE5, 0x5D, 0xC3,
            ]
        );
        assert_eq!(
            code.to_string(),
            "55 48 8B EC 48 81 EC 10 00 00 00 C7 85 FC FF FF\n\
             FF 0A 00 00 00 8B 85 FC FF FF FF 8B C8 81 C1 05\n\
             00 00 00 8B C1 48 8B E5 5D C3"
        );
    }

    #[test]
    fn test_frame_without_locals_skips_stack_reservation() {
        let bytecode = vec![BcInstruction::new(BcOpcode::Return, BcOperand::None, imm(42), BcOperand::None)];
        let code = X64Function::lower(&bytecode).unwrap().encode();
        assert_eq!(
            code.as_bytes(),
            &[0x55, 0x48, 0x8B, 0xEC, 0xC7, 0xC0, 0x2A, 0x00, 0x00, 0x00, 0x48, 0x8B, 0xE5, 0x5D, 0xC3]
        );
    }
}
