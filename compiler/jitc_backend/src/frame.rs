// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use jitc_target::X64Register;

use crate::instruction::{X64Instruction, X64Opcode, X64Operand};

/// Wraps allocated code in a prologue and an epilogue before every `ret`,
/// so the host's callee-saved registers and frame survive the call.
///
/// `frame_size` is the already aligned number of bytes to reserve below
/// `rbp`.
pub fn insert_frame(body: Vec<X64Instruction>, frame_size: i32, saved: &[X64Register]) -> Vec<X64Instruction> {
    let rbp = X64Operand::fixed(X64Register::RBP);
    let rsp = X64Operand::fixed(X64Register::RSP);

    let mut out = Vec::with_capacity(body.len() + 2 * saved.len() + 6);
    for reg in saved {
        out.push(X64Instruction::unary(X64Opcode::Push, X64Operand::fixed(*reg)));
    }
    out.push(X64Instruction::unary(X64Opcode::Push, rbp));
    out.push(X64Instruction::new(X64Opcode::Mov, rbp, rsp));
    if frame_size > 0 {
        out.push(X64Instruction::new(X64Opcode::Sub, rsp, X64Operand::Immediate(frame_size)));
    }

    for instr in body {
        if instr.opcode == X64Opcode::Ret {
            out.push(X64Instruction::new(X64Opcode::Mov, rsp, rbp));
            out.push(X64Instruction::unary(X64Opcode::Pop, rbp));
            for reg in saved.iter().rev() {
                out.push(X64Instruction::unary(X64Opcode::Pop, X64Operand::fixed(*reg)));
            }
        }
        out.push(instr);
    }
    out
}
