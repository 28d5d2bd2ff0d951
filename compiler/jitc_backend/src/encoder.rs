// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::collections::HashMap;

use lazy_static::lazy_static;

use jitc_target::X64Register;
use jitc_utils::bug;

use crate::instruction::{X64Encoding, X64Instruction, X64Opcode, X64Operand};
use crate::machine_code::MachineCode;

const REX_W: u8 = 0x48;

const MOD_INDIRECT_DISP32: u8 = 0b10;
const MOD_DIRECT: u8 = 0b11;

/// How the ModRM byte (if any) of a table entry is formed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModRm {
    /// No ModRM; the opcode is the whole instruction.
    None,

    /// Register number added to the last opcode byte.
    PlusReg,

    /// `reg` names a register operand; `rm` names the other operand.
    Reg,

    /// `reg` holds an opcode extension; `rm` names op0.
    Ext(u8),

    /// Both `reg` and `rm` name op0 (three-operand `imul r, r, imm`).
    RegSelf,
}

#[derive(Debug, Clone, Copy)]
struct OpcodeEntry {
    opcode: &'static [u8],
    modrm: ModRm,
}

const fn entry(opcode: &'static [u8], modrm: ModRm) -> OpcodeEntry {
    OpcodeEntry { opcode, modrm }
}

type EncodingKey = (X64Opcode, Option<X64Encoding>);

lazy_static! {
    static ref OPCODE_TABLE: HashMap<EncodingKey, OpcodeEntry> = {
        use X64Encoding::*;
        let mut table: HashMap<EncodingKey, OpcodeEntry> = HashMap::new();

        table.insert((X64Opcode::Mov, Some(MR)), entry(&[0x89], ModRm::Reg));
        table.insert((X64Opcode::Mov, Some(RR)), entry(&[0x8B], ModRm::Reg));
        table.insert((X64Opcode::Mov, Some(RM)), entry(&[0x8B], ModRm::Reg));
        table.insert((X64Opcode::Mov, Some(RI)), entry(&[0xC7], ModRm::Ext(0)));
        table.insert((X64Opcode::Mov, Some(MI)), entry(&[0xC7], ModRm::Ext(0)));

        table.insert((X64Opcode::Add, Some(MR)), entry(&[0x01], ModRm::Reg));
        table.insert((X64Opcode::Add, Some(RR)), entry(&[0x03], ModRm::Reg));
        table.insert((X64Opcode::Add, Some(RM)), entry(&[0x03], ModRm::Reg));
        table.insert((X64Opcode::Add, Some(RI)), entry(&[0x81], ModRm::Ext(0)));
        table.insert((X64Opcode::Add, Some(MI)), entry(&[0x81], ModRm::Ext(0)));

        table.insert((X64Opcode::Sub, Some(MR)), entry(&[0x29], ModRm::Reg));
        table.insert((X64Opcode::Sub, Some(RR)), entry(&[0x2B], ModRm::Reg));
        table.insert((X64Opcode::Sub, Some(RM)), entry(&[0x2B], ModRm::Reg));
        table.insert((X64Opcode::Sub, Some(RI)), entry(&[0x81], ModRm::Ext(5)));
        table.insert((X64Opcode::Sub, Some(MI)), entry(&[0x81], ModRm::Ext(5)));

        table.insert((X64Opcode::Imul, Some(RR)), entry(&[0x0F, 0xAF], ModRm::Reg));
        table.insert((X64Opcode::Imul, Some(RM)), entry(&[0x0F, 0xAF], ModRm::Reg));
        table.insert((X64Opcode::Imul, Some(RI)), entry(&[0x69], ModRm::RegSelf));

        table.insert((X64Opcode::Idiv, Some(R)), entry(&[0xF7], ModRm::Ext(7)));

        table.insert((X64Opcode::Push, Some(R)), entry(&[0x50], ModRm::PlusReg));
        table.insert((X64Opcode::Pop, Some(R)), entry(&[0x58], ModRm::PlusReg));

        table.insert((X64Opcode::Ret, None), entry(&[0xC3], ModRm::None));
        table.insert((X64Opcode::Noop, None), entry(&[0x90], ModRm::None));
        table
    };
}

/// Encodes fully allocated instructions. Output depends only on the input.
pub fn encode(instructions: &[X64Instruction]) -> MachineCode {
    let mut code = MachineCode::new();
    for instr in instructions {
        encode_instruction(instr, &mut code);
    }
    log::debug!("encoder: {} instructions -> {} bytes", instructions.len(), code.size());
    code
}

pub fn encode_instruction(instr: &X64Instruction, code: &mut MachineCode) {
    let Some(entry) = OPCODE_TABLE.get(&(instr.opcode, instr.encoding)) else {
        bug!("no encoding for `{}` with operand form {:?}", instr.opcode.mnemonic(), instr.encoding);
    };

    if entry.modrm == ModRm::PlusReg {
        let (last, prefix) = entry
            .opcode
            .split_last()
            .unwrap_or_else(|| bug!("empty opcode for `{}`", instr.opcode.mnemonic()));
        code.extend(prefix);
        code.push(last + register_of(&instr.op0).encoding());
        return;
    }

    if needs_rex_w(instr) {
        code.push(REX_W);
    }
    code.extend(entry.opcode);

    let Some(encoding) = instr.encoding else {
        return;
    };

    let mode = if encoding.has_memory() { MOD_INDIRECT_DISP32 } else { MOD_DIRECT };
    let (reg, rm) = match entry.modrm {
        ModRm::Reg => match encoding {
            X64Encoding::RR | X64Encoding::RM => (register_of(&instr.op0), base_of(&instr.op1)),
            X64Encoding::MR => (register_of(&instr.op1), base_of(&instr.op0)),
            other => bug!("register form used with {:?}", other),
        },
        ModRm::Ext(ext) => {
            code.push(modrm(mode, ext, base_of(&instr.op0).encoding()));
            emit_trailing(instr, encoding, code);
            return;
        }
        ModRm::RegSelf => (register_of(&instr.op0), register_of(&instr.op0)),
        ModRm::None | ModRm::PlusReg => unreachable!(),
    };
    code.push(modrm(mode, reg.encoding(), rm.encoding()));
    emit_trailing(instr, encoding, code);
}

/// Displacement first, then immediate.
fn emit_trailing(instr: &X64Instruction, encoding: X64Encoding, code: &mut MachineCode) {
    match encoding {
        X64Encoding::MR | X64Encoding::MI => code.push_i32(displacement_of(&instr.op0)),
        X64Encoding::RM => code.push_i32(displacement_of(&instr.op1)),
        _ => {}
    }
    if encoding.has_immediate() {
        match instr.op1 {
            X64Operand::Immediate(value) => code.push_i32(value),
            other => bug!("expected immediate operand, got {:?}", other),
        }
    }
}

fn modrm(mode: u8, reg: u8, rm: u8) -> u8 {
    (mode << 6) | ((reg & 0b111) << 3) | (rm & 0b111)
}

/// Frame registers only ever appear register-direct as 64-bit operands.
fn needs_rex_w(instr: &X64Instruction) -> bool {
    [instr.op0, instr.op1].iter().any(|op| {
        op.as_register()
            .and_then(|reg| reg.phys)
            .is_some_and(|reg| reg.is_frame_register())
    })
}

fn register_of(operand: &X64Operand) -> X64Register {
    match operand {
        X64Operand::Register(reg) => match reg.phys {
            Some(phys) => phys,
            None => bug!("register operand {} reached the encoder unallocated", operand),
        },
        other => bug!("expected register operand, got {:?}", other),
    }
}

/// Register named by the ModRM `rm` field: the register itself, or the base
/// of a memory operand.
fn base_of(operand: &X64Operand) -> X64Register {
    match operand {
        X64Operand::Memory { base: X64Register::RSP, .. } => {
            bug!("rsp-based memory operands need a SIB byte")
        }
        X64Operand::Memory { base, .. } => *base,
        _ => register_of(operand),
    }
}

fn displacement_of(operand: &X64Operand) -> i32 {
    match operand {
        X64Operand::Memory { disp, .. } => *disp,
        other => bug!("expected memory operand, got {:?}", other),
    }
}
