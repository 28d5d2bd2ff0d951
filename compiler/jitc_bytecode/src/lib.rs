// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod builder;
mod instruction;
mod vreg;

pub use builder::BcBuilder;
pub use instruction::*;
pub use vreg::VReg;

use itertools::Itertools;

/// One instruction per line.
pub fn dump_instructions(instructions: &[BcInstruction]) -> String {
    instructions.iter().map(|instr| instr.to_string()).join("\n")
}
