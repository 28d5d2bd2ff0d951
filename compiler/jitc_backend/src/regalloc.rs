// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::collections::HashMap;

use indexmap::IndexMap;

use jitc_bytecode::VReg;
use jitc_target::{RegisterPool, X64Register};
use jitc_utils::bug;

use crate::instruction::{X64Instruction, X64Operand, X64RegOperand};

/// Outcome of one allocation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Allocation {
    /// Physical register given to each virtual register, in order of
    /// first definition.
    pub assignments: IndexMap<VReg, X64Register>,

    /// Highest number of virtual registers live at the same time.
    pub max_pressure: usize,
}

impl Allocation {
    /// Callee-saved registers the code clobbers, in encoding order.
    pub fn callee_saved(&self) -> Vec<X64Register> {
        let mut regs: Vec<X64Register> = self
            .assignments
            .values()
            .copied()
            .filter(|reg| reg.is_callee_saved())
            .collect();
        regs.sort();
        regs.dedup();
        regs
    }
}

/// Single forward pass, no spilling. `op0` may define a register; `op1` is
/// always a read. A register goes back to the pool after the instruction
/// holding its last occurrence.
#[derive(Debug, Default)]
pub struct RegisterAllocator {
    pool: RegisterPool,

    /// Live virtual registers and where they currently are.
    live: HashMap<VReg, X64Register>,
}

impl RegisterAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&mut self, instructions: &mut [X64Instruction]) -> Allocation {
        let last_use = Self::last_occurrences(instructions);
        let mut allocation = Allocation::default();

        for (idx, instr) in instructions.iter_mut().enumerate() {
            if let X64Operand::Register(reg) = &mut instr.op0 {
                self.assign_def(reg, &mut allocation);
            }
            if let X64Operand::Register(reg) = &mut instr.op1 {
                self.assign_use(reg);
            }
            allocation.max_pressure = allocation.max_pressure.max(self.live.len());

            for operand in [instr.op0, instr.op1] {
                let Some(X64RegOperand { vreg: Some(vreg), .. }) = operand.as_register().copied() else {
                    continue;
                };
                if last_use.get(&vreg) == Some(&idx) {
                    if let Some(phys) = self.live.remove(&vreg) {
                        self.pool.free(phys);
                    }
                }
            }
        }

        log::debug!(
            "regalloc: {} virtual registers, max pressure {}",
            allocation.assignments.len(),
            allocation.max_pressure
        );
        allocation
    }

    fn assign_def(&mut self, reg: &mut X64RegOperand, allocation: &mut Allocation) {
        let Some(vreg) = reg.vreg else {
            return;
        };
        if reg.is_allocated() {
            return;
        }
        let phys = match self.live.get(&vreg) {
            Some(phys) => *phys,
            None => {
                let Some(phys) = self.pool.pop() else {
                    bug!(
                        "ran out of physical registers while allocating {} ({} live, no spilling)",
                        vreg,
                        self.live.len()
                    );
                };
                self.live.insert(vreg, phys);
                allocation.assignments.insert(vreg, phys);
                phys
            }
        };
        reg.phys = Some(phys);
    }

    fn assign_use(&mut self, reg: &mut X64RegOperand) {
        let Some(vreg) = reg.vreg else {
            return;
        };
        match self.live.get(&vreg) {
            Some(phys) => reg.phys = Some(*phys),
            None => bug!("virtual register {} is read before it is defined", vreg),
        }
    }

    fn last_occurrences(instructions: &[X64Instruction]) -> HashMap<VReg, usize> {
        let mut last_use = HashMap::new();
        for (idx, instr) in instructions.iter().enumerate() {
            for operand in [&instr.op0, &instr.op1] {
                if let Some(X64RegOperand { vreg: Some(vreg), .. }) = operand.as_register() {
                    last_use.insert(*vreg, idx);
                }
            }
        }
        last_use
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use jitc_bytecode::VReg;
    use jitc_target::X64Register;

    use super::RegisterAllocator;
    use crate::instruction::{X64Instruction, X64Opcode, X64Operand};

    fn vr(id: u32) -> X64Operand {
        X64Operand::virtual_reg(VReg(id))
    }

    fn mov(a: X64Operand, b: X64Operand) -> X64Instruction {
        X64Instruction::new(X64Opcode::Mov, a, b)
    }

    fn phys(operand: &X64Operand) -> Option<X64Register> {
        operand.as_register().and_then(|reg| reg.phys)
    }

    #[test]
    fn test_allocates_in_pool_order_and_reuses_freed() {
        let slot = X64Operand::Memory { base: X64Register::RBP, disp: -4 };
        let mut instrs = vec![
            mov(vr(1), slot),
            mov(vr(2), vr(1)),
            X64Instruction::new(X64Opcode::Add, vr(2), X64Operand::Immediate(5)),
            mov(X64Operand::fixed(X64Register::RAX), vr(2)),
            X64Instruction::nullary(X64Opcode::Ret),
        ];

        let allocation = RegisterAllocator::new().allocate(&mut instrs);

        assert_eq!(phys(&instrs[0].op0), Some(X64Register::RAX));
        assert_eq!(phys(&instrs[1].op0), Some(X64Register::RCX));
        assert_eq!(phys(&instrs[1].op1), Some(X64Register::RAX));
        assert_eq!(phys(&instrs[2].op0), Some(X64Register::RCX));
        assert_eq!(phys(&instrs[3].op1), Some(X64Register::RCX));
        assert_eq!(allocation.max_pressure, 2);
        assert!(allocation.callee_saved().is_empty());
    }

    #[test]
    fn test_dead_definition_releases_register() {
        let mut instrs = vec![
            mov(vr(0), X64Operand::Immediate(1)),
            mov(vr(1), X64Operand::Immediate(2)),
            mov(vr(2), vr(1)),
        ];
        RegisterAllocator::new().allocate(&mut instrs);

        // r0 dies right away, so r1 reuses rax
        assert_eq!(phys(&instrs[0].op0), Some(X64Register::RAX));
        assert_eq!(phys(&instrs[1].op0), Some(X64Register::RAX));
        assert_eq!(phys(&instrs[2].op0), Some(X64Register::RCX));
    }

    #[test]
    fn test_no_two_live_registers_share_a_physical_register() {
        let mut instrs = vec![];
        for id in 0..5 {
            instrs.push(mov(vr(id), X64Operand::Immediate(id as i32)));
        }
        for id in 0..4 {
            instrs.push(X64Instruction::new(X64Opcode::Add, vr(id + 10), vr(id)));
            instrs.push(X64Instruction::new(X64Opcode::Add, vr(id + 10), vr(id + 1)));
        }
        let mut first = HashMap::new();
        let mut last = HashMap::new();
        for (idx, instr) in instrs.iter().enumerate() {
            for op in [instr.op0, instr.op1] {
                if let Some(vreg) = op.as_register().and_then(|r| r.vreg) {
                    first.entry(vreg).or_insert(idx);
                    last.insert(vreg, idx);
                }
            }
        }

        let allocation = RegisterAllocator::new().allocate(&mut instrs);

        for (a, pa) in &allocation.assignments {
            for (b, pb) in &allocation.assignments {
                let overlap = first[a] <= last[b] && first[b] <= last[a];
                if a != b && overlap {
                    assert_ne!(pa, pb, "{a} and {b} are live together");
                }
            }
        }
    }

    #[test]
    fn test_callee_saved_registers_are_reported() {
        let mut instrs = vec![];
        for id in 0..6 {
            instrs.push(mov(vr(id), X64Operand::Immediate(id as i32)));
        }
        for id in 0..5 {
            instrs.push(X64Instruction::new(X64Opcode::Add, vr(5), vr(id)));
        }
        let allocation = RegisterAllocator::new().allocate(&mut instrs);

        assert_eq!(allocation.max_pressure, 6);
        assert_eq!(
            allocation.callee_saved(),
            vec![X64Register::RBX, X64Register::RSI, X64Register::RDI]
        );
    }

    #[test]
    #[should_panic(expected = "ran out of physical registers")]
    fn test_pool_exhaustion_is_fatal() {
        let mut instrs = vec![];
        for id in 0..7 {
            instrs.push(mov(vr(id), X64Operand::Immediate(id as i32)));
        }
        for id in 0..6 {
            instrs.push(X64Instruction::new(X64Opcode::Add, vr(6), vr(id)));
        }
        RegisterAllocator::new().allocate(&mut instrs);
    }

    #[test]
    #[should_panic(expected = "read before it is defined")]
    fn test_read_of_undefined_register_is_a_bug() {
        let mut instrs = vec![mov(X64Operand::fixed(X64Register::RAX), vr(9))];
        RegisterAllocator::new().allocate(&mut instrs);
    }
}
