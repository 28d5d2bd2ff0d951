// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::fmt::Display;

use jitc_utils::bug;

/// x86-64 general purpose register. The discriminant is the 3-bit number
/// used in ModRM fields and `+r` opcodes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum X64Register {
    RAX = 0,
    RCX = 1,
    RDX = 2,
    RBX = 3,
    RSP = 4,
    RBP = 5,
    RSI = 6,
    RDI = 7,
}

impl X64Register {
    pub fn encoding(&self) -> u8 {
        *self as u8
    }

    /// Values are 32 bits wide; only the frame registers are named by
    /// their 64-bit form.
    pub fn name(&self) -> &'static str {
        match self {
            X64Register::RAX => "eax",
            X64Register::RCX => "ecx",
            X64Register::RDX => "edx",
            X64Register::RBX => "ebx",
            X64Register::RSP => "rsp",
            X64Register::RBP => "rbp",
            X64Register::RSI => "esi",
            X64Register::RDI => "edi",
        }
    }

    /// Registers a called function must restore before returning (SysV and
    /// Win64 agree on these three).
    pub fn is_callee_saved(&self) -> bool {
        matches!(self, X64Register::RBX | X64Register::RSI | X64Register::RDI)
    }

    /// Registers that hold the frame and must only be used in their 64-bit
    /// form.
    pub fn is_frame_register(&self) -> bool {
        matches!(self, X64Register::RSP | X64Register::RBP)
    }
}

impl Display for X64Register {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Allocation order of the free pool: `pop` hands out rax first.
const ALLOCATABLE_REGISTERS: [X64Register; 6] = [
    X64Register::RDI,
    X64Register::RSI,
    X64Register::RBX,
    X64Register::RDX,
    X64Register::RCX,
    X64Register::RAX,
];

/// Ordered stack of free physical registers. Freed registers are pushed
/// back on top, so the most recently released one is reused first.
#[derive(Debug, Clone)]
pub struct RegisterPool {
    free: Vec<X64Register>,
}

impl Default for RegisterPool {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterPool {
    pub fn new() -> Self {
        Self { free: ALLOCATABLE_REGISTERS.to_vec() }
    }

    /// Total number of registers the pool manages.
    pub fn capacity() -> usize {
        ALLOCATABLE_REGISTERS.len()
    }

    pub fn pop(&mut self) -> Option<X64Register> {
        self.free.pop()
    }

    pub fn free(&mut self, reg: X64Register) {
        if !ALLOCATABLE_REGISTERS.contains(&reg) {
            bug!("register {} is not managed by the allocation pool", reg);
        }
        if self.is_free(reg) {
            bug!("register {} freed twice", reg);
        }
        self.free.push(reg);
    }

    pub fn is_free(&self, reg: X64Register) -> bool {
        self.free.contains(&reg)
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }
}
