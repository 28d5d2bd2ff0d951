// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod x64;

pub use x64::{RegisterPool, X64Register};
