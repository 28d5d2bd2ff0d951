// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

mod error;
mod platform;
mod region;

pub use error::JitError;
pub use region::{ExecutableRegion, HostMemory, JitMemory, WritableRegion};

/// Runs machine code in-process: map writable, copy, flip to executable,
/// call, unmap.
#[derive(Debug, Default)]
pub struct JitLoader<M: JitMemory = HostMemory> {
    memory: M,
}

impl<M: JitMemory> JitLoader<M> {
    pub fn new(memory: M) -> Self {
        Self { memory }
    }

    /// # Safety
    /// `code` must be a complete x86-64 function following the host C
    /// calling convention that takes no arguments and returns an `i32`.
    pub unsafe fn execute(&self, code: &[u8]) -> Result<i32, JitError> {
        if code.is_empty() {
            return Err(JitError::EmptyCode);
        }
        if !cfg!(target_arch = "x86_64") {
            return Err(JitError::UnsupportedHost);
        }

        let mut region = self.memory.allocate_writable(code.len())?;
        region.write(code)?;
        let region = self.memory.make_executable(region)?;
        log::debug!("jit: calling {} bytes ({} mapped)", code.len(), region.len());

        let result = region.call();
        drop(region);
        log::debug!("jit: returned {}", result);
        Ok(result)
    }
}

/// Executes `code` with memory from the host operating system.
///
/// # Safety
/// Same contract as [`JitLoader::execute`].
pub unsafe fn execute(code: &[u8]) -> Result<i32, JitError> {
    JitLoader::new(HostMemory).execute(code)
}
