// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::ptr::NonNull;

use crate::error::JitError;
use crate::platform;

/// Owned page mapping; unmapped when dropped.
#[derive(Debug)]
struct RawRegion {
    ptr: NonNull<u8>,
    len: usize,
}

impl Drop for RawRegion {
    fn drop(&mut self) {
        if let Err(err) = platform::unmap(self.ptr, self.len) {
            log::warn!("jit: leaking {} byte region: {}", self.len, err);
        }
    }
}

/// Freshly mapped memory that can be written but not executed.
#[derive(Debug)]
pub struct WritableRegion {
    raw: RawRegion,
}

impl WritableRegion {
    pub fn len(&self) -> usize {
        self.raw.len
    }

    pub fn is_empty(&self) -> bool {
        self.raw.len == 0
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        // SAFETY: the mapping is `len` bytes long, readable and writable, and
        // exclusively owned by this region.
        unsafe { std::slice::from_raw_parts_mut(self.raw.ptr.as_ptr(), self.raw.len) }
    }

    /// Copies `code` to the start of the region.
    pub fn write(&mut self, code: &[u8]) -> Result<(), JitError> {
        if code.len() > self.len() {
            return Err(JitError::CodeTooLarge { len: code.len(), capacity: self.len() });
        }
        self.as_mut_slice()[..code.len()].copy_from_slice(code);
        Ok(())
    }
}

/// Memory that can only be executed. Obtainable only by giving up a
/// [`WritableRegion`].
#[derive(Debug)]
pub struct ExecutableRegion {
    raw: RawRegion,
}

type EntryPoint = unsafe extern "C" fn() -> i32;

impl ExecutableRegion {
    pub fn len(&self) -> usize {
        self.raw.len
    }

    pub fn is_empty(&self) -> bool {
        self.raw.len == 0
    }

    /// Calls the start of the region as `extern "C" fn() -> i32`.
    ///
    /// # Safety
    /// The region must hold a complete function that follows the host C
    /// calling convention and returns a 32-bit integer in `eax`.
    pub unsafe fn call(&self) -> i32 {
        let entry: EntryPoint = std::mem::transmute::<*mut u8, EntryPoint>(self.raw.ptr.as_ptr());
        entry()
    }
}

/// The two capabilities executable memory is built from.
pub trait JitMemory {
    fn allocate_writable(&self, size: usize) -> Result<WritableRegion, JitError>;

    fn make_executable(&self, region: WritableRegion) -> Result<ExecutableRegion, JitError>;
}

/// Pages obtained from the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostMemory;

impl HostMemory {
    pub fn page_size(&self) -> usize {
        platform::page_size()
    }
}

impl JitMemory for HostMemory {
    fn allocate_writable(&self, size: usize) -> Result<WritableRegion, JitError> {
        let page = platform::page_size();
        let len = size.max(1).div_ceil(page) * page;
        let ptr = platform::map_writable(len)?;
        Ok(WritableRegion { raw: RawRegion { ptr, len } })
    }

    fn make_executable(&self, region: WritableRegion) -> Result<ExecutableRegion, JitError> {
        let raw = region.raw;
        platform::protect_executable(raw.ptr, raw.len)?;
        Ok(ExecutableRegion { raw })
    }
}
