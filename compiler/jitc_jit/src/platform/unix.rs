// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::ptr::NonNull;

use crate::error::JitError;

pub(crate) fn page_size() -> usize {
    let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
    if size <= 0 {
        4096
    } else {
        size as usize
    }
}

/// Maps `len` bytes of private, zeroed, read-write memory.
pub(crate) fn map_writable(len: usize) -> Result<NonNull<u8>, JitError> {
    let ptr = unsafe {
        libc::mmap(
            std::ptr::null_mut(),
            len,
            libc::PROT_READ | libc::PROT_WRITE,
            libc::MAP_ANON | libc::MAP_PRIVATE,
            -1,
            0,
        )
    };
    if ptr == libc::MAP_FAILED {
        return Err(JitError::last_os_error("mmap"));
    }
    NonNull::new(ptr as *mut u8).ok_or_else(|| JitError::last_os_error("mmap"))
}

/// Drops write access and grants execute access.
pub(crate) fn protect_executable(ptr: NonNull<u8>, len: usize) -> Result<(), JitError> {
    let rc = unsafe { libc::mprotect(ptr.as_ptr() as *mut libc::c_void, len, libc::PROT_EXEC) };
    if rc != 0 {
        return Err(JitError::last_os_error("mprotect"));
    }
    Ok(())
}

pub(crate) fn unmap(ptr: NonNull<u8>, len: usize) -> Result<(), JitError> {
    let rc = unsafe { libc::munmap(ptr.as_ptr() as *mut libc::c_void, len) };
    if rc != 0 {
        return Err(JitError::last_os_error("munmap"));
    }
    Ok(())
}
