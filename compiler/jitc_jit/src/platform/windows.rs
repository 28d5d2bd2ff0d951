// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::ptr::NonNull;

use windows_sys::Win32::System::Memory::{
    VirtualAlloc, VirtualFree, VirtualProtect, MEM_COMMIT, MEM_RELEASE, MEM_RESERVE, PAGE_EXECUTE,
    PAGE_PROTECTION_FLAGS, PAGE_READWRITE,
};
use windows_sys::Win32::System::SystemInformation::{GetSystemInfo, SYSTEM_INFO};

use crate::error::JitError;

pub(crate) fn page_size() -> usize {
    let mut info: SYSTEM_INFO = unsafe { std::mem::zeroed() };
    unsafe { GetSystemInfo(&mut info) };
    if info.dwPageSize == 0 {
        4096
    } else {
        info.dwPageSize as usize
    }
}

pub(crate) fn map_writable(len: usize) -> Result<NonNull<u8>, JitError> {
    let ptr = unsafe { VirtualAlloc(std::ptr::null(), len, MEM_COMMIT | MEM_RESERVE, PAGE_READWRITE) };
    NonNull::new(ptr as *mut u8).ok_or_else(|| JitError::last_os_error("VirtualAlloc"))
}

pub(crate) fn protect_executable(ptr: NonNull<u8>, len: usize) -> Result<(), JitError> {
    let mut old: PAGE_PROTECTION_FLAGS = 0;
    let ok = unsafe { VirtualProtect(ptr.as_ptr() as *const _, len, PAGE_EXECUTE, &mut old) };
    if ok == 0 {
        return Err(JitError::last_os_error("VirtualProtect"));
    }
    Ok(())
}

pub(crate) fn unmap(ptr: NonNull<u8>, _len: usize) -> Result<(), JitError> {
    let ok = unsafe { VirtualFree(ptr.as_ptr() as *mut _, 0, MEM_RELEASE) };
    if ok == 0 {
        return Err(JitError::last_os_error("VirtualFree"));
    }
    Ok(())
}
