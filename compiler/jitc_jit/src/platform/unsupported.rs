// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use std::ptr::NonNull;

use crate::error::JitError;

pub(crate) fn page_size() -> usize {
    4096
}

pub(crate) fn map_writable(_len: usize) -> Result<NonNull<u8>, JitError> {
    Err(JitError::UnsupportedHost)
}

pub(crate) fn protect_executable(_ptr: NonNull<u8>, _len: usize) -> Result<(), JitError> {
    Err(JitError::UnsupportedHost)
}

pub(crate) fn unmap(_ptr: NonNull<u8>, _len: usize) -> Result<(), JitError> {
    Ok(())
}
