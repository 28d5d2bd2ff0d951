// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

//! Raw page-level memory primitives. Every platform-specific flag lives
//! below this module.

#[cfg(unix)]
mod unix;
#[cfg(unix)]
pub(crate) use unix::*;

#[cfg(windows)]
mod windows;
#[cfg(windows)]
pub(crate) use windows::*;

#[cfg(not(any(unix, windows)))]
mod unsupported;
#[cfg(not(any(unix, windows)))]
pub(crate) use unsupported::*;
