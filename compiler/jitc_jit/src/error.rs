// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use jitc_errors::CompileError;

#[derive(Debug, thiserror::Error)]
pub enum JitError {
    #[error("cannot execute an empty code buffer")]
    EmptyCode,

    #[error("{len} bytes of code do not fit in a {capacity} byte region")]
    CodeTooLarge { len: usize, capacity: usize },

    #[error("{call} failed: {source}")]
    Os {
        call: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("native execution is only supported on x86-64 hosts")]
    UnsupportedHost,
}

impl JitError {
    pub(crate) fn last_os_error(call: &'static str) -> Self {
        JitError::Os { call, source: std::io::Error::last_os_error() }
    }
}

impl From<JitError> for CompileError {
    fn from(err: JitError) -> Self {
        let (call, errno) = match &err {
            JitError::Os { call, source } => (Some(*call), source.raw_os_error()),
            _ => (None, None),
        };
        CompileError::Jit { message: err.to_string(), call, errno }
    }
}
