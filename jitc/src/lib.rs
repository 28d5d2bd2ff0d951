// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

pub mod compiler;
pub mod options;

pub use compiler::{CompiledUnit, CompilerPipeline, RunReport};
pub use options::{PipelineOptions, PipelineOptionsBuilder};

use jitc_errors::CompileResult;

/// Parses, compiles and runs `source` with default options.
pub fn run_source(source: &str) -> CompileResult<RunReport> {
    let arena = typed_arena::Arena::new();
    let mut pipeline = CompilerPipeline::new(&arena, PipelineOptions::default());
    pipeline.run(source)
}
