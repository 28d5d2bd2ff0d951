// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use jitc::{CompilerPipeline, PipelineOptionsBuilder};
use jitc_errors::diagnostic::Diagnostic;

const DEFAULT_SOURCE: &str = "x = 10; x + 5;";

fn main() {
    let source = std::env::args().nth(1).unwrap_or_else(|| DEFAULT_SOURCE.to_string());

    let arena = typed_arena::Arena::new();
    let options = PipelineOptionsBuilder::new().dump_all().build();
    let mut pipeline = CompilerPipeline::new(&arena, options);

    match pipeline.run(&source) {
        Ok(report) => {
            let result = report.result().unwrap_or_default();
            println!("-- result --\n{}", result);
            std::process::exit(result);
        }
        Err(err) => {
            Diagnostic::from_error(&err).report(&source);
            std::process::exit(1);
        }
    }
}
