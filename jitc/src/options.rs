// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

/// What a pipeline run prints and does after compiling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    pub dump_bytecode: bool,
    pub dump_x64: bool,
    pub dump_machine_code: bool,

    /// Run the machine code in-process.
    pub execute: bool,

    /// Evaluate with the interpreter as well and fail on a different result.
    pub cross_check: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            dump_bytecode: false,
            dump_x64: false,
            dump_machine_code: false,
            execute: true,
            cross_check: true,
        }
    }
}

#[derive(Debug, Default)]
pub struct PipelineOptionsBuilder {
    dump_bytecode: Option<bool>,
    dump_x64: Option<bool>,
    dump_machine_code: Option<bool>,
    execute: Option<bool>,
    cross_check: Option<bool>,
}

impl PipelineOptionsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dump_bytecode(mut self, enabled: bool) -> Self {
        self.dump_bytecode = Some(enabled);
        self
    }

    pub fn dump_x64(mut self, enabled: bool) -> Self {
        self.dump_x64 = Some(enabled);
        self
    }

    pub fn dump_machine_code(mut self, enabled: bool) -> Self {
        self.dump_machine_code = Some(enabled);
        self
    }

    /// Shorthand for enabling every dump.
    pub fn dump_all(self) -> Self {
        self.dump_bytecode(true).dump_x64(true).dump_machine_code(true)
    }

    pub fn execute(mut self, enabled: bool) -> Self {
        self.execute = Some(enabled);
        self
    }

    pub fn cross_check(mut self, enabled: bool) -> Self {
        self.cross_check = Some(enabled);
        self
    }

    pub fn build(self) -> PipelineOptions {
        let defaults = PipelineOptions::default();
        PipelineOptions {
            dump_bytecode: self.dump_bytecode.unwrap_or(defaults.dump_bytecode),
            dump_x64: self.dump_x64.unwrap_or(defaults.dump_x64),
            dump_machine_code: self.dump_machine_code.unwrap_or(defaults.dump_machine_code),
            execute: self.execute.unwrap_or(defaults.execute),
            cross_check: self.cross_check.unwrap_or(defaults.cross_check),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_defaults_for_unset_fields() {
        let options = PipelineOptionsBuilder::new().dump_x64(true).execute(false).build();
        assert!(options.dump_x64);
        assert!(!options.dump_bytecode);
        assert!(!options.execute);
        assert!(options.cross_check);
    }

    #[test]
    fn test_dump_all() {
        let options = PipelineOptionsBuilder::new().dump_all().build();
        assert!(options.dump_bytecode && options.dump_x64 && options.dump_machine_code);
    }
}
