// SPDX-License-Identifier: MIT
// Copyright (c) 2023 Kagati Foundation

use jitc_ast::{Ast, NodeId};
use jitc_backend::{MachineCode, X64Function};
use jitc_bytecode::{dump_instructions, BcBuilder, BcInstruction, BcOpcode};
use jitc_errors::{CompileError, CompileResult};
use jitc_interp::Interpreter;
use jitc_types::{StringInterner, Symbol, Value};

use crate::options::PipelineOptions;

/// Everything produced by compiling one unit.
#[derive(Debug, Clone)]
pub struct CompiledUnit {
    pub bytecode: Vec<BcInstruction>,
    pub x64: X64Function,
    pub machine_code: MachineCode,
}

impl CompiledUnit {
    pub fn bytecode_dump(&self) -> String {
        dump_instructions(&self.bytecode)
    }

    pub fn x64_dump(&self) -> String {
        self.x64.dump()
    }

    pub fn machine_code_dump(&self) -> String {
        self.machine_code.to_string()
    }
}

#[derive(Debug, Clone)]
pub struct RunReport {
    pub unit: CompiledUnit,

    /// Interpreter result, when cross-checking.
    pub interpreted: Option<Value>,

    /// Native result, when executing.
    pub executed: Option<i32>,
}

impl RunReport {
    /// Native result if the code ran, the interpreter's otherwise.
    pub fn result(&self) -> Option<i32> {
        self.executed.or_else(|| self.interpreted.and_then(|v| v.as_integer()))
    }
}

/// Owns the interner and AST of one compilation unit and drives it through
/// every stage.
pub struct CompilerPipeline<'tcx> {
    pub interner: StringInterner<'tcx>,
    pub ast: Ast,
    options: PipelineOptions,
    bindings: Vec<(Symbol, Value)>,
}

impl<'tcx> CompilerPipeline<'tcx> {
    pub fn new(arena: &'tcx typed_arena::Arena<String>, options: PipelineOptions) -> Self {
        Self {
            interner: StringInterner::new(arena),
            ast: Ast::new(),
            options,
            bindings: vec![],
        }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Binds `name` before the program starts, for both the interpreter and
    /// native code.
    pub fn bind(&mut self, name: &str, value: Value) {
        let symbol = self.interner.intern(name);
        self.bindings.push((symbol, value));
    }

    pub fn parse(&mut self, source: &str) -> CompileResult<NodeId> {
        jitc_parser::parse_program(source, &mut self.ast, &self.interner)
    }

    pub fn interpret(&self, root: NodeId) -> CompileResult<Value> {
        let mut interp = Interpreter::with_bindings(self.bindings.iter().copied());
        interp.eval(&self.ast, root, &self.interner)
    }

    /// Bindings are stored into their slots ahead of the program itself.
    pub fn build_bytecode(&self, root: NodeId) -> CompileResult<BcBuilder> {
        let mut builder = BcBuilder::new();
        for (symbol, value) in &self.bindings {
            let Some(value) = value.as_integer() else {
                return Err(CompileError::NonIntegerBinding {
                    name: self.interner.lookup(*symbol).map_or_else(|| symbol.to_string(), str::to_string),
                });
            };
            builder.build_binding(*symbol, value);
        }
        builder.build_expression(&self.ast, root);
        log::debug!(
            "bytecode: {} instructions, {} locals",
            builder.instructions().len(),
            builder.locals().len()
        );
        Ok(builder)
    }

    pub fn compile(&self, root: NodeId) -> CompileResult<CompiledUnit> {
        let builder = self.build_bytecode(root)?;
        if !builder.instructions().iter().any(|instr| instr.opcode == BcOpcode::Return) {
            return Err(CompileError::EmptyProgram);
        }

        let x64 = X64Function::lower(builder.instructions())?;
        let machine_code = x64.encode();
        log::debug!(
            "compile: {} x64 instructions, frame {} bytes, {} bytes of code",
            x64.instructions.len(),
            x64.frame_size,
            machine_code.size()
        );

        Ok(CompiledUnit {
            bytecode: builder.instructions().to_vec(),
            x64,
            machine_code,
        })
    }

    /// Parse, compile, then optionally dump, interpret and execute.
    pub fn run(&mut self, source: &str) -> CompileResult<RunReport> {
        let root = self.parse(source)?;
        let unit = self.compile(root)?;

        if self.options.dump_bytecode {
            println!("-- bytecode --\n{}", unit.bytecode_dump());
        }
        if self.options.dump_x64 {
            println!("-- x64 --\n{}", unit.x64_dump());
        }
        if self.options.dump_machine_code {
            println!("-- machine code ({} bytes) --\n{}", unit.machine_code.size(), unit.machine_code_dump());
        }

        // interpret first: a program the interpreter rejects would read
        // uninitialized stack natively
        let interpreted = if self.options.cross_check {
            Some(self.interpret(root)?)
        } else {
            None
        };

        let executed = if self.options.execute {
            // SAFETY: the encoder emits one complete function with its own
            // frame that restores every callee-saved register it touches and
            // returns an i32 in eax.
            let result = unsafe { jitc_jit::execute(unit.machine_code.as_bytes()) }?;
            Some(result)
        } else {
            None
        };

        if let (Some(Value::Integer(interpreted)), Some(executed)) = (interpreted, executed) {
            if interpreted != executed {
                return Err(CompileError::ResultMismatch { interpreted, executed });
            }
        }

        Ok(RunReport { unit, interpreted, executed })
    }
}
