//! Code generator context
//!
//! Holds the state shared by every `generate` call of one module: the
//! assembly being written, the register file, the loop stack and the
//! registers bound to variables.

use super::control::LoopStack;
use super::opcode::Opcode;
use super::register::{Register, RegisterAllocator, RegisterStats};
use crate::ast::NodeMeta;
use crate::config::CompilerConfig;
use crate::error::{CompileResult, CompilerError};
use crate::library::Builtins;
use crate::module::ModuleArtifacts;
use crate::symbols::{ScopeTree, VarDeclaration, VarId};
use crate::types::{TypeContext, TypeId, VmType};
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use std::fmt;

/// Read-only inputs of code generation
#[derive(Clone, Copy)]
pub struct CodegenEnv<'a> {
    pub types: &'a TypeContext,
    pub scopes: &'a ScopeTree,
    pub builtins: &'a Builtins,
    /// Modules compiled so far, by name
    pub artifacts: &'a FxHashMap<String, ModuleArtifacts>,
    pub config: &'a CompilerConfig,
    pub source: &'a str,
}

/// Output of one module's code generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedCode {
    pub lines: Vec<String>,
    /// Labels of the builtin routines called, in first-use order
    pub builtins: Vec<String>,
    pub stats: RegisterStats,
}

/// Code generator for one module
pub struct CodeGenerator<'a> {
    pub(crate) env: CodegenEnv<'a>,
    /// Module name, used for storage access and `$THIS_ADDRESS`
    module: String,
    output: Vec<String>,
    last_line: u32,
    registers: RegisterAllocator,
    pub(crate) loops: LoopStack,
    bindings: FxHashMap<VarId, Register>,
    used_builtins: Vec<String>,
    /// Exit label of the method being generated
    pub(crate) exit_label: Option<String>,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(env: CodegenEnv<'a>, module: &str) -> Self {
        Self {
            env,
            module: module.to_string(),
            output: Vec::new(),
            last_line: 0,
            registers: RegisterAllocator::new(),
            loops: LoopStack::new(),
            bindings: FxHashMap::default(),
            used_builtins: Vec::new(),
            exit_label: None,
        }
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn types(&self) -> &'a TypeContext {
        self.env.types
    }

    pub fn variable(&self, var: VarId) -> &'a VarDeclaration {
        self.env.scopes.variable(var)
    }

    // ===== Output =====

    /// Emit an instruction; operands are written in the given order
    pub fn emit(&mut self, opcode: Opcode, operands: &[&dyn fmt::Display]) {
        let mut line = opcode.name().to_string();
        for operand in operands {
            line.push(' ');
            line.push_str(&operand.to_string());
        }
        self.output.push(line);
    }

    pub fn emit_raw(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    pub fn emit_label(&mut self, label: &str) {
        self.output.push(format!("{}: {}", label, Opcode::Nop.name()));
    }

    /// `LOAD r0 <value>`
    pub fn load_scratch(&mut self, value: &dyn fmt::Display) {
        self.emit(Opcode::Load, &[&"r0", value]);
    }

    /// Call a host function by name
    pub fn ext_call(&mut self, alias: &str) {
        self.load_scratch(&quoted(alias));
        self.emit(Opcode::ExtCall, &[&"r0"]);
    }

    /// Comment with the source text of `line`, once per line
    pub fn annotate(&mut self, line: u32) {
        if !self.env.config.annotate_source || line == 0 || line == self.last_line {
            return;
        }
        self.last_line = line;
        if let Some(text) = self.env.source.lines().nth(line as usize - 1) {
            self.output.push(format!("// Line {}: {}", line, text.trim()));
        }
    }

    // ===== Registers =====

    pub fn alloc(&mut self, meta: NodeMeta) -> CompileResult<Register> {
        self.registers.alloc(meta.id, None, meta.line)
    }

    /// Allocate a register and name it for the assembler
    pub fn alloc_alias(&mut self, meta: NodeMeta, alias: &str) -> CompileResult<Register> {
        let reg = self.registers.alloc(meta.id, Some(alias), meta.line)?;
        self.emit_raw(format!("ALIAS {} ${}", reg.physical(), alias));
        Ok(reg)
    }

    pub fn dealloc(&mut self, reg: Register, line: u32) -> CompileResult<()> {
        self.registers.dealloc(reg, line)
    }

    pub fn bind(&mut self, var: VarId, reg: Register, line: u32) -> CompileResult<()> {
        if self.bindings.contains_key(&var) {
            return Err(CompilerError::internal(
                line,
                format!("{} is already bound", self.variable(var).name),
            ));
        }
        self.bindings.insert(var, reg);
        Ok(())
    }

    pub fn binding(&self, var: VarId) -> Option<&Register> {
        self.bindings.get(&var)
    }

    pub fn is_bound(&self, var: VarId) -> bool {
        self.bindings.contains_key(&var)
    }

    /// Register of `var`, allocating and binding one on first use
    pub fn ensure_bound(&mut self, var: VarId, meta: NodeMeta) -> CompileResult<bool> {
        if self.is_bound(var) {
            return Ok(false);
        }
        let mut name = self.variable(var).name.clone();
        // A shadowing variable must not take over the alias of the outer one
        if self.bindings.values().any(|reg| reg.alias() == Some(name.as_str())) {
            name = format!("{}_{}", name, var.0);
        }
        let reg = self.alloc_alias(meta, &name)?;
        self.bind(var, reg, meta.line)?;
        Ok(true)
    }

    /// Release the register bound to `var`, if any
    pub fn release(&mut self, var: VarId, line: u32) -> CompileResult<bool> {
        match self.bindings.remove(&var) {
            Some(reg) => {
                self.dealloc(reg, line)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Bound register of `var` as an operand
    pub fn operand(&self, var: VarId, line: u32) -> CompileResult<String> {
        self.binding(var).map(|reg| reg.to_string()).ok_or_else(|| {
            CompilerError::semantic(
                line,
                format!("variable {} is used before being assigned", self.variable(var).name),
            )
        })
    }

    // ===== Helpers =====

    pub fn vm_type(&self, ty: TypeId) -> CompileResult<VmType> {
        VmType::from_kind(self.env.types.kind(ty))
    }

    pub fn use_builtin(&mut self, label: &str) {
        if self.env.builtins.find_by_label(label).is_some()
            && !self.used_builtins.iter().any(|l| l == label)
        {
            self.used_builtins.push(label.to_string());
        }
    }

    pub fn artifacts(&self, module: &str, line: u32) -> CompileResult<&'a ModuleArtifacts> {
        self.env.artifacts.get(module).ok_or_else(|| {
            CompilerError::semantic(line, format!("module {} is not compiled yet", module))
        })
    }

    /// Address bytes of the module being compiled
    pub fn this_address(&self) -> String {
        let mut bytes = vec![2u8, 0u8];
        bytes.extend_from_slice(&Sha256::digest(self.module.as_bytes()));
        format!("0x{}", hex::encode(bytes))
    }

    pub fn lines(&self) -> &[String] {
        &self.output
    }

    /// Check the register file and hand over the output
    pub fn finish(self, line: u32) -> CompileResult<GeneratedCode> {
        if let Some(var) = self.bindings.keys().next() {
            return Err(CompilerError::internal(
                line,
                format!("{} is still bound", self.variable(*var).name),
            ));
        }
        self.registers.verify(line)?;
        Ok(GeneratedCode {
            lines: self.output,
            builtins: self.used_builtins,
            stats: self.registers.stats(),
        })
    }
}

/// String literal operand
pub fn quoted(text: &str) -> String {
    format!("\"{}\"", text)
}
