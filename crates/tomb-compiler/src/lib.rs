//! Tomb Compiler
//!
//! Compiles Tomb smart-contract source into assembly for a 32-register VM,
//! together with an ABI and a source map for every module.
//!
//! The pipeline is:
//! - `parser`: tokens, then typed modules with resolved names
//! - `codegen`: assembly per method, with register allocation
//! - `module`: assembling, ABI and event descriptions per module
//!
//! # Usage
//!
//! ```ignore
//! use tomb_compiler::{compile, CompilerConfig};
//!
//! let modules = compile(source, &my_assembler, &CompilerConfig::default())?;
//! for module in &modules {
//!     println!("{}", module.asm_text());
//! }
//! ```

pub mod ast;
pub mod codegen;
pub mod config;
pub mod diagnostic;
pub mod error;
pub mod library;
pub mod module;
pub mod parser;
pub mod symbols;
pub mod types;

pub use config::{CompilerConfig, ConfigError};
pub use error::{CompileResult, CompilerError};
pub use library::{AbiResolver, FsAbiResolver, NoAbiResolver};
pub use module::{Assembler, AssemblerError, Assembly, CompiledModule, ContractInterface};
pub use parser::{Compilation, Lexer, Parser};

use module::compile::ModuleCompiler;

/// Compile a source file, resolving dotted imports from the configured
/// library paths
pub fn compile(
    source: &str,
    assembler: &dyn Assembler,
    config: &CompilerConfig,
) -> CompileResult<Vec<CompiledModule>> {
    let resolver = FsAbiResolver::from_config(config);
    compile_with_resolver(source, assembler, config, &resolver)
}

/// Compile a source file with a custom ABI lookup for imported contracts
pub fn compile_with_resolver(
    source: &str,
    assembler: &dyn Assembler,
    config: &CompilerConfig,
    resolver: &dyn AbiResolver,
) -> CompileResult<Vec<CompiledModule>> {
    let compilation = Parser::with_resolver(source, resolver)?.process()?;
    log::info!("parsed {} modules", compilation.modules.len());

    let mut compiler = ModuleCompiler::new(
        &compilation.types,
        &compilation.scopes,
        compilation.registry.builtins(),
        config,
        source,
        assembler,
    );
    compilation
        .modules
        .iter()
        .map(|module| compiler.compile(module))
        .collect()
}
