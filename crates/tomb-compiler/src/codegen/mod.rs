//! Code generation
//!
//! Turns the typed AST into assembly text for the register VM. Expressions,
//! statements, calls and methods each know how to emit themselves through
//! a `CodeGenerator`, which owns the register file of the module.

pub mod call;
pub mod context;
pub mod control;
pub mod expr;
pub mod method;
pub mod opcode;
pub mod register;
pub mod stmt;

pub use context::{CodeGenerator, CodegenEnv, GeneratedCode};
pub use control::{Labels, LoopStack};
pub use method::MethodEnv;
pub use opcode::Opcode;
pub use register::{Register, RegisterAllocator, RegisterStats, MAX_REGISTERS};
