//! Compilation errors

use thiserror::Error;

pub type CompileResult<T> = Result<T, CompilerError>;

/// Every failure the compiler can report.
///
/// Compilation stops at the first error. All source-related variants carry
/// the 1-based line of the offending construct.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CompilerError {
    #[error("line {line}: unexpected end of file")]
    UnexpectedEof { line: u32 },

    #[error("line {line}: expected {expected}, got {found}")]
    Expected {
        line: u32,
        expected: String,
        found: String,
    },

    #[error("line {line}: unexpected token: {token}")]
    UnexpectedToken { line: u32, token: String },

    #[error("line {line}: invalid {what} name: {name}")]
    InvalidName {
        line: u32,
        what: &'static str,
        name: String,
    },

    #[error("line {line}: duplicated declaration: {name}")]
    Duplicate { line: u32, name: String },

    #[error("line {line}: type mismatch, {left} on left, {right} on right")]
    TypeMismatch {
        line: u32,
        left: String,
        right: String,
    },

    #[error("line {line}: expected {expected}, got {found} instead")]
    WrongType {
        line: u32,
        expected: String,
        found: String,
    },

    #[error("line {line}: undeclared variable: {name}")]
    UndeclaredVariable { line: u32, name: String },

    #[error("line {line}: unknown identifier: {name}")]
    UnknownIdentifier { line: u32, name: String },

    #[error("line {line}: unknown library: {name}")]
    UnknownLibrary { line: u32, name: String },

    #[error("line {line}: library {name} is not imported")]
    UnimportedLibrary { line: u32, name: String },

    #[error("line {line}: unknown method {method} in {library}")]
    UnknownMethod {
        line: u32,
        library: String,
        method: String,
    },

    #[error("line {line}: {keyword} is not inside a loop")]
    NotInsideLoop { line: u32, keyword: &'static str },

    #[error("line {line}: {message}")]
    Semantic { line: u32, message: String },

    #[error("no VM representation for type {kind}")]
    Abi { kind: String },

    #[error("assembler failed for {module}: {message}")]
    Assembler { module: String, message: String },

    #[error("line {line}: internal compiler error: {message}")]
    Internal { line: u32, message: String },
}

impl CompilerError {
    pub(crate) fn semantic(line: u32, message: impl Into<String>) -> Self {
        CompilerError::Semantic {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn internal(line: u32, message: impl Into<String>) -> Self {
        CompilerError::Internal {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn expected(
        line: u32,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        CompilerError::Expected {
            line,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Source line of the error, when it has one.
    pub fn line(&self) -> Option<u32> {
        match self {
            CompilerError::UnexpectedEof { line }
            | CompilerError::Expected { line, .. }
            | CompilerError::UnexpectedToken { line, .. }
            | CompilerError::InvalidName { line, .. }
            | CompilerError::Duplicate { line, .. }
            | CompilerError::TypeMismatch { line, .. }
            | CompilerError::WrongType { line, .. }
            | CompilerError::UndeclaredVariable { line, .. }
            | CompilerError::UnknownIdentifier { line, .. }
            | CompilerError::UnknownLibrary { line, .. }
            | CompilerError::UnimportedLibrary { line, .. }
            | CompilerError::UnknownMethod { line, .. }
            | CompilerError::NotInsideLoop { line, .. }
            | CompilerError::Semantic { line, .. }
            | CompilerError::Internal { line, .. } => Some(*line),
            CompilerError::Abi { .. } | CompilerError::Assembler { .. } => None,
        }
    }

    /// Internal errors are compiler bugs rather than problems in user code.
    pub fn is_internal(&self) -> bool {
        matches!(self, CompilerError::Internal { .. })
    }
}
