//! Tomb source front end
//!
//! The lexer turns source text into tokens; the parser builds typed modules
//! from them, resolving names and checking types as it goes.

pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod token;

pub use lexer::Lexer;
pub use parser::{Compilation, Parser};
pub use token::{Span, Token, TokenKind};
