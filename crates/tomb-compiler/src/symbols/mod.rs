//! Scopes, variables and constants

pub mod decl;
pub mod scope;

pub use decl::{CollectionTypes, ConstDeclaration, VarDeclaration, VarId, VarStorage};
pub use scope::{is_all_uppercase, Scope, ScopeId, ScopeTree};
