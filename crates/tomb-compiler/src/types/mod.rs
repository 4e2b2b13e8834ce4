//! Type system: interned types, struct/enum declarations and VM type tags

pub mod context;
pub mod decl;
pub mod ty;

pub use context::{TypeContext, MAX_DECIMAL_PRECISION};
pub use decl::{EnumDeclaration, EnumEntry, StructDeclaration, StructField};
pub use ty::{TypeExtra, TypeId, VarKind, VarType, VmType};
