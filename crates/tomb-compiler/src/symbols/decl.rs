//! Variable and constant declarations

use crate::symbols::ScopeId;
use crate::types::TypeId;

/// Index of a variable in the `ScopeTree` arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

/// Where a variable lives at runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarStorage {
    /// Contract storage, loaded at method entry and written at exit
    Global,
    Local,
    /// Popped from the call stack at method entry
    Argument,
    /// Read from the backing token of an NFT method
    Nft,
}

/// Key and value types of a storage collection global
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionTypes {
    /// Only maps have a key type
    pub key: Option<TypeId>,
    pub value: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDeclaration {
    pub id: VarId,
    pub name: String,
    pub ty: TypeId,
    pub storage: VarStorage,
    pub scope: ScopeId,
    pub line: u32,
    pub collection: Option<CollectionTypes>,
}

impl VarDeclaration {
    pub fn is_global(&self) -> bool {
        self.storage == VarStorage::Global
    }
}

/// A named compile-time literal. `value` is the literal text as written
/// (strings keep their quotes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDeclaration {
    pub name: String,
    pub ty: TypeId,
    pub value: String,
    pub line: u32,
}
