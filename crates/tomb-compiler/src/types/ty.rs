//! Type representation for Tomb
//!
//! Types are interned by `TypeContext`; equality of two `TypeId`s is type
//! identity.

use crate::error::{CompileResult, CompilerError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for an interned type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) u32);

impl TypeId {
    // Pre-interned types, in the order `TypeContext::new` registers them
    pub const NONE: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NUMBER: TypeId = TypeId(2);
    pub const BOOL: TypeId = TypeId(3);
    pub const STRING: TypeId = TypeId(4);
    pub const TIMESTAMP: TypeId = TypeId(5);
    pub const ADDRESS: TypeId = TypeId(6);
    pub const HASH: TypeId = TypeId(7);
    pub const BYTES: TypeId = TypeId(8);
    pub const TASK: TypeId = TypeId(9);
    pub const ANY: TypeId = TypeId(10);
    pub const STORAGE_MAP: TypeId = TypeId(11);
    pub const STORAGE_LIST: TypeId = TypeId(12);
    pub const STORAGE_SET: TypeId = TypeId(13);
    pub const MODULE: TypeId = TypeId(14);
    /// First generic placeholder, `Generic(0)`
    pub const GENERIC: TypeId = TypeId(15);
    /// Second generic placeholder, `Generic(1)`
    pub const GENERIC_1: TypeId = TypeId(16);

    pub fn as_u32(self) -> u32 {
        self.0
    }
}

/// Closed set of type kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    None,
    Unknown,
    Generic,
    Number,
    Bool,
    String,
    Timestamp,
    Address,
    Hash,
    Bytes,
    Enum,
    Task,
    Any,
    Method,
    Struct,
    Decimal,
    StorageMap,
    StorageList,
    StorageSet,
    Array,
    Module,
}

impl VarKind {
    pub fn name(self) -> &'static str {
        match self {
            VarKind::None => "none",
            VarKind::Unknown => "unknown",
            VarKind::Generic => "generic",
            VarKind::Number => "number",
            VarKind::Bool => "bool",
            VarKind::String => "string",
            VarKind::Timestamp => "timestamp",
            VarKind::Address => "address",
            VarKind::Hash => "hash",
            VarKind::Bytes => "bytes",
            VarKind::Enum => "enum",
            VarKind::Task => "task",
            VarKind::Any => "any",
            VarKind::Method => "method",
            VarKind::Struct => "struct",
            VarKind::Decimal => "decimal",
            VarKind::StorageMap => "storage_map",
            VarKind::StorageList => "storage_list",
            VarKind::StorageSet => "storage_set",
            VarKind::Array => "array",
            VarKind::Module => "module",
        }
    }

    /// Map a built-in type keyword to its kind
    pub fn from_type_name(name: &str) -> Option<VarKind> {
        let kind = match name {
            "none" => VarKind::None,
            "number" => VarKind::Number,
            "bool" => VarKind::Bool,
            "string" => VarKind::String,
            "timestamp" => VarKind::Timestamp,
            "address" => VarKind::Address,
            "hash" => VarKind::Hash,
            "bytes" => VarKind::Bytes,
            "any" => VarKind::Any,
            "task" => VarKind::Task,
            "method" => VarKind::Method,
            "module" => VarKind::Module,
            "decimal" => VarKind::Decimal,
            "storage_map" => VarKind::StorageMap,
            "storage_list" => VarKind::StorageList,
            "storage_set" => VarKind::StorageSet,
            _ => return None,
        };
        Some(kind)
    }

    /// Kinds that are fully described without extra data
    pub fn is_primitive(self) -> bool {
        !matches!(
            self,
            VarKind::Generic
                | VarKind::Struct
                | VarKind::Enum
                | VarKind::Decimal
                | VarKind::Method
                | VarKind::Array
        )
    }

    pub fn is_storage_collection(self) -> bool {
        matches!(
            self,
            VarKind::StorageMap | VarKind::StorageList | VarKind::StorageSet
        )
    }
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Interned type key. Two equal keys always map to the same `TypeId`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VarType {
    Primitive(VarKind),
    /// Placeholder rewritten when a generic library is specialized
    Generic(u8),
    Struct(String),
    Enum(String),
    /// Fixed-point number with 1..=32 decimal places
    Decimal(u8),
    Method(String),
    Array(TypeId),
}

impl VarType {
    pub fn kind(&self) -> VarKind {
        match self {
            VarType::Primitive(kind) => *kind,
            VarType::Generic(_) => VarKind::Generic,
            VarType::Struct(_) => VarKind::Struct,
            VarType::Enum(_) => VarKind::Enum,
            VarType::Decimal(_) => VarKind::Decimal,
            VarType::Method(_) => VarKind::Method,
            VarType::Array(_) => VarKind::Array,
        }
    }
}

/// Extra data that disambiguates a kind in `TypeContext::find`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeExtra<'a> {
    None,
    Name(&'a str),
    Precision(u8),
    Element(TypeId),
    Index(u8),
}

/// Value type tags understood by the VM and written into ABI files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VmType {
    None = 0,
    Struct = 1,
    Bytes = 2,
    Number = 3,
    String = 4,
    Timestamp = 5,
    Bool = 6,
    Enum = 7,
    Object = 8,
}

impl VmType {
    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn name(self) -> &'static str {
        match self {
            VmType::None => "None",
            VmType::Struct => "Struct",
            VmType::Bytes => "Bytes",
            VmType::Number => "Number",
            VmType::String => "String",
            VmType::Timestamp => "Timestamp",
            VmType::Bool => "Bool",
            VmType::Enum => "Enum",
            VmType::Object => "Object",
        }
    }

    /// VM representation of a type kind
    pub fn from_kind(kind: VarKind) -> CompileResult<VmType> {
        let vm = match kind {
            VarKind::Address => VmType::Object,
            VarKind::Bytes | VarKind::Hash | VarKind::Module => VmType::Bytes,
            VarKind::Bool => VmType::Bool,
            VarKind::Enum => VmType::Enum,
            VarKind::Method | VarKind::Number | VarKind::Decimal | VarKind::Task => {
                VmType::Number
            }
            VarKind::String => VmType::String,
            VarKind::Timestamp => VmType::Timestamp,
            VarKind::None => VmType::None,
            VarKind::Struct => VmType::Struct,
            other => {
                return Err(CompilerError::Abi {
                    kind: other.name().to_string(),
                })
            }
        };
        Ok(vm)
    }
}

impl fmt::Display for VmType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vm_type_mapping() {
        assert_eq!(VmType::from_kind(VarKind::Address).unwrap(), VmType::Object);
        assert_eq!(VmType::from_kind(VarKind::Hash).unwrap(), VmType::Bytes);
        assert_eq!(VmType::from_kind(VarKind::Module).unwrap(), VmType::Bytes);
        assert_eq!(VmType::from_kind(VarKind::Decimal).unwrap(), VmType::Number);
        assert_eq!(VmType::from_kind(VarKind::Task).unwrap(), VmType::Number);
        assert_eq!(VmType::from_kind(VarKind::Struct).unwrap(), VmType::Struct);
        assert_eq!(VmType::Object.tag(), 8);
    }

    #[test]
    fn test_vm_type_mapping_rejects_collections() {
        assert!(VmType::from_kind(VarKind::StorageMap).is_err());
        assert!(VmType::from_kind(VarKind::Any).is_err());
        assert!(VmType::from_kind(VarKind::Array).is_err());
    }

    #[test]
    fn test_type_names_round_trip() {
        for name in crate::parser::token::TYPE_NAMES {
            let kind = VarKind::from_type_name(name).unwrap();
            assert_eq!(kind.name(), *name);
        }
    }
}
