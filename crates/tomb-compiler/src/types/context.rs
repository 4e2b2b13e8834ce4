//! Type context for managing types and type interning

use super::decl::{EnumDeclaration, StructDeclaration};
use super::ty::{TypeExtra, TypeId, VarKind, VarType};
use crate::error::{CompileResult, CompilerError};
use rustc_hash::FxHashMap;

/// Highest precision a `decimal<N>` may carry
pub const MAX_DECIMAL_PRECISION: u8 = 32;

/// Type context that owns every type of a compilation
///
/// Types are interned so that identical types share one `TypeId`. Struct and
/// enum declarations are parser-wide and live here as well.
#[derive(Debug, Clone)]
pub struct TypeContext {
    /// Storage for all types, indexed by TypeId
    types: Vec<VarType>,

    /// Reverse mapping from VarType to TypeId for interning
    type_to_id: FxHashMap<VarType, TypeId>,

    structs: Vec<StructDeclaration>,
    enums: Vec<EnumDeclaration>,
}

impl Default for TypeContext {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeContext {
    pub fn new() -> Self {
        let mut ctx = TypeContext {
            types: Vec::new(),
            type_to_id: FxHashMap::default(),
            structs: Vec::new(),
            enums: Vec::new(),
        };

        // Order must match the TypeId constants
        for kind in [
            VarKind::None,
            VarKind::Unknown,
            VarKind::Number,
            VarKind::Bool,
            VarKind::String,
            VarKind::Timestamp,
            VarKind::Address,
            VarKind::Hash,
            VarKind::Bytes,
            VarKind::Task,
            VarKind::Any,
            VarKind::StorageMap,
            VarKind::StorageList,
            VarKind::StorageSet,
            VarKind::Module,
        ] {
            ctx.intern(VarType::Primitive(kind));
        }
        ctx.intern(VarType::Generic(0));
        ctx.intern(VarType::Generic(1));

        ctx
    }

    /// Intern a type, returning its TypeId
    pub fn intern(&mut self, ty: VarType) -> TypeId {
        if let Some(&id) = self.type_to_id.get(&ty) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.types.push(ty.clone());
        self.type_to_id.insert(ty, id);
        id
    }

    pub fn get(&self, id: TypeId) -> &VarType {
        &self.types[id.0 as usize]
    }

    pub fn kind(&self, id: TypeId) -> VarKind {
        self.get(id).kind()
    }

    /// Canonical type for a `(kind, extra)` pair
    pub fn find(&mut self, kind: VarKind, extra: TypeExtra<'_>) -> CompileResult<TypeId> {
        let ty = match (kind, extra) {
            (VarKind::Struct, TypeExtra::Name(name)) => VarType::Struct(name.to_string()),
            (VarKind::Enum, TypeExtra::Name(name)) => VarType::Enum(name.to_string()),
            (VarKind::Method, TypeExtra::Name(name)) => VarType::Method(name.to_string()),
            (VarKind::Decimal, TypeExtra::Precision(precision)) => {
                if precision == 0 || precision > MAX_DECIMAL_PRECISION {
                    return Err(CompilerError::internal(
                        0,
                        format!("decimal precision {} out of range", precision),
                    ));
                }
                VarType::Decimal(precision)
            }
            (VarKind::Array, TypeExtra::Element(element)) => VarType::Array(element),
            (VarKind::Generic, TypeExtra::Index(index)) => VarType::Generic(index),
            (kind, TypeExtra::None) if kind.is_primitive() => VarType::Primitive(kind),
            (kind, extra) => {
                return Err(CompilerError::internal(
                    0,
                    format!("cannot construct type {} from {:?}", kind, extra),
                ))
            }
        };
        Ok(self.intern(ty))
    }

    pub fn primitive(&mut self, kind: VarKind) -> CompileResult<TypeId> {
        self.find(kind, TypeExtra::None)
    }

    pub fn decimal(&mut self, precision: u8) -> CompileResult<TypeId> {
        self.find(VarKind::Decimal, TypeExtra::Precision(precision))
    }

    pub fn array(&mut self, element: TypeId) -> TypeId {
        self.intern(VarType::Array(element))
    }

    pub fn method(&mut self, name: &str) -> TypeId {
        self.intern(VarType::Method(name.to_string()))
    }

    pub fn generic(&mut self, index: u8) -> TypeId {
        self.intern(VarType::Generic(index))
    }

    /// Register a struct; its fields must already be resolved
    pub fn declare_struct(&mut self, decl: StructDeclaration, line: u32) -> CompileResult<TypeId> {
        if self.is_declared_type(&decl.name) {
            return Err(CompilerError::Duplicate {
                line,
                name: decl.name,
            });
        }
        let id = self.intern(VarType::Struct(decl.name.clone()));
        self.structs.push(decl);
        Ok(id)
    }

    pub fn declare_enum(&mut self, decl: EnumDeclaration, line: u32) -> CompileResult<TypeId> {
        if self.is_declared_type(&decl.name) {
            return Err(CompilerError::Duplicate {
                line,
                name: decl.name,
            });
        }
        let id = self.intern(VarType::Enum(decl.name.clone()));
        self.enums.push(decl);
        Ok(id)
    }

    fn is_declared_type(&self, name: &str) -> bool {
        self.struct_decl(name).is_some() || self.enum_decl(name).is_some()
    }

    pub fn struct_decl(&self, name: &str) -> Option<&StructDeclaration> {
        self.structs.iter().find(|s| s.name == name)
    }

    pub fn enum_decl(&self, name: &str) -> Option<&EnumDeclaration> {
        self.enums.iter().find(|e| e.name == name)
    }

    /// Structs in declaration order
    pub fn structs(&self) -> &[StructDeclaration] {
        &self.structs
    }

    /// Look up a declared struct or enum type by name
    pub fn named_type(&self, name: &str) -> Option<TypeId> {
        if self.struct_decl(name).is_some() {
            return self.type_to_id.get(&VarType::Struct(name.to_string())).copied();
        }
        if self.enum_decl(name).is_some() {
            return self.type_to_id.get(&VarType::Enum(name.to_string())).copied();
        }
        None
    }

    pub fn struct_of(&self, id: TypeId) -> Option<&StructDeclaration> {
        match self.get(id) {
            VarType::Struct(name) => self.struct_decl(name),
            _ => None,
        }
    }

    pub fn enum_of(&self, id: TypeId) -> Option<&EnumDeclaration> {
        match self.get(id) {
            VarType::Enum(name) => self.enum_decl(name),
            _ => None,
        }
    }

    pub fn element_type(&self, id: TypeId) -> Option<TypeId> {
        match self.get(id) {
            VarType::Array(element) => Some(*element),
            _ => None,
        }
    }

    pub fn precision(&self, id: TypeId) -> Option<u8> {
        match self.get(id) {
            VarType::Decimal(precision) => Some(*precision),
            _ => None,
        }
    }

    /// True if the type mentions a generic placeholder anywhere
    pub fn is_generic(&self, id: TypeId) -> bool {
        match self.get(id) {
            VarType::Generic(_) => true,
            VarType::Array(element) => self.is_generic(*element),
            _ => false,
        }
    }

    /// Replace `Generic(n)` placeholders with `args[n]`
    pub fn substitute(&mut self, id: TypeId, args: &[TypeId]) -> TypeId {
        match self.get(id).clone() {
            VarType::Generic(index) => args.get(index as usize).copied().unwrap_or(id),
            VarType::Array(element) => {
                let element = self.substitute(element, args);
                self.array(element)
            }
            _ => id,
        }
    }

    /// Whether a value of type `arg` may be passed where `param` is declared
    /// without any conversion
    pub fn accepts(&self, param: TypeId, arg: TypeId) -> bool {
        if param == arg || param == TypeId::ANY {
            return true;
        }
        match (self.get(param), self.get(arg)) {
            (VarType::Generic(_), _) => true,
            (VarType::Array(p), VarType::Array(a)) => self.accepts(*p, *a),
            (VarType::Method(_), VarType::Method(_)) => true,
            _ => false,
        }
    }

    /// Implicit conversions inserted as a `CAST`
    pub fn can_cast(&self, from: TypeId, to: TypeId) -> bool {
        use VarKind::*;
        matches!(
            (self.kind(from), self.kind(to)),
            (Number | Bool | Address | Hash | Timestamp | Enum | Decimal, String)
                | (Number, Timestamp)
                | (Timestamp, Number)
                | (Enum, Number)
                | (String | Hash, Bytes)
                | (Bytes, Hash)
        )
    }

    /// Human readable type name used in diagnostics
    pub fn display(&self, id: TypeId) -> String {
        match self.get(id) {
            VarType::Primitive(kind) => kind.name().to_string(),
            VarType::Generic(_) => "generic".to_string(),
            VarType::Struct(name) | VarType::Enum(name) => name.clone(),
            VarType::Decimal(precision) => format!("decimal<{}>", precision),
            VarType::Method(name) => format!("method<{}>", name),
            VarType::Array(element) => format!("{}[]", self.display(*element)),
        }
    }
}
