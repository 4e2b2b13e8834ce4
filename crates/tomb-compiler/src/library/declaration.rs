//! Library and method interface declarations
//!
//! A library is a named namespace of callable methods. Each method records
//! its signature and how a call to it is emitted.

use crate::codegen::Opcode;
use crate::types::{TypeContext, TypeId, VmType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MethodKind {
    Method,
    Constructor,
    Task,
    Trigger,
    Property,
}

/// How a call to a method is emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodImplementation {
    /// `LOAD r0 "<alias>"` then `EXTCALL r0`
    ExtCall,
    /// Push the alias, `CTX` into the target contract and `SWITCH`
    ContractCall,
    /// `CALL @<alias>` into code of the same script
    LocalCall,
    Custom(CustomCodegen),
}

/// Library methods that need bespoke assembly at the call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomCodegen {
    /// Throw the message when the condition is false
    RuntimeExpect,
    /// `OP arg dst`
    UnaryOpcode(Opcode),
    /// `OP arg0 arg1 dst`
    BinaryOpcode(Opcode),
    /// `CAST arg dst #Type`
    Cast(VmType),
    /// `RANGE src dst index length`
    Range,
    /// Precision of the decimal argument, known at compile time
    DecimalPrecision,
    /// Whether every bit of the flag is set in the value
    EnumIsSet,
    /// Pack the arguments into the fields of the named struct
    StructConstructor(String),
    /// Element of an array argument
    ArrayGet,
    /// Storage interop call: optionally preceded by the VM tag of the
    /// return type and followed by the current contract name
    Storage {
        reads_contract: bool,
        typed: bool,
    },
    /// `Call.interop<T>(name, args...)`
    CallInterop,
    /// `Call.contract<T>(contract, method, args...)`
    CallContract,
    /// `Call.method<T>(name, args...)`
    CallMethod,
    /// Script bytes of a compiled module
    ModuleScript,
    /// ABI bytes of a compiled module
    ModuleAbi,
    /// Create an NFT series backed by a compiled NFT module
    NftCreateSeries,
    /// Read the ROM or RAM of a token, unpacking structs
    NftRead { field: &'static str },
}

/// How the return type of a generic method is decided at a call site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericReturn {
    /// The declared return type is already concrete
    Concrete,
    /// Taken from `<T>` after the method name; `required` methods reject
    /// a missing type argument, others default to none
    Explicit { required: bool },
    /// Type of the argument at this position
    Argument(usize),
    /// Element type of the array argument at this position
    Element(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodParameter {
    pub name: String,
    pub ty: TypeId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInterface {
    pub name: String,
    pub library: String,
    pub kind: MethodKind,
    pub return_type: TypeId,
    pub parameters: Vec<MethodParameter>,
    pub is_public: bool,
    /// Interop name, contract method name or label, depending on the
    /// implementation
    pub alias: String,
    pub implementation: MethodImplementation,
    /// Target contract of a `ContractCall`
    pub contract: Option<String>,
    pub generic: GenericReturn,
}

impl MethodInterface {
    pub fn new(
        library: &str,
        name: &str,
        implementation: MethodImplementation,
        return_type: TypeId,
        parameters: Vec<MethodParameter>,
    ) -> Self {
        let alias = match implementation {
            MethodImplementation::ExtCall => format!("{}.{}", library, capitalize(name)),
            MethodImplementation::ContractCall => capitalize(name),
            MethodImplementation::LocalCall => format!("@entry_{}", name),
            MethodImplementation::Custom(_) => format!("{}.{}", library, name),
        };
        Self {
            name: name.to_string(),
            library: library.to_string(),
            kind: MethodKind::Method,
            return_type,
            parameters,
            is_public: true,
            alias,
            implementation,
            contract: None,
            generic: GenericReturn::Concrete,
        }
    }

    pub fn with_alias(&mut self, alias: &str) -> &mut Self {
        self.alias = alias.to_string();
        self
    }

    pub fn with_generic(&mut self, generic: GenericReturn) -> &mut Self {
        self.generic = generic;
        self
    }

    pub fn targeting(&mut self, contract: &str) -> &mut Self {
        self.contract = Some(contract.to_string());
        self
    }

    /// Methods of the `Call` library take arguments without type checks
    pub fn is_untyped(&self) -> bool {
        self.library == "Call"
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryDeclaration {
    pub name: String,
    methods: Vec<MethodInterface>,
}

impl LibraryDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    /// Declare a method, replacing an earlier one with the same name
    pub fn add_method(
        &mut self,
        name: &str,
        implementation: MethodImplementation,
        return_type: TypeId,
        parameters: &[(&str, TypeId)],
    ) -> &mut MethodInterface {
        let parameters = parameters
            .iter()
            .map(|(name, ty)| MethodParameter {
                name: name.to_string(),
                ty: *ty,
            })
            .collect();
        let method =
            MethodInterface::new(&self.name, name, implementation, return_type, parameters);
        self.insert(method)
    }

    pub fn insert(&mut self, method: MethodInterface) -> &mut MethodInterface {
        let index = match self.methods.iter().position(|m| m.name == method.name) {
            Some(index) => {
                self.methods[index] = method;
                index
            }
            None => {
                self.methods.push(method);
                self.methods.len() - 1
            }
        };
        &mut self.methods[index]
    }

    pub fn find_method(&self, name: &str) -> Option<&MethodInterface> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn methods(&self) -> &[MethodInterface] {
        &self.methods
    }

    /// Deep copy under a new name
    pub fn clone_as(&self, name: &str) -> LibraryDeclaration {
        let mut copy = self.clone();
        copy.name = name.to_string();
        for method in &mut copy.methods {
            method.library = name.to_string();
        }
        copy
    }

    /// Rewrite `Generic(n)` placeholders in every signature with `args[n]`
    pub fn patch_generics(&mut self, types: &mut TypeContext, args: &[TypeId]) {
        for method in &mut self.methods {
            method.return_type = types.substitute(method.return_type, args);
            for param in &mut method.parameters {
                param.ty = types.substitute(param.ty, args);
            }
        }
    }
}

pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_aliases() {
        let mut lib = LibraryDeclaration::new("Runtime");
        lib.add_method(
            "log",
            MethodImplementation::ExtCall,
            TypeId::NONE,
            &[("message", TypeId::STRING)],
        );
        assert_eq!(lib.find_method("log").unwrap().alias, "Runtime.Log");

        let mut account = LibraryDeclaration::new("Account");
        account
            .add_method(
                "getName",
                MethodImplementation::ContractCall,
                TypeId::STRING,
                &[("target", TypeId::ADDRESS)],
            )
            .with_alias("LookUpAddress")
            .targeting("account");
        let method = account.find_method("getName").unwrap();
        assert_eq!(method.alias, "LookUpAddress");
        assert_eq!(method.contract.as_deref(), Some("account"));
    }

    #[test]
    fn test_clone_as_renames_methods() {
        let mut lib = LibraryDeclaration::new("Map");
        lib.add_method(
            "get",
            MethodImplementation::ExtCall,
            TypeId::GENERIC_1,
            &[("field", TypeId::STRING), ("key", TypeId::GENERIC)],
        );
        let mut types = TypeContext::new();
        let mut copy = lib.clone_as("Map<number,string>");
        copy.patch_generics(&mut types, &[TypeId::NUMBER, TypeId::STRING]);

        let get = copy.find_method("get").unwrap();
        assert_eq!(get.library, "Map<number,string>");
        assert_eq!(get.return_type, TypeId::STRING);
        assert_eq!(get.parameters[1].ty, TypeId::NUMBER);
        // the template is untouched
        assert_eq!(lib.find_method("get").unwrap().return_type, TypeId::GENERIC_1);
    }

    #[test]
    fn test_redeclaring_replaces() {
        let mut lib = LibraryDeclaration::new("Math");
        lib.add_method("abs", MethodImplementation::ExtCall, TypeId::NUMBER, &[]);
        lib.add_method(
            "abs",
            MethodImplementation::Custom(CustomCodegen::UnaryOpcode(Opcode::Abs)),
            TypeId::NUMBER,
            &[("value", TypeId::NUMBER)],
        );
        assert_eq!(lib.methods().len(), 1);
        assert_eq!(lib.find_method("abs").unwrap().parameters.len(), 1);
    }
}
