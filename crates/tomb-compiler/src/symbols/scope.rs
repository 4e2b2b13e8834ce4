//! Scope tree for name resolution
//!
//! Scopes live in an arena and point at their parent; lookups walk the
//! parent chain outward. Variable declarations live in a second arena so
//! that the AST and the code generator can refer to them by `VarId`.

use super::decl::{CollectionTypes, ConstDeclaration, VarDeclaration, VarId, VarStorage};
use crate::error::{CompileResult, CompilerError};
use crate::parser::token::{is_keyword, is_type_name};
use crate::types::TypeId;
use rustc_hash::FxHashMap;

/// Scope identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: ScopeId,
    pub parent: Option<ScopeId>,
    /// Name of the module the scope belongs to
    pub module: String,
    variables: FxHashMap<String, VarId>,
    /// Declaration order, used when leaving the scope
    declared: Vec<VarId>,
    constants: FxHashMap<String, ConstDeclaration>,
    methods: Vec<String>,
}

impl Scope {
    fn new(id: ScopeId, parent: Option<ScopeId>, module: String) -> Self {
        Scope {
            id,
            parent,
            module,
            variables: FxHashMap::default(),
            declared: Vec::new(),
            constants: FxHashMap::default(),
            methods: Vec::new(),
        }
    }

    /// Variables declared directly in this scope, in declaration order
    pub fn variables(&self) -> &[VarId] {
        &self.declared
    }

    pub fn methods(&self) -> &[String] {
        &self.methods
    }

    fn declares(&self, name: &str) -> bool {
        self.variables.contains_key(name) || self.constants.contains_key(name)
    }
}

/// All scopes and variables of a compilation
#[derive(Debug, Clone, Default)]
pub struct ScopeTree {
    scopes: Vec<Scope>,
    variables: Vec<VarDeclaration>,
}

impl ScopeTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the top scope of a module
    pub fn create_root(&mut self, module: &str) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, None, module.to_string()));
        id
    }

    pub fn create_child(&mut self, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        let module = self.scope(parent).module.clone();
        self.scopes.push(Scope::new(id, Some(parent), module));
        id
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn variable(&self, id: VarId) -> &VarDeclaration {
        &self.variables[id.0 as usize]
    }

    /// Declare a variable. Names may not be keywords or type names and may
    /// not be all uppercase; a name may be declared once per scope.
    pub fn add_variable(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: TypeId,
        storage: VarStorage,
        line: u32,
    ) -> CompileResult<VarId> {
        self.declare(scope, name, ty, storage, None, line)
    }

    /// Declare a storage collection global
    pub fn add_collection(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: TypeId,
        types: CollectionTypes,
        line: u32,
    ) -> CompileResult<VarId> {
        self.declare(scope, name, ty, VarStorage::Global, Some(types), line)
    }

    fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        ty: TypeId,
        storage: VarStorage,
        collection: Option<CollectionTypes>,
        line: u32,
    ) -> CompileResult<VarId> {
        // Implicit NFT variables start with an underscore and an uppercase letter
        if storage != VarStorage::Nft && !is_valid_variable_name(name) {
            return Err(CompilerError::InvalidName {
                line,
                what: "variable",
                name: name.to_string(),
            });
        }
        if self.scope(scope).declares(name) {
            return Err(CompilerError::Duplicate {
                line,
                name: name.to_string(),
            });
        }

        let id = VarId(self.variables.len() as u32);
        self.variables.push(VarDeclaration {
            id,
            name: name.to_string(),
            ty,
            storage,
            scope,
            line,
            collection,
        });
        let target = self.scope_mut(scope);
        target.variables.insert(name.to_string(), id);
        target.declared.push(id);
        Ok(id)
    }

    /// Declare a constant; constant names must be all uppercase
    pub fn add_constant(&mut self, scope: ScopeId, decl: ConstDeclaration) -> CompileResult<()> {
        if !is_valid_constant_name(&decl.name) {
            return Err(CompilerError::InvalidName {
                line: decl.line,
                what: "constant",
                name: decl.name,
            });
        }
        if self.scope(scope).declares(&decl.name) {
            return Err(CompilerError::Duplicate {
                line: decl.line,
                name: decl.name,
            });
        }
        self.scope_mut(scope)
            .constants
            .insert(decl.name.clone(), decl);
        Ok(())
    }

    /// Record a method name in the module scope, rejecting duplicates
    pub fn add_method(&mut self, scope: ScopeId, name: &str, line: u32) -> CompileResult<()> {
        let target = self.scope_mut(scope);
        if target.methods.iter().any(|m| m == name) {
            return Err(CompilerError::Duplicate {
                line,
                name: name.to_string(),
            });
        }
        target.methods.push(name.to_string());
        Ok(())
    }

    /// Resolve a variable by walking the scope chain.
    ///
    /// Returns `Ok(None)` when the name is unknown and `required` is false,
    /// so callers can try another interpretation of the identifier.
    pub fn find_variable(
        &self,
        scope: ScopeId,
        name: &str,
        required: bool,
        line: u32,
    ) -> CompileResult<Option<VarId>> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(&var) = s.variables.get(name) {
                return Ok(Some(var));
            }
            current = s.parent;
        }

        if required {
            Err(CompilerError::UndeclaredVariable {
                line,
                name: name.to_string(),
            })
        } else {
            Ok(None)
        }
    }

    pub fn find_constant(&self, scope: ScopeId, name: &str) -> Option<&ConstDeclaration> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(decl) = s.constants.get(name) {
                return Some(decl);
            }
            current = s.parent;
        }
        None
    }
}

/// At least one letter and no lowercase letters
pub fn is_all_uppercase(name: &str) -> bool {
    name.chars().any(|c| c.is_ascii_alphabetic()) && !name.chars().any(|c| c.is_ascii_lowercase())
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

pub fn is_valid_variable_name(name: &str) -> bool {
    is_identifier(name) && !is_keyword(name) && !is_type_name(name) && !is_all_uppercase(name)
}

pub fn is_valid_constant_name(name: &str) -> bool {
    is_identifier(name) && is_all_uppercase(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(name: &str) -> ConstDeclaration {
        ConstDeclaration {
            name: name.to_string(),
            ty: TypeId::NUMBER,
            value: "1".to_string(),
            line: 1,
        }
    }

    #[test]
    fn test_shadowing_resolves_innermost() {
        let mut tree = ScopeTree::new();
        let root = tree.create_root("test");
        let global = tree
            .add_variable(root, "count", TypeId::NUMBER, VarStorage::Global, 1)
            .unwrap();
        let body = tree.create_child(root);
        let local = tree
            .add_variable(body, "count", TypeId::STRING, VarStorage::Local, 2)
            .unwrap();

        assert_eq!(tree.find_variable(body, "count", true, 3).unwrap(), Some(local));
        assert_eq!(tree.find_variable(root, "count", true, 3).unwrap(), Some(global));
    }

    #[test]
    fn test_duplicate_in_same_scope() {
        let mut tree = ScopeTree::new();
        let root = tree.create_root("test");
        tree.add_variable(root, "x", TypeId::NUMBER, VarStorage::Local, 1)
            .unwrap();
        let err = tree
            .add_variable(root, "x", TypeId::NUMBER, VarStorage::Local, 2)
            .unwrap_err();
        assert!(matches!(err, CompilerError::Duplicate { line: 2, .. }));
    }

    #[test]
    fn test_naming_conventions() {
        let mut tree = ScopeTree::new();
        let root = tree.create_root("test");
        assert!(tree
            .add_variable(root, "MAX", TypeId::NUMBER, VarStorage::Local, 1)
            .is_err());
        assert!(tree
            .add_variable(root, "while", TypeId::NUMBER, VarStorage::Local, 1)
            .is_err());
        assert!(tree.add_constant(root, constant("Max")).is_err());
        assert!(tree.add_constant(root, constant("MAX_SUPPLY")).is_ok());
        assert!(tree.find_constant(root, "MAX_SUPPLY").is_some());
    }

    #[test]
    fn test_missing_variable() {
        let mut tree = ScopeTree::new();
        let root = tree.create_root("test");
        assert_eq!(tree.find_variable(root, "ghost", false, 1).unwrap(), None);
        assert!(matches!(
            tree.find_variable(root, "ghost", true, 7),
            Err(CompilerError::UndeclaredVariable { line: 7, .. })
        ));
    }

    #[test]
    fn test_uppercase_rule() {
        assert!(is_all_uppercase("ABC_1"));
        assert!(!is_all_uppercase("Abc"));
        assert!(!is_all_uppercase("_1"));
        assert!(is_valid_variable_name("x1"));
        assert!(!is_valid_variable_name("1x"));
    }
}
