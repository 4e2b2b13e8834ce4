//! Library registry
//!
//! Owns the builtin table, hands out standard libraries and specializes the
//! generic collection libraries for storage globals. Specializations are
//! cached by template name and concrete type signature, so every collection
//! with the same key/value types shares one library.

use super::builtins::Builtins;
use super::declaration::{CustomCodegen, LibraryDeclaration, MethodImplementation};
use super::stdlib::{self, LIBRARY_NAMES};
use crate::error::{CompileResult, CompilerError};
use crate::symbols::VarDeclaration;
use crate::types::{TypeContext, TypeId, VarKind};
use rustc_hash::FxHashMap;
use std::rc::Rc;

#[derive(Debug)]
pub struct LibraryRegistry {
    builtins: Builtins,
    loaded: FxHashMap<String, Rc<LibraryDeclaration>>,
    patched: FxHashMap<(String, String), Rc<LibraryDeclaration>>,
}

impl LibraryRegistry {
    pub fn new() -> CompileResult<Self> {
        Ok(Self::with_builtins(Builtins::load()?))
    }

    pub fn with_builtins(builtins: Builtins) -> Self {
        Self {
            builtins,
            loaded: FxHashMap::default(),
            patched: FxHashMap::default(),
        }
    }

    pub fn builtins(&self) -> &Builtins {
        &self.builtins
    }

    /// Whether `name` can be imported
    pub fn is_known(&self, name: &str) -> bool {
        LIBRARY_NAMES.contains(&name)
    }

    /// Get a standard library, building it on first use
    pub fn load(
        &mut self,
        name: &str,
        types: &mut TypeContext,
        line: u32,
    ) -> CompileResult<Rc<LibraryDeclaration>> {
        if let Some(lib) = self.loaded.get(name) {
            return Ok(Rc::clone(lib));
        }
        if !self.is_known(name) {
            return Err(CompilerError::UnknownLibrary {
                line,
                name: name.to_string(),
            });
        }

        let lib = Rc::new(self.build(name, types, line)?);
        log::debug!("loaded library {} ({} methods)", name, lib.methods().len());
        self.loaded.insert(name.to_string(), Rc::clone(&lib));
        Ok(lib)
    }

    fn build(
        &self,
        name: &str,
        types: &mut TypeContext,
        line: u32,
    ) -> CompileResult<LibraryDeclaration> {
        let mut lib = stdlib::create(name, types).ok_or_else(|| CompilerError::UnknownLibrary {
            line,
            name: name.to_string(),
        })?;
        for builtin in self.builtins.for_library(name) {
            lib.insert(builtin.interface(types)?);
        }
        Ok(lib)
    }

    /// Specialize the library backing a storage collection global
    pub fn patch_collection(
        &mut self,
        decl: &VarDeclaration,
        types: &mut TypeContext,
    ) -> CompileResult<Rc<LibraryDeclaration>> {
        match types.kind(decl.ty) {
            VarKind::StorageMap => self.patch_map(decl, types),
            VarKind::StorageList => self.patch_list(decl, types),
            VarKind::StorageSet => self.patch_set(decl, types),
            _ => Err(CompilerError::internal(
                decl.line,
                format!("{} is not a storage collection", decl.name),
            )),
        }
    }

    pub fn patch_map(
        &mut self,
        decl: &VarDeclaration,
        types: &mut TypeContext,
    ) -> CompileResult<Rc<LibraryDeclaration>> {
        let collection = self.collection_types(decl)?;
        let key = collection.key.ok_or_else(|| {
            CompilerError::internal(decl.line, format!("map {} has no key type", decl.name))
        })?;
        self.patch("Map", &[key, collection.value], types, decl.line)
    }

    pub fn patch_list(
        &mut self,
        decl: &VarDeclaration,
        types: &mut TypeContext,
    ) -> CompileResult<Rc<LibraryDeclaration>> {
        let collection = self.collection_types(decl)?;
        self.patch("List", &[collection.value], types, decl.line)
    }

    pub fn patch_set(
        &mut self,
        decl: &VarDeclaration,
        types: &mut TypeContext,
    ) -> CompileResult<Rc<LibraryDeclaration>> {
        let collection = self.collection_types(decl)?;
        self.patch("Set", &[collection.value], types, decl.line)
    }

    fn collection_types(
        &self,
        decl: &VarDeclaration,
    ) -> CompileResult<crate::symbols::CollectionTypes> {
        decl.collection.ok_or_else(|| {
            CompilerError::internal(
                decl.line,
                format!("{} carries no collection types", decl.name),
            )
        })
    }

    fn patch(
        &mut self,
        template: &str,
        args: &[TypeId],
        types: &mut TypeContext,
        line: u32,
    ) -> CompileResult<Rc<LibraryDeclaration>> {
        let signature = args
            .iter()
            .map(|ty| types.display(*ty))
            .collect::<Vec<_>>()
            .join(",");
        let key = (template.to_string(), signature);
        if let Some(lib) = self.patched.get(&key) {
            return Ok(Rc::clone(lib));
        }

        let base = self.build(template, types, line)?;
        let mut lib = base.clone_as(&format!("{}<{}>", template, key.1));
        lib.patch_generics(types, args);
        log::debug!("specialized {}", lib.name);

        let lib = Rc::new(lib);
        self.patched.insert(key, Rc::clone(&lib));
        Ok(lib)
    }

    /// One constructor per declared struct, packing its fields in order
    pub fn struct_library(types: &TypeContext) -> LibraryDeclaration {
        let mut lib = LibraryDeclaration::new("Struct");
        for decl in types.structs() {
            let Some(ty) = types.named_type(&decl.name) else {
                continue;
            };
            let params: Vec<(&str, TypeId)> = decl
                .fields
                .iter()
                .map(|f| (f.name.as_str(), f.ty))
                .collect();
            lib.add_method(
                &decl.name,
                MethodImplementation::Custom(CustomCodegen::StructConstructor(decl.name.clone())),
                ty,
                &params,
            );
        }
        lib
    }
}
