//! Module declarations
//!
//! Parses the items of contracts, tokens, organizations, NFTs, scripts and
//! descriptions, and assembles them into `Module` values.

use super::Parser;
use crate::ast::{Block, ExpressionKind, StatementKind};
use crate::error::{CompileResult, CompilerError};
use crate::library::{
    library_from_interface, LibraryDeclaration, LibraryRegistry, MethodImplementation,
    MethodInterface, MethodKind, MethodParameter,
};
use crate::module::compile::CONSTRUCTOR_NAME;
use crate::module::event::CUSTOM_EVENT_BASE;
use crate::module::trigger::{trigger_name, trigger_signature};
use crate::module::{
    Contract, EventDeclaration, EventDescription, MethodDeclaration, Module, ModuleKind, Script,
    TriggerSet,
};
use crate::parser::token::TokenKind;
use crate::symbols::{CollectionTypes, ConstDeclaration, ScopeId, VarId, VarStorage};
use crate::types::{TypeId, VarKind};
use std::rc::Rc;

/// Kind of the module being parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum ModuleTag {
    Contract,
    Token,
    Organization,
    Nft,
    Script,
    Description,
}

impl ModuleTag {
    fn from_keyword(keyword: &str) -> Option<Self> {
        let tag = match keyword {
            "contract" => ModuleTag::Contract,
            "token" => ModuleTag::Token,
            "organization" => ModuleTag::Organization,
            "nft" => ModuleTag::Nft,
            "script" => ModuleTag::Script,
            "description" => ModuleTag::Description,
            _ => return None,
        };
        Some(tag)
    }

    fn name(self) -> &'static str {
        match self {
            ModuleTag::Contract => "contract",
            ModuleTag::Token => "token",
            ModuleTag::Organization => "organization",
            ModuleTag::Nft => "nft",
            ModuleTag::Script => "script",
            ModuleTag::Description => "description",
        }
    }

    fn is_contract(self) -> bool {
        !self.is_script()
    }

    fn is_script(self) -> bool {
        matches!(self, ModuleTag::Script | ModuleTag::Description)
    }

    fn triggers(self) -> Option<TriggerSet> {
        match self {
            ModuleTag::Contract => Some(TriggerSet::Account),
            ModuleTag::Token => Some(TriggerSet::Token),
            ModuleTag::Organization => Some(TriggerSet::Organization),
            _ => None,
        }
    }
}

/// ROM and RAM types of an NFT and the token that owns it
#[derive(Debug, Clone)]
pub(super) struct NftInfo {
    rom: TypeId,
    ram: TypeId,
    token: String,
}

/// Declarations collected while a module is being parsed
pub(super) struct ModuleContext {
    pub(super) name: String,
    pub(super) tag: ModuleTag,
    pub(super) scope: ScopeId,
    line: u32,
    libraries: Vec<Rc<LibraryDeclaration>>,
    /// Methods of the module, callable as `this.name(...)`
    pub(super) this: LibraryDeclaration,
    methods: Vec<MethodDeclaration>,
    pub(super) events: Vec<EventDeclaration>,
    pub(super) nfts: Vec<Module>,
    script: Option<Script>,
    nft: Option<NftInfo>,
    /// Return type of the method being parsed
    pub(super) return_type: TypeId,
}

impl ModuleContext {
    fn new(
        name: &str,
        tag: ModuleTag,
        scope: ScopeId,
        line: u32,
        structs: LibraryDeclaration,
        nft: Option<NftInfo>,
    ) -> Self {
        Self {
            name: name.to_string(),
            tag,
            scope,
            line,
            libraries: vec![Rc::new(structs)],
            this: LibraryDeclaration::new("this"),
            methods: Vec::new(),
            events: Vec::new(),
            nfts: Vec::new(),
            script: None,
            nft,
            return_type: TypeId::NONE,
        }
    }

    pub(super) fn library(&self, name: &str) -> Option<Rc<LibraryDeclaration>> {
        self.libraries.iter().find(|l| l.name == name).cloned()
    }

    fn import(&mut self, library: Rc<LibraryDeclaration>, line: u32) -> CompileResult<()> {
        if self.library(&library.name).is_some() {
            return Err(CompilerError::Duplicate {
                line,
                name: library.name.clone(),
            });
        }
        log::debug!("{} imports {}", self.name, library.name);
        self.libraries.push(library);
        Ok(())
    }

    /// Symbol of the token this module belongs to
    pub(super) fn symbol(&self) -> Option<String> {
        match (&self.tag, &self.nft) {
            (ModuleTag::Token, _) => Some(self.name.clone()),
            (ModuleTag::Nft, Some(nft)) => Some(nft.token.clone()),
            _ => None,
        }
    }

    pub(super) fn find_event(&self, name: &str) -> Option<&EventDeclaration> {
        self.events.iter().find(|e| e.name == name)
    }
}

/// `isOpen` stays as is; `price` becomes `getPrice`
fn property_name(name: &str, ty: TypeId) -> String {
    let is_flag = ty == TypeId::BOOL
        && name
            .strip_prefix("is")
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c.is_ascii_uppercase());
    if is_flag {
        name.to_string()
    } else {
        format!("get{}", crate::library::declaration::capitalize(name))
    }
}

impl Parser<'_> {
    /// `contract name { ... }` and the other top-level module kinds
    pub(super) fn parse_module(&mut self) -> CompileResult<Module> {
        let keyword = self.fetch()?;
        let line = keyword.line();
        let tag = ModuleTag::from_keyword(&keyword.value).ok_or_else(|| {
            CompilerError::UnexpectedToken {
                line,
                token: keyword.value.clone(),
            }
        })?;
        let name = self.expect_identifier()?.value;
        if self.is_module_name(&name) {
            return Err(CompilerError::Duplicate { line, name });
        }

        self.begin_module(&name, tag, line, None);
        self.expect_separator("{")?;
        self.parse_module_items()?;
        self.end_module()
    }

    fn begin_module(&mut self, name: &str, tag: ModuleTag, line: u32, nft: Option<NftInfo>) {
        let scope = self.scopes.create_root(name);
        let structs = LibraryRegistry::struct_library(&self.types);
        self.contexts
            .push(ModuleContext::new(name, tag, scope, line, structs, nft));
    }

    fn end_module(&mut self) -> CompileResult<Module> {
        let line = self.line();
        let ctx = self
            .contexts
            .pop()
            .ok_or_else(|| CompilerError::internal(line, "no module is being parsed"))?;
        let libraries = ctx.libraries.iter().map(|l| l.name.clone()).collect();
        let contract = Contract {
            methods: ctx.methods,
            events: ctx.events,
        };

        let kind = match ctx.tag {
            ModuleTag::Contract => ModuleKind::Contract(contract),
            ModuleTag::Token => ModuleKind::Token {
                contract,
                nfts: ctx.nfts,
            },
            ModuleTag::Organization => ModuleKind::Organization(contract),
            ModuleTag::Nft => {
                let nft = ctx
                    .nft
                    .ok_or_else(|| CompilerError::internal(ctx.line, "NFT without ROM and RAM"))?;
                ModuleKind::Nft {
                    contract,
                    rom: nft.rom,
                    ram: nft.ram,
                    token: nft.token,
                }
            }
            ModuleTag::Script | ModuleTag::Description => {
                let script = ctx.script.ok_or_else(|| {
                    CompilerError::semantic(ctx.line, format!("{} has no code block", ctx.name))
                })?;
                if ctx.tag == ModuleTag::Script {
                    ModuleKind::Script(script)
                } else {
                    ModuleKind::Description(script)
                }
            }
        };

        Ok(Module {
            name: ctx.name,
            scope: ctx.scope,
            libraries,
            line: ctx.line,
            kind,
        })
    }

    fn parse_module_items(&mut self) -> CompileResult<()> {
        while !self.eat(TokenKind::Separator, "}") {
            self.parse_module_item()?;
        }
        Ok(())
    }

    fn parse_module_item(&mut self) -> CompileResult<()> {
        let token = self.fetch()?;
        let line = token.line();
        let tag = self.ctx()?.tag;
        if token.kind != TokenKind::Keyword {
            return Err(CompilerError::UnexpectedToken {
                line,
                token: token.value,
            });
        }

        let keyword = token.value.as_str();
        match keyword {
            "import" => self.parse_import(line),
            "const" => self.parse_const(line),
            "global" => {
                require(tag.is_contract(), keyword, tag, line)?;
                self.parse_global(line)
            }
            "event" => {
                require(tag.is_contract(), keyword, tag, line)?;
                self.parse_event(line)
            }
            "constructor" => {
                require(tag.is_contract(), keyword, tag, line)?;
                self.parse_method(CONSTRUCTOR_NAME.to_string(), MethodKind::Constructor, true, line)
            }
            "property" => {
                require(tag.is_contract(), keyword, tag, line)?;
                self.parse_property(line)
            }
            "public" | "private" => {
                require(tag.is_contract(), keyword, tag, line)?;
                let name = self.expect_identifier()?.value;
                self.parse_method(name, MethodKind::Method, keyword == "public", line)
            }
            "task" => {
                require(tag.is_contract(), keyword, tag, line)?;
                let name = self.expect_identifier()?.value;
                self.parse_method(name, MethodKind::Task, true, line)
            }
            "trigger" => {
                let set = tag.triggers().ok_or_else(|| {
                    CompilerError::semantic(
                        line,
                        format!("a {} cannot declare triggers", tag.name()),
                    )
                })?;
                let name = trigger_name(&self.expect_identifier()?.value);
                if !set.contains(&name) {
                    return Err(CompilerError::semantic(
                        line,
                        format!("{} is not a valid trigger for a {}", name, tag.name()),
                    ));
                }
                self.parse_method(name, MethodKind::Trigger, true, line)
            }
            "code" => {
                require(tag.is_script(), keyword, tag, line)?;
                self.parse_code(line)
            }
            "nft" => {
                require(tag == ModuleTag::Token, keyword, tag, line)?;
                self.parse_nft(line)
            }
            _ => Err(CompilerError::UnexpectedToken {
                line,
                token: token.value.clone(),
            }),
        }
    }

    /// `import Runtime;` or `import Some.Contract;`
    fn parse_import(&mut self, line: u32) -> CompileResult<()> {
        let mut name = self.expect_identifier()?.value;
        while self.eat(TokenKind::Selector, ".") {
            name.push('.');
            name.push_str(&self.expect_member()?.value);
        }
        self.expect_separator(";")?;

        let library = if name.contains('.') {
            let abi = self
                .resolver
                .resolve(&name)
                .ok_or_else(|| CompilerError::UnknownLibrary {
                    line,
                    name: name.clone(),
                })?;
            Rc::new(library_from_interface(&name, &abi))
        } else {
            self.registry.load(&name, &mut self.types, line)?
        };
        self.ctx_mut()?.import(library, line)
    }

    /// `const NAME: type = literal;`
    fn parse_const(&mut self, line: u32) -> CompileResult<()> {
        let name = self.expect_identifier()?.value;
        self.expect_separator(":")?;
        let ty = self.parse_type()?;
        self.expect_operator("=")?;
        let scope = self.ctx()?.scope;
        let literal = self.parse_expression(scope)?;
        let literal = self.coerce(literal, ty, line)?;
        let ExpressionKind::Literal(value) = literal.kind else {
            return Err(CompilerError::semantic(
                line,
                format!("constant {} must be a literal", name),
            ));
        };
        self.expect_separator(";")?;

        self.scopes.add_constant(
            scope,
            ConstDeclaration {
                name,
                ty,
                value,
                line,
            },
        )
    }

    /// `global name: type;` including the storage collections
    fn parse_global(&mut self, line: u32) -> CompileResult<()> {
        let name = self.expect_identifier()?.value;
        self.expect_separator(":")?;
        let scope = self.ctx()?.scope;

        let next = self.current()?.clone();
        let kind = match next.kind {
            TokenKind::Type => VarKind::from_type_name(&next.value),
            _ => None,
        };
        match kind {
            Some(kind) if kind.is_storage_collection() => {
                self.pos += 1;
                self.expect_operator("<")?;
                let key = if kind == VarKind::StorageMap {
                    let key = self.parse_type()?;
                    self.expect_separator(",")?;
                    Some(key)
                } else {
                    None
                };
                let value = self.parse_type()?;
                self.expect_close_angle()?;
                let ty = self.types.primitive(kind)?;
                self.scopes
                    .add_collection(scope, &name, ty, CollectionTypes { key, value }, line)?;
            }
            _ => {
                let ty = self.parse_type()?;
                self.scopes
                    .add_variable(scope, &name, ty, VarStorage::Global, line)?;
            }
        }
        self.expect_separator(";")?;
        Ok(())
    }

    /// `event Name: type = "template" | 0xbytes | DescriptionModule;`
    fn parse_event(&mut self, line: u32) -> CompileResult<()> {
        let name = self.expect_identifier()?.value;
        self.expect_separator(":")?;
        let ty = self.parse_type()?;
        self.expect_operator("=")?;

        let token = self.fetch()?;
        let description = match token.kind {
            TokenKind::String => {
                EventDescription::Template(token.value.trim_matches('"').to_string())
            }
            TokenKind::Bytes => EventDescription::Bytes(
                token
                    .value
                    .strip_prefix("0x")
                    .unwrap_or(&token.value)
                    .to_string(),
            ),
            TokenKind::Identifier => {
                self.check_description(&token.value, ty, token.line())?;
                EventDescription::Module(token.value.clone())
            }
            _ => {
                return Err(CompilerError::expected(
                    token.line(),
                    "event description",
                    token.value,
                ))
            }
        };
        self.expect_separator(";")?;

        let ctx = self.ctx_mut()?;
        if ctx.find_event(&name).is_some() {
            return Err(CompilerError::Duplicate { line, name });
        }
        let value = u8::try_from(ctx.events.len())
            .ok()
            .and_then(|index| CUSTOM_EVENT_BASE.checked_add(index))
            .ok_or_else(|| CompilerError::semantic(line, "too many events"))?;
        ctx.events.push(EventDeclaration {
            name,
            value,
            return_type: ty,
            description,
            line,
        });
        Ok(())
    }

    /// An event may only use a description whose data parameter takes its type
    fn check_description(&self, name: &str, ty: TypeId, line: u32) -> CompileResult<()> {
        let module = self
            .modules
            .iter()
            .find(|m| m.name == name)
            .ok_or_else(|| CompilerError::UnknownIdentifier {
                line,
                name: name.to_string(),
            })?;
        let ModuleKind::Description(script) = &module.kind else {
            return Err(CompilerError::semantic(
                line,
                format!("{} is not a description", name),
            ));
        };
        let param = script
            .parameters
            .get(1)
            .map(|&v| self.scopes.variable(v).ty)
            .ok_or_else(|| CompilerError::internal(line, "description without data parameter"))?;
        if !self.types.accepts(param, ty) {
            return Err(CompilerError::WrongType {
                line,
                expected: self.types.display(param),
                found: self.types.display(ty),
            });
        }
        Ok(())
    }

    /// `(name: type, ...)`, declared as arguments in `scope`
    fn parse_parameters(&mut self, scope: ScopeId) -> CompileResult<Vec<VarId>> {
        self.expect_separator("(")?;
        let mut parameters = Vec::new();
        if self.eat(TokenKind::Separator, ")") {
            return Ok(parameters);
        }
        loop {
            let name = self.expect_identifier()?;
            self.expect_separator(":")?;
            let ty = self.parse_type()?;
            parameters.push(self.scopes.add_variable(
                scope,
                &name.value,
                ty,
                VarStorage::Argument,
                name.line(),
            )?);
            if self.eat(TokenKind::Separator, ")") {
                return Ok(parameters);
            }
            self.expect_separator(",")?;
        }
    }

    fn parameter_types(&self, parameters: &[VarId]) -> Vec<TypeId> {
        parameters
            .iter()
            .map(|&v| self.scopes.variable(v).ty)
            .collect()
    }

    fn parse_method(
        &mut self,
        name: String,
        kind: MethodKind,
        is_public: bool,
        line: u32,
    ) -> CompileResult<()> {
        let module_scope = self.ctx()?.scope;
        let scope = self.scopes.create_child(module_scope);
        let parameters = self.parse_parameters(scope)?;
        let declared = if self.eat(TokenKind::Separator, ":") {
            Some(self.parse_type()?)
        } else {
            None
        };
        let return_type = self.check_signature(&name, kind, &parameters, declared, line)?;

        let interface =
            self.declare_method(&name, kind, is_public, &parameters, return_type, line)?;
        let body = self.parse_method_body(&name, scope, return_type, line)?;
        self.push_method(interface, scope, parameters, body, line)
    }

    /// Check the parameters and return type a method kind requires
    fn check_signature(
        &self,
        name: &str,
        kind: MethodKind,
        parameters: &[VarId],
        declared: Option<TypeId>,
        line: u32,
    ) -> CompileResult<TypeId> {
        let types = self.parameter_types(parameters);
        match kind {
            MethodKind::Method | MethodKind::Property => Ok(declared.unwrap_or(TypeId::NONE)),
            MethodKind::Constructor => {
                if types != [TypeId::ADDRESS] {
                    return Err(CompilerError::semantic(
                        line,
                        "constructor must take exactly one address parameter",
                    ));
                }
                no_return_type(name, declared, line)
            }
            MethodKind::Task => {
                if !types.is_empty() {
                    return Err(CompilerError::semantic(
                        line,
                        format!("task {} cannot take parameters", name),
                    ));
                }
                match declared {
                    None | Some(TypeId::BOOL) => Ok(TypeId::BOOL),
                    Some(other) => Err(CompilerError::WrongType {
                        line,
                        expected: "bool".to_string(),
                        found: self.types.display(other),
                    }),
                }
            }
            MethodKind::Trigger => {
                let expected = trigger_signature(name).ok_or_else(|| {
                    CompilerError::internal(line, format!("no signature for trigger {}", name))
                })?;
                if types != expected {
                    let list = expected
                        .iter()
                        .map(|&ty| self.types.display(ty))
                        .collect::<Vec<_>>()
                        .join(", ");
                    return Err(CompilerError::semantic(
                        line,
                        format!("trigger {} must take ({})", name, list),
                    ));
                }
                no_return_type(name, declared, line)
            }
        }
    }

    /// Register the method so calls to it, including recursive ones, resolve
    fn declare_method(
        &mut self,
        name: &str,
        kind: MethodKind,
        is_public: bool,
        parameters: &[VarId],
        return_type: TypeId,
        line: u32,
    ) -> CompileResult<MethodInterface> {
        let parameters = parameters
            .iter()
            .map(|&v| {
                let decl = self.scopes.variable(v);
                MethodParameter {
                    name: decl.name.clone(),
                    ty: decl.ty,
                }
            })
            .collect();
        let mut interface = MethodInterface::new(
            "this",
            name,
            MethodImplementation::LocalCall,
            return_type,
            parameters,
        );
        interface.kind = kind;
        interface.is_public = is_public;

        let module_scope = self.ctx()?.scope;
        self.scopes.add_method(module_scope, name, line)?;
        self.ctx_mut()?.this.insert(interface.clone());
        Ok(interface)
    }

    fn parse_method_body(
        &mut self,
        name: &str,
        scope: ScopeId,
        return_type: TypeId,
        line: u32,
    ) -> CompileResult<Block> {
        self.ctx_mut()?.return_type = return_type;
        let body = self.parse_block(scope)?;
        self.ctx_mut()?.return_type = TypeId::NONE;

        if return_type != TypeId::NONE && !body.always_returns() {
            return Err(CompilerError::semantic(
                line,
                format!("{} must return a value on every path", name),
            ));
        }
        Ok(body)
    }

    fn push_method(
        &mut self,
        interface: MethodInterface,
        scope: ScopeId,
        parameters: Vec<VarId>,
        body: Block,
        line: u32,
    ) -> CompileResult<()> {
        let meta = self.meta(line);
        self.ctx_mut()?.methods.push(MethodDeclaration {
            interface,
            scope,
            parameters,
            body,
            meta,
        });
        Ok(())
    }

    /// `property name: type = expr;` or `property name: type { ... }`
    fn parse_property(&mut self, line: u32) -> CompileResult<()> {
        let name = self.expect_identifier()?.value;
        self.expect_separator(":")?;
        let ty = self.parse_type()?;
        let accessor = property_name(&name, ty);

        let module_scope = self.ctx()?.scope;
        let scope = self.scopes.create_child(module_scope);
        let interface = self.declare_method(&accessor, MethodKind::Property, true, &[], ty, line)?;

        let body = if self.eat(TokenKind::Operator, "=") {
            let body_scope = self.scopes.create_child(scope);
            let value = self.parse_expression(body_scope)?;
            let value = self.coerce(value, ty, line)?;
            self.expect_separator(";")?;
            let statement = self.statement(line, StatementKind::Return(Some(value)));
            Block {
                scope: body_scope,
                statements: vec![statement],
            }
        } else {
            self.parse_method_body(&accessor, scope, ty, line)?
        };
        self.push_method(interface, scope, Vec::new(), body, line)
    }

    /// `code(params) [: type] { ... }` of a script or description
    fn parse_code(&mut self, line: u32) -> CompileResult<()> {
        let ctx = self.ctx()?;
        let (tag, module_scope) = (ctx.tag, ctx.scope);
        if ctx.script.is_some() {
            return Err(CompilerError::Duplicate {
                line,
                name: "code".to_string(),
            });
        }

        let scope = self.scopes.create_child(module_scope);
        let parameters = self.parse_parameters(scope)?;
        if tag == ModuleTag::Description
            && self.parameter_types(&parameters) != [TypeId::ADDRESS, TypeId::ANY]
        {
            return Err(CompilerError::semantic(
                line,
                "description code must take (address, any)",
            ));
        }
        let return_type = if self.eat(TokenKind::Separator, ":") {
            self.parse_type()?
        } else {
            TypeId::NONE
        };

        let body = self.parse_method_body("code", scope, return_type, line)?;
        let meta = self.meta(line);
        self.ctx_mut()?.script = Some(Script {
            scope,
            parameters,
            body,
            return_type,
            meta,
        });
        Ok(())
    }

    /// `nft Name<Rom, Ram> { ... }` inside a token
    fn parse_nft(&mut self, line: u32) -> CompileResult<()> {
        let name = self.expect_identifier()?.value;
        self.expect_operator("<")?;
        let rom = self.parse_type()?;
        self.expect_separator(",")?;
        let ram = self.parse_type()?;
        self.expect_close_angle()?;
        if self.is_module_name(&name) {
            return Err(CompilerError::Duplicate { line, name });
        }

        let token = self.ctx()?.name.clone();
        self.begin_module(&name, ModuleTag::Nft, line, Some(NftInfo { rom, ram, token }));
        let scope = self.ctx()?.scope;
        for (implicit, ty) in [
            ("_tokenID", TypeId::NUMBER),
            ("_seriesID", TypeId::NUMBER),
            ("_mintID", TypeId::NUMBER),
            ("_ROM", rom),
            ("_RAM", ram),
        ] {
            self.scopes
                .add_variable(scope, implicit, ty, VarStorage::Nft, line)?;
        }

        self.expect_separator("{")?;
        self.parse_module_items()?;
        let module = self.end_module()?;
        self.ctx_mut()?.nfts.push(module);
        Ok(())
    }
}

fn require(allowed: bool, keyword: &str, tag: ModuleTag, line: u32) -> CompileResult<()> {
    if allowed {
        Ok(())
    } else {
        Err(CompilerError::semantic(
            line,
            format!("{} is not allowed in a {}", keyword, tag.name()),
        ))
    }
}

fn no_return_type(name: &str, declared: Option<TypeId>, line: u32) -> CompileResult<TypeId> {
    match declared {
        None => Ok(TypeId::NONE),
        Some(_) => Err(CompilerError::semantic(
            line,
            format!("{} cannot return a value", name),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_names() {
        assert_eq!(property_name("isOpen", TypeId::BOOL), "isOpen");
        assert_eq!(property_name("price", TypeId::NUMBER), "getPrice");
        assert_eq!(property_name("isOpen", TypeId::NUMBER), "getIsOpen");
        assert_eq!(property_name("island", TypeId::BOOL), "getIsland");
    }

    #[test]
    fn test_module_tags() {
        assert_eq!(ModuleTag::from_keyword("token"), Some(ModuleTag::Token));
        assert_eq!(ModuleTag::from_keyword("struct"), None);
        assert!(ModuleTag::Nft.is_contract());
        assert!(ModuleTag::Description.is_script());
        assert_eq!(ModuleTag::Nft.triggers(), None);
    }

    #[test]
    fn test_methods_are_registered_on_this() {
        let source = "contract test {\n\
                      public a(): number { return 1; }\n\
                      public b(): number { return this.a(); }\n\
                      }";
        let compilation = Parser::new(source).unwrap().process().unwrap();
        let contract = compilation.modules[0].contract().unwrap();
        assert_eq!(contract.methods.len(), 2);
        assert_eq!(contract.methods[1].interface.return_type, TypeId::NUMBER);
    }

    #[test]
    fn test_description_signature() {
        let good = "description show { code(from: address, data: any): string { return \"x\"; } }";
        assert!(Parser::new(good).unwrap().process().is_ok());

        let bad = "description show { code(from: address, data: number): string { return \"x\"; } }";
        let err = Parser::new(bad).unwrap().process().unwrap_err();
        assert!(matches!(err, CompilerError::Semantic { .. }));
    }
}
