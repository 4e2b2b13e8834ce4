//! Recursive-descent parser
//!
//! Builds typed modules straight from the token stream. Names are resolved
//! and types are checked while parsing, so the AST handed to code
//! generation only has register-level checks left.

mod expr;
mod module;
mod stmt;
mod types;

use crate::ast::{Expression, ExpressionKind, NodeId, NodeMeta, Statement, StatementKind};
use crate::error::{CompileResult, CompilerError};
use crate::library::{AbiResolver, LibraryRegistry, NoAbiResolver};
use crate::module::Module;
use crate::parser::lexer::Lexer;
use crate::parser::token::{Token, TokenKind};
use crate::symbols::ScopeTree;
use crate::types::{TypeContext, TypeId};
use module::ModuleContext;

static NO_RESOLVER: NoAbiResolver = NoAbiResolver;

/// Everything the parser produced, ready for code generation
#[derive(Debug)]
pub struct Compilation {
    pub types: TypeContext,
    pub scopes: ScopeTree,
    pub registry: LibraryRegistry,
    /// Top-level modules in source order
    pub modules: Vec<Module>,
}

impl Compilation {
    /// Find a module by name, including NFT sub-modules
    pub fn find_module(&self, name: &str) -> Option<&Module> {
        self.modules.iter().find_map(|m| {
            if m.name == name {
                Some(m)
            } else {
                m.sub_modules().iter().find(|sub| sub.name == name)
            }
        })
    }
}

pub struct Parser<'r> {
    tokens: Vec<Token>,
    pos: usize,
    next_node: u32,
    types: TypeContext,
    scopes: ScopeTree,
    registry: LibraryRegistry,
    resolver: &'r dyn AbiResolver,
    /// Modules being parsed; an NFT sits on top of its token
    contexts: Vec<ModuleContext>,
    /// Finished top-level modules
    modules: Vec<Module>,
}

impl Parser<'static> {
    /// Parser without external ABI lookup
    pub fn new(source: &str) -> CompileResult<Self> {
        Parser::with_resolver(source, &NO_RESOLVER)
    }
}

impl<'r> Parser<'r> {
    pub fn with_resolver(source: &str, resolver: &'r dyn AbiResolver) -> CompileResult<Self> {
        let tokens = Lexer::process(source);
        log::debug!("lexed {} tokens", tokens.len());
        Ok(Self {
            tokens,
            pos: 0,
            next_node: 0,
            types: TypeContext::new(),
            scopes: ScopeTree::new(),
            registry: LibraryRegistry::new()?,
            resolver,
            contexts: Vec::new(),
            modules: Vec::new(),
        })
    }

    /// Parse the whole source file
    pub fn process(mut self) -> CompileResult<Compilation> {
        while let Some(token) = self.peek(0) {
            let token = token.clone();
            match (token.kind, token.value.as_str()) {
                (TokenKind::Keyword, "struct") => self.parse_struct()?,
                (TokenKind::Keyword, "enum") => self.parse_enum()?,
                (
                    TokenKind::Keyword,
                    "contract" | "token" | "organization" | "script" | "description",
                ) => {
                    let module = self.parse_module()?;
                    log::debug!("parsed {} {}", module.kind.name(), module.name);
                    self.modules.push(module);
                }
                _ => {
                    return Err(CompilerError::UnexpectedToken {
                        line: token.line(),
                        token: token.value,
                    })
                }
            }
        }

        Ok(Compilation {
            types: self.types,
            scopes: self.scopes,
            registry: self.registry,
            modules: self.modules,
        })
    }

    // Token cursor

    fn peek(&self, offset: usize) -> Option<&Token> {
        self.tokens.get(self.pos + offset)
    }

    fn current(&self) -> CompileResult<&Token> {
        self.tokens
            .get(self.pos)
            .ok_or(CompilerError::UnexpectedEof { line: self.line() })
    }

    /// Line of the current token, or of the last one at end of input
    fn line(&self) -> u32 {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(1, Token::line)
    }

    fn fetch(&mut self) -> CompileResult<Token> {
        let token = self.current()?.clone();
        self.pos += 1;
        Ok(token)
    }

    fn check(&self, kind: TokenKind, value: &str) -> bool {
        self.peek(0).is_some_and(|t| t.is(kind, value))
    }

    fn eat(&mut self, kind: TokenKind, value: &str) -> bool {
        let found = self.check(kind, value);
        if found {
            self.pos += 1;
        }
        found
    }

    fn expect(&mut self, kind: TokenKind, value: &str) -> CompileResult<Token> {
        let token = self.fetch()?;
        if token.is(kind, value) {
            Ok(token)
        } else {
            Err(CompilerError::expected(
                token.line(),
                format!("`{}`", value),
                token.value,
            ))
        }
    }

    fn expect_separator(&mut self, value: &str) -> CompileResult<Token> {
        self.expect(TokenKind::Separator, value)
    }

    fn expect_operator(&mut self, value: &str) -> CompileResult<Token> {
        self.expect(TokenKind::Operator, value)
    }

    fn expect_identifier(&mut self) -> CompileResult<Token> {
        let token = self.fetch()?;
        if token.kind == TokenKind::Identifier {
            Ok(token)
        } else {
            Err(CompilerError::expected(token.line(), "identifier", token.value))
        }
    }

    /// Consume a closing `>`, splitting a `>>` left by nested type arguments
    fn expect_close_angle(&mut self) -> CompileResult<()> {
        if let Some(token) = self.tokens.get_mut(self.pos) {
            if token.is(TokenKind::Operator, ">>") {
                token.value = ">".to_string();
                return Ok(());
            }
        }
        self.expect_operator(">").map(|_| ())
    }

    /// Name after a `.`; library methods may share a keyword or type name
    fn expect_member(&mut self) -> CompileResult<Token> {
        let token = self.fetch()?;
        match token.kind {
            TokenKind::Identifier | TokenKind::Keyword | TokenKind::Type => Ok(token),
            _ => Err(CompilerError::expected(token.line(), "member name", token.value)),
        }
    }

    // Node construction

    fn meta(&mut self, line: u32) -> NodeMeta {
        self.next_node += 1;
        NodeMeta {
            id: NodeId(self.next_node),
            line,
        }
    }

    fn expression(&mut self, line: u32, ty: TypeId, kind: ExpressionKind) -> Expression {
        Expression {
            meta: self.meta(line),
            ty,
            kind,
        }
    }

    fn statement(&mut self, line: u32, kind: StatementKind) -> Statement {
        Statement {
            meta: self.meta(line),
            kind,
        }
    }

    fn ctx(&self) -> CompileResult<&ModuleContext> {
        self.contexts
            .last()
            .ok_or_else(|| CompilerError::internal(self.line(), "no module is being parsed"))
    }

    fn ctx_mut(&mut self) -> CompileResult<&mut ModuleContext> {
        let line = self.line();
        self.contexts
            .last_mut()
            .ok_or_else(|| CompilerError::internal(line, "no module is being parsed"))
    }
}
