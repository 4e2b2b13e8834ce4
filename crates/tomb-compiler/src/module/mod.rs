//! Compilation units
//!
//! A source file declares one or more modules. Contracts, tokens,
//! organizations and NFTs hold methods and events; scripts and descriptions
//! hold a single body. Each kind carries its own payload so the parser and
//! the driver match on it instead of probing types at runtime.

pub mod abi;
pub mod assembler;
pub mod compile;
pub mod event;
pub mod trigger;

use crate::ast::{Block, NodeMeta};
use crate::library::MethodInterface;
use crate::symbols::{ScopeId, VarId};
use crate::types::TypeId;

pub use abi::{ContractEvent, ContractInterface, ContractMethod, ContractParameter};
pub use assembler::{Assembler, AssemblerError, Assembly, DebugInfo, DebugRange};
pub use compile::{CompiledModule, ModuleArtifacts};
pub use event::{EventDeclaration, EventDescription};
pub use trigger::TriggerSet;

/// A method with its parsed body
#[derive(Debug, Clone, PartialEq)]
pub struct MethodDeclaration {
    pub interface: MethodInterface,
    /// Scope holding the parameters; the body scope is its child
    pub scope: ScopeId,
    pub parameters: Vec<VarId>,
    pub body: Block,
    pub meta: NodeMeta,
}

impl MethodDeclaration {
    pub fn name(&self) -> &str {
        &self.interface.name
    }

    pub fn line(&self) -> u32 {
        self.meta.line
    }
}

/// Methods and events of a contract-like module
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Contract {
    pub methods: Vec<MethodDeclaration>,
    pub events: Vec<EventDeclaration>,
}

impl Contract {
    pub fn find_method(&self, name: &str) -> Option<&MethodDeclaration> {
        self.methods.iter().find(|m| m.name() == name)
    }

    pub fn find_event(&self, name: &str) -> Option<&EventDeclaration> {
        self.events.iter().find(|e| e.name == name)
    }
}

/// Body of a script or description module
#[derive(Debug, Clone, PartialEq)]
pub struct Script {
    pub scope: ScopeId,
    pub parameters: Vec<VarId>,
    pub body: Block,
    pub return_type: TypeId,
    pub meta: NodeMeta,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModuleKind {
    Contract(Contract),
    Token {
        contract: Contract,
        nfts: Vec<Module>,
    },
    Organization(Contract),
    Nft {
        contract: Contract,
        rom: TypeId,
        ram: TypeId,
        /// Symbol of the owning token
        token: String,
    },
    Script(Script),
    Description(Script),
}

impl ModuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            ModuleKind::Contract(_) => "contract",
            ModuleKind::Token { .. } => "token",
            ModuleKind::Organization(_) => "organization",
            ModuleKind::Nft { .. } => "nft",
            ModuleKind::Script(_) => "script",
            ModuleKind::Description(_) => "description",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub scope: ScopeId,
    /// Names of the libraries visible inside the module
    pub libraries: Vec<String>,
    pub line: u32,
    pub kind: ModuleKind,
}

impl Module {
    /// Methods and events, for contract-like modules
    pub fn contract(&self) -> Option<&Contract> {
        match &self.kind {
            ModuleKind::Contract(contract)
            | ModuleKind::Organization(contract)
            | ModuleKind::Token { contract, .. }
            | ModuleKind::Nft { contract, .. } => Some(contract),
            ModuleKind::Script(_) | ModuleKind::Description(_) => None,
        }
    }

    pub fn script(&self) -> Option<&Script> {
        match &self.kind {
            ModuleKind::Script(script) | ModuleKind::Description(script) => Some(script),
            _ => None,
        }
    }

    /// Nested NFT modules of a token
    pub fn sub_modules(&self) -> &[Module] {
        match &self.kind {
            ModuleKind::Token { nfts, .. } => nfts,
            _ => &[],
        }
    }

    pub fn is_nft(&self) -> bool {
        matches!(self.kind, ModuleKind::Nft { .. })
    }

    /// Triggers this module kind may declare
    pub fn triggers(&self) -> Option<TriggerSet> {
        TriggerSet::for_kind(&self.kind)
    }
}
