//! Module compilation driver
//!
//! Compiles NFT sub-modules first, generates the module's assembly, hands it
//! to the assembler and builds the ABI from the entry labels it reports.

use super::abi::{ContractEvent, ContractInterface, ContractMethod, ContractParameter};
use super::assembler::{Assembler, Assembly, DebugInfo};
use super::event::{template_asm, EventDescription};
use super::{Contract, Module, ModuleKind};
use crate::codegen::{CodeGenerator, CodegenEnv, GeneratedCode, Labels, MethodEnv, RegisterStats};
use crate::config::CompilerConfig;
use crate::error::{CompileResult, CompilerError};
use crate::library::{Builtins, MethodKind};
use crate::symbols::ScopeTree;
use crate::types::{TypeContext, TypeId, VmType};
use rustc_hash::FxHashMap;

/// Name of the constructor entry point in the ABI
pub const CONSTRUCTOR_NAME: &str = "Initialize";

/// Script and ABI bytes of a compiled module, as referenced by later ones
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleArtifacts {
    pub script: Vec<u8>,
    pub abi: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledModule {
    pub name: String,
    pub kind: &'static str,
    pub asm: Vec<String>,
    pub script: Vec<u8>,
    /// Present for contract-like modules
    pub abi: Option<ContractInterface>,
    pub debug_info: DebugInfo,
    pub sub_modules: Vec<CompiledModule>,
    pub register_stats: RegisterStats,
}

impl CompiledModule {
    /// The `.asm` file contents
    pub fn asm_text(&self) -> String {
        let mut text = self.asm.join("\n");
        text.push('\n');
        text
    }

    pub fn find(&self, name: &str) -> Option<&CompiledModule> {
        if self.name == name {
            return Some(self);
        }
        self.sub_modules.iter().find_map(|m| m.find(name))
    }
}

/// Compiles the modules of one source file in order
pub struct ModuleCompiler<'a> {
    types: &'a TypeContext,
    scopes: &'a ScopeTree,
    builtins: &'a Builtins,
    config: &'a CompilerConfig,
    source: &'a str,
    assembler: &'a dyn Assembler,
    artifacts: FxHashMap<String, ModuleArtifacts>,
}

impl<'a> ModuleCompiler<'a> {
    pub fn new(
        types: &'a TypeContext,
        scopes: &'a ScopeTree,
        builtins: &'a Builtins,
        config: &'a CompilerConfig,
        source: &'a str,
        assembler: &'a dyn Assembler,
    ) -> Self {
        Self {
            types,
            scopes,
            builtins,
            config,
            source,
            assembler,
            artifacts: FxHashMap::default(),
        }
    }

    pub fn compile(&mut self, module: &Module) -> CompileResult<CompiledModule> {
        log::debug!("compiling {} {}", module.kind.name(), module.name);

        let mut sub_modules = Vec::new();
        for nft in module.sub_modules() {
            log::debug!("compiling sub-module {} of {}", nft.name, module.name);
            sub_modules.push(self.compile(nft)?);
        }

        let generated = self.generate(module)?;
        let mut asm = generated.lines;
        for label in &generated.builtins {
            if let Some(builtin) = self.builtins.find_by_label(label) {
                asm.extend(builtin.body.iter().cloned());
            }
        }

        let assembly = self.assemble(&module.name, &asm)?;
        let abi = match module.contract() {
            Some(contract) => Some(self.build_abi(module, contract, &assembly)?),
            None => None,
        };

        let abi_bytes = match &abi {
            Some(abi) => abi.to_bytes()?,
            None => Vec::new(),
        };
        self.artifacts.insert(
            module.name.clone(),
            ModuleArtifacts {
                script: assembly.script.clone(),
                abi: abi_bytes,
            },
        );

        log::debug!(
            "compiled {}: {} bytes, {} registers at peak",
            module.name,
            assembly.script.len(),
            generated.stats.peak
        );
        Ok(CompiledModule {
            name: module.name.clone(),
            kind: module.kind.name(),
            asm,
            script: assembly.script,
            abi,
            debug_info: assembly.debug_info,
            sub_modules,
            register_stats: generated.stats,
        })
    }

    fn generate(&self, module: &Module) -> CompileResult<GeneratedCode> {
        let env = CodegenEnv {
            types: self.types,
            scopes: self.scopes,
            builtins: self.builtins,
            artifacts: &self.artifacts,
            config: self.config,
            source: self.source,
        };
        let mut gen = CodeGenerator::new(env, &module.name);

        let nft_token = match &module.kind {
            ModuleKind::Nft { token, .. } => Some(token.as_str()),
            _ => None,
        };
        let method_env = MethodEnv {
            module_scope: module.scope,
            nft_token,
        };

        if let Some(contract) = module.contract() {
            for method in &contract.methods {
                method.generate(method_env, &mut gen)?;
            }
        }
        if let Some(script) = module.script() {
            script.generate(&module.name, &mut gen)?;
        }

        gen.finish(module.line)
    }

    fn assemble(&self, module: &str, lines: &[String]) -> CompileResult<Assembly> {
        self.assembler.assemble(lines).map_err(|e| {
            if let Some(path) = &self.config.failed_asm_path {
                match std::fs::write(path, lines.join("\n")) {
                    Ok(()) => log::warn!("assembly of {} dumped to {}", module, path.display()),
                    Err(io) => log::warn!("could not dump assembly of {}: {}", module, io),
                }
            }
            CompilerError::Assembler {
                module: module.to_string(),
                message: e.to_string(),
            }
        })
    }

    fn build_abi(
        &self,
        module: &Module,
        contract: &Contract,
        assembly: &Assembly,
    ) -> CompileResult<ContractInterface> {
        let mut abi = ContractInterface::default();

        for method in contract.methods.iter().filter(|m| m.interface.is_public) {
            let label = Labels::entry(method.name());
            let offset = *assembly.labels.get(&label).ok_or_else(|| {
                CompilerError::internal(method.line(), format!("label {} was not assembled", label))
            })?;
            let name = if method.interface.kind == MethodKind::Constructor {
                CONSTRUCTOR_NAME.to_string()
            } else {
                method.name().to_string()
            };
            let parameters = method
                .interface
                .parameters
                .iter()
                .map(|p| {
                    Ok(ContractParameter {
                        name: p.name.clone(),
                        ty: self.vm_type(p.ty)?,
                    })
                })
                .collect::<CompileResult<Vec<_>>>()?;

            abi.methods.push(ContractMethod {
                name,
                return_type: self.vm_type(method.interface.return_type)?,
                offset,
                parameters,
            });
        }

        for event in &contract.events {
            let description = match &event.description {
                EventDescription::Template(template) => {
                    let name = format!("{}.{}", module.name, event.name);
                    let script = self.assemble(&name, &template_asm(template))?;
                    hex::encode(script.script)
                }
                EventDescription::Bytes(bytes) => bytes.clone(),
                EventDescription::Module(name) => {
                    let artifacts = self.artifacts.get(name).ok_or_else(|| {
                        CompilerError::semantic(
                            event.line,
                            format!("module {} is not compiled yet", name),
                        )
                    })?;
                    hex::encode(&artifacts.script)
                }
            };
            abi.events.push(ContractEvent {
                name: event.name.clone(),
                value: event.value,
                return_type: self.vm_type(event.return_type)?,
                description,
            });
        }

        Ok(abi)
    }

    fn vm_type(&self, ty: TypeId) -> CompileResult<VmType> {
        VmType::from_kind(self.types.kind(ty))
    }

    /// Script and ABI bytes of an already compiled module
    pub fn artifacts(&self, name: &str) -> Option<&ModuleArtifacts> {
        self.artifacts.get(name)
    }
}
