//! Method and script code generation
//!
//! A method pops its arguments, loads the globals its body touches from
//! contract storage, runs the body and writes back every global it
//! assigned. All of its registers are free again when `RET` is emitted.

use super::context::{quoted, CodeGenerator};
use super::control::Labels;
use super::opcode::Opcode;
use super::stmt::leave_scope;
use crate::ast::NodeMeta;
use crate::error::{CompileResult, CompilerError};
use crate::library::MethodKind;
use crate::module::{MethodDeclaration, Script};
use crate::symbols::{ScopeId, VarId, VarStorage};
use crate::types::VarKind;

/// Module facts a method needs
#[derive(Debug, Clone, Copy)]
pub struct MethodEnv<'m> {
    /// Root scope of the module, holding its globals
    pub module_scope: ScopeId,
    /// Symbol of the owning token, for NFT methods
    pub nft_token: Option<&'m str>,
}

/// Implicit NFT variable and the token field backing it
fn nft_field(name: &str) -> Option<&'static str> {
    match name {
        "_seriesID" => Some("seriesID"),
        "_mintID" => Some("mintID"),
        "_ROM" => Some("ROM"),
        "_RAM" => Some("RAM"),
        _ => None,
    }
}

impl MethodDeclaration {
    pub fn generate(&self, env: MethodEnv<'_>, gen: &mut CodeGenerator<'_>) -> CompileResult<()> {
        let name = self.name();
        let line = self.line();
        log::debug!("generating method {}", name);

        gen.annotate(line);
        gen.emit_label(&Labels::entry(name));

        let mut held: Vec<VarId> = Vec::new();
        if let Some(token) = env.nft_token {
            held.extend(self.load_nft(env.module_scope, token, gen)?);
        }
        for &param in &self.parameters {
            pop_argument(param, self.meta, gen)?;
            held.push(param);
        }

        let globals = module_globals(env.module_scope, gen);
        let is_constructor = self.interface.kind == MethodKind::Constructor;
        if is_constructor {
            for &global in &globals {
                let problem = match self.body.initializations(global) {
                    0 => "is not initialized",
                    1 => continue,
                    _ => "is initialized more than once",
                };
                return Err(CompilerError::semantic(
                    line,
                    format!(
                        "global {} {} in the constructor",
                        gen.variable(global).name,
                        problem
                    ),
                ));
            }
        } else {
            for &global in &globals {
                if self.body.is_node_used(global) {
                    load_global(global, self.meta, gen)?;
                }
            }
        }

        let exit = Labels::exit(name);
        gen.exit_label = Some(exit.clone());
        self.body.generate(gen)?;
        leave_scope(self.scope, line, gen)?;
        gen.emit_label(&exit);
        gen.exit_label = None;

        for &global in &globals {
            if gen.is_bound(global) {
                if self.body.assigns(global) {
                    store_global(global, line, gen)?;
                }
                gen.release(global, line)?;
            }
        }
        for var in held {
            gen.release(var, line)?;
        }
        gen.emit(Opcode::Ret, &[]);
        Ok(())
    }

    /// Pop the token id and read the token fields the body uses
    fn load_nft(
        &self,
        module_scope: ScopeId,
        token: &str,
        gen: &mut CodeGenerator<'_>,
    ) -> CompileResult<Vec<VarId>> {
        let scopes = gen.env.scopes;
        let implicit: Vec<VarId> = scopes
            .scope(module_scope)
            .variables()
            .iter()
            .copied()
            .filter(|&v| scopes.variable(v).storage == VarStorage::Nft)
            .collect();
        let token_id = implicit
            .iter()
            .copied()
            .find(|&v| scopes.variable(v).name == "_tokenID")
            .ok_or_else(|| CompilerError::internal(self.line(), "NFT module without _tokenID"))?;

        pop_argument(token_id, self.meta, gen)?;
        let mut held = vec![token_id];

        let used: Vec<(VarId, &'static str)> = implicit
            .iter()
            .filter(|&&v| self.body.is_node_used(v))
            .filter_map(|&v| nft_field(&scopes.variable(v).name).map(|field| (v, field)))
            .collect();
        if used.is_empty() {
            return Ok(held);
        }

        let id = gen.operand(token_id, self.line())?;
        gen.emit(Opcode::Push, &[&id]);
        gen.load_scratch(&quoted(token));
        gen.emit(Opcode::Push, &[&"r0"]);
        gen.ext_call("Runtime.ReadToken");
        let data = gen.alloc(self.meta)?;
        gen.emit(Opcode::Pop, &[&data]);
        for (var, field) in used {
            gen.ensure_bound(var, self.meta)?;
            let target = gen.operand(var, self.line())?;
            gen.load_scratch(&quoted(field));
            gen.emit(Opcode::Get, &[&data, &target, &"r0"]);
            if gen.types().kind(scopes.variable(var).ty) == VarKind::Struct {
                gen.emit(Opcode::Unpack, &[&target, &target]);
            }
            held.push(var);
        }
        gen.dealloc(data, self.line())?;
        Ok(held)
    }
}

impl Script {
    /// Scripts run from their first instruction; `name` only labels the exit
    pub fn generate(&self, name: &str, gen: &mut CodeGenerator<'_>) -> CompileResult<()> {
        let line = self.meta.line;
        log::debug!("generating script {}", name);
        gen.annotate(line);

        for &param in &self.parameters {
            pop_argument(param, self.meta, gen)?;
        }

        let exit = Labels::exit(name);
        gen.exit_label = Some(exit.clone());
        self.body.generate(gen)?;
        leave_scope(self.scope, line, gen)?;
        gen.emit_label(&exit);
        gen.exit_label = None;

        for &param in &self.parameters {
            gen.release(param, line)?;
        }
        gen.emit(Opcode::Ret, &[]);
        Ok(())
    }
}

/// Globals kept in plain storage fields, in declaration order
fn module_globals(module_scope: ScopeId, gen: &CodeGenerator<'_>) -> Vec<VarId> {
    let scopes = gen.env.scopes;
    scopes
        .scope(module_scope)
        .variables()
        .iter()
        .copied()
        .filter(|&v| {
            let decl = scopes.variable(v);
            decl.is_global() && decl.collection.is_none()
        })
        .collect()
}

fn pop_argument(var: VarId, meta: NodeMeta, gen: &mut CodeGenerator<'_>) -> CompileResult<()> {
    gen.ensure_bound(var, meta)?;
    let reg = gen.operand(var, meta.line)?;
    gen.emit(Opcode::Pop, &[&reg]);
    Ok(())
}

/// `Data.Get(contract, field, type)` into the global's register
fn load_global(var: VarId, meta: NodeMeta, gen: &mut CodeGenerator<'_>) -> CompileResult<()> {
    let decl = gen.variable(var);
    let tag = gen.vm_type(decl.ty)?.tag();
    let contract = quoted(gen.module());

    gen.ensure_bound(var, meta)?;
    gen.load_scratch(&tag);
    gen.emit(Opcode::Push, &[&"r0"]);
    gen.load_scratch(&quoted(&decl.name));
    gen.emit(Opcode::Push, &[&"r0"]);
    gen.load_scratch(&contract);
    gen.emit(Opcode::Push, &[&"r0"]);
    gen.ext_call("Data.Get");
    let reg = gen.operand(var, meta.line)?;
    gen.emit(Opcode::Pop, &[&reg]);
    Ok(())
}

/// `Data.Set(field, value)` from the global's register
fn store_global(var: VarId, line: u32, gen: &mut CodeGenerator<'_>) -> CompileResult<()> {
    let name = &gen.variable(var).name;
    let reg = gen.operand(var, line)?;
    gen.emit(Opcode::Push, &[&reg]);
    gen.load_scratch(&quoted(name));
    gen.emit(Opcode::Push, &[&"r0"]);
    gen.ext_call("Data.Set");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nft_fields() {
        assert_eq!(nft_field("_ROM"), Some("ROM"));
        assert_eq!(nft_field("_seriesID"), Some("seriesID"));
        assert_eq!(nft_field("_tokenID"), None);
    }
}
