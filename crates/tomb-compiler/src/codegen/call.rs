//! Method call code generation
//!
//! Arguments go on the stack in reverse order so the callee pops them in
//! declaration order. A call that returns a value leaves it on the stack,
//! where the caller pops it into a fresh register.

use super::context::{quoted, CodeGenerator};
use super::control::Labels;
use super::opcode::Opcode;
use super::register::Register;
use crate::ast::{Expression, ExpressionKind, MethodCall, NodeMeta};
use crate::error::{CompileResult, CompilerError};
use crate::library::{CustomCodegen, MethodImplementation};
use crate::types::{TypeId, VarKind};

impl MethodCall {
    /// Emit the call. `ty` is the resolved type of the call expression.
    pub fn generate(
        &self,
        meta: NodeMeta,
        ty: TypeId,
        gen: &mut CodeGenerator<'_>,
    ) -> CompileResult<Option<Register>> {
        let method = &self.method;
        log::trace!("call {}.{}", method.library, method.name);
        match &method.implementation {
            MethodImplementation::ExtCall => {
                push_arguments(&self.arguments, gen)?;
                gen.ext_call(&method.alias);
                pop_result(meta, ty, gen)
            }
            MethodImplementation::ContractCall => {
                let contract = method.contract.as_deref().unwrap_or(&method.library);
                push_arguments(&self.arguments, gen)?;
                contract_call(contract, &method.alias, gen);
                pop_result(meta, ty, gen)
            }
            MethodImplementation::LocalCall => {
                push_arguments(&self.arguments, gen)?;
                gen.use_builtin(&method.alias);
                gen.emit(Opcode::Call, &[&method.alias]);
                pop_result(meta, ty, gen)
            }
            MethodImplementation::Custom(custom) => self.generate_custom(custom, meta, ty, gen),
        }
    }

    fn generate_custom(
        &self,
        custom: &CustomCodegen,
        meta: NodeMeta,
        ty: TypeId,
        gen: &mut CodeGenerator<'_>,
    ) -> CompileResult<Option<Register>> {
        let line = meta.line;
        let args = &self.arguments;
        match custom {
            CustomCodegen::RuntimeExpect => {
                let label = Labels::expect_label(meta.id);
                let condition = argument(args, 0, line)?.generate(gen)?;
                gen.emit(Opcode::JmpIf, &[&condition, &label]);
                let message = argument(args, 1, line)?.generate(gen)?;
                gen.emit(Opcode::Throw, &[&message]);
                gen.dealloc(message, line)?;
                gen.emit_label(&label);
                gen.dealloc(condition, line)?;
                Ok(None)
            }
            CustomCodegen::UnaryOpcode(opcode) => {
                let source = argument(args, 0, line)?.generate(gen)?;
                let reg = gen.alloc(meta)?;
                gen.emit(*opcode, &[&source, &reg]);
                gen.dealloc(source, line)?;
                Ok(Some(reg))
            }
            CustomCodegen::BinaryOpcode(opcode) => {
                let a = argument(args, 0, line)?.generate(gen)?;
                let b = argument(args, 1, line)?.generate(gen)?;
                let reg = gen.alloc(meta)?;
                gen.emit(*opcode, &[&a, &b, &reg]);
                gen.dealloc(b, line)?;
                gen.dealloc(a, line)?;
                Ok(Some(reg))
            }
            CustomCodegen::Cast(vm) => {
                let source = argument(args, 0, line)?.generate(gen)?;
                let reg = gen.alloc(meta)?;
                gen.emit(Opcode::Cast, &[&source, &reg, &format!("#{}", vm)]);
                gen.dealloc(source, line)?;
                Ok(Some(reg))
            }
            CustomCodegen::Range => {
                let index = literal_argument(args, 1, line)?;
                let length = literal_argument(args, 2, line)?;
                let source = argument(args, 0, line)?.generate(gen)?;
                let reg = gen.alloc(meta)?;
                gen.emit(Opcode::Range, &[&source, &reg, &index, &length]);
                gen.dealloc(source, line)?;
                Ok(Some(reg))
            }
            CustomCodegen::DecimalPrecision => {
                let target = argument(args, 0, line)?;
                let precision = gen.types().precision(target.ty).ok_or_else(|| {
                    CompilerError::WrongType {
                        line,
                        expected: "decimal".to_string(),
                        found: gen.types().display(target.ty),
                    }
                })?;
                let reg = gen.alloc(meta)?;
                gen.emit(Opcode::Load, &[&reg, &precision]);
                Ok(Some(reg))
            }
            CustomCodegen::EnumIsSet => {
                let value = argument(args, 0, line)?.generate(gen)?;
                let flag = argument(args, 1, line)?.generate(gen)?;
                let reg = gen.alloc(meta)?;
                gen.emit(Opcode::And, &[&value, &flag, &value]);
                gen.emit(Opcode::Equal, &[&value, &flag, &reg]);
                gen.dealloc(flag, line)?;
                gen.dealloc(value, line)?;
                Ok(Some(reg))
            }
            CustomCodegen::StructConstructor(name) => {
                let decl = gen.types().struct_decl(name).ok_or_else(|| {
                    CompilerError::UnknownIdentifier {
                        line,
                        name: name.clone(),
                    }
                })?;
                let reg = gen.alloc(meta)?;
                gen.emit(Opcode::Clear, &[&reg]);
                for (field, arg) in decl.fields.iter().zip(args) {
                    let value = arg.generate(gen)?;
                    gen.load_scratch(&quoted(&field.name));
                    gen.emit(Opcode::Put, &[&value, &reg, &"r0"]);
                    gen.dealloc(value, line)?;
                }
                Ok(Some(reg))
            }
            CustomCodegen::ArrayGet => {
                let array = argument(args, 0, line)?.generate(gen)?;
                let index = argument(args, 1, line)?.generate(gen)?;
                let reg = gen.alloc(meta)?;
                gen.emit(Opcode::Get, &[&array, &reg, &index]);
                gen.dealloc(index, line)?;
                gen.dealloc(array, line)?;
                Ok(Some(reg))
            }
            CustomCodegen::Storage {
                reads_contract,
                typed,
            } => {
                if *typed {
                    let tag = gen.vm_type(ty)?.tag();
                    gen.load_scratch(&tag);
                    gen.emit(Opcode::Push, &[&"r0"]);
                }
                push_arguments(args, gen)?;
                if *reads_contract {
                    let contract = quoted(gen.module());
                    gen.load_scratch(&contract);
                    gen.emit(Opcode::Push, &[&"r0"]);
                }
                gen.ext_call(&self.method.alias);
                pop_result(meta, ty, gen)
            }
            CustomCodegen::CallInterop => {
                let name = string_argument(args, 0, line)?;
                push_arguments(&args[1..], gen)?;
                gen.ext_call(&name);
                pop_result(meta, ty, gen)
            }
            CustomCodegen::CallContract => {
                let contract = string_argument(args, 0, line)?;
                let method = string_argument(args, 1, line)?;
                push_arguments(&args[2..], gen)?;
                contract_call(&contract, &method, gen);
                pop_result(meta, ty, gen)
            }
            CustomCodegen::CallMethod => {
                let name = string_argument(args, 0, line)?;
                push_arguments(&args[1..], gen)?;
                gen.emit(Opcode::Call, &[&Labels::entry(&name)]);
                pop_result(meta, ty, gen)
            }
            CustomCodegen::ModuleScript | CustomCodegen::ModuleAbi => {
                let module = module_argument(args, 0, line)?;
                let artifacts = gen.artifacts(&module, line)?;
                let bytes = if matches!(custom, CustomCodegen::ModuleScript) {
                    hex::encode(&artifacts.script)
                } else {
                    hex::encode(&artifacts.abi)
                };
                let reg = gen.alloc(meta)?;
                gen.emit(Opcode::Load, &[&reg, &format!("0x{}", bytes)]);
                Ok(Some(reg))
            }
            CustomCodegen::NftCreateSeries => {
                let (last, rest) = args
                    .split_last()
                    .ok_or_else(|| {
                        CompilerError::internal(line, "createSeries without arguments")
                    })?;
                let module = module_ref(last, line)?;
                let artifacts = gen.artifacts(&module, line)?;
                let abi = format!("0x{}", hex::encode(&artifacts.abi));
                let script = format!("0x{}", hex::encode(&artifacts.script));
                gen.load_scratch(&abi);
                gen.emit(Opcode::Push, &[&"r0"]);
                gen.load_scratch(&script);
                gen.emit(Opcode::Push, &[&"r0"]);
                push_arguments(rest, gen)?;
                gen.ext_call(&self.method.alias);
                pop_result(meta, ty, gen)
            }
            CustomCodegen::NftRead { field } => {
                push_arguments(args, gen)?;
                gen.ext_call(&self.method.alias);
                let token = gen.alloc(meta)?;
                gen.emit(Opcode::Pop, &[&token]);
                let reg = gen.alloc(meta)?;
                gen.load_scratch(&quoted(field));
                gen.emit(Opcode::Get, &[&token, &reg, &"r0"]);
                if gen.types().kind(ty) == VarKind::Struct {
                    gen.emit(Opcode::Unpack, &[&reg, &reg]);
                }
                gen.dealloc(token, line)?;
                Ok(Some(reg))
            }
        }
    }
}

/// `CTX` into `contract` and run `method` there
fn contract_call(contract: &str, method: &str, gen: &mut CodeGenerator<'_>) {
    gen.load_scratch(&quoted(method));
    gen.emit(Opcode::Push, &[&"r0"]);
    gen.load_scratch(&quoted(contract));
    gen.emit(Opcode::Ctx, &[&"r0", &"r0"]);
    gen.emit(Opcode::Switch, &[&"r0"]);
}

fn push_arguments(args: &[Expression], gen: &mut CodeGenerator<'_>) -> CompileResult<()> {
    for arg in args.iter().rev() {
        let reg = arg.generate(gen)?;
        gen.emit(Opcode::Push, &[&reg]);
        gen.dealloc(reg, arg.line())?;
    }
    Ok(())
}

fn pop_result(
    meta: NodeMeta,
    ty: TypeId,
    gen: &mut CodeGenerator<'_>,
) -> CompileResult<Option<Register>> {
    if ty == TypeId::NONE {
        return Ok(None);
    }
    let reg = gen.alloc(meta)?;
    gen.emit(Opcode::Pop, &[&reg]);
    Ok(Some(reg))
}

fn argument(args: &[Expression], index: usize, line: u32) -> CompileResult<&Expression> {
    args.get(index)
        .ok_or_else(|| CompilerError::internal(line, format!("missing argument {}", index)))
}

fn literal_argument(args: &[Expression], index: usize, line: u32) -> CompileResult<String> {
    let arg = argument(args, index, line)?;
    arg.literal_value().map(str::to_string).ok_or_else(|| {
        CompilerError::semantic(line, format!("argument {} must be a literal", index + 1))
    })
}

fn string_argument(args: &[Expression], index: usize, line: u32) -> CompileResult<String> {
    let arg = argument(args, index, line)?;
    arg.string_value().map(str::to_string).ok_or_else(|| {
        CompilerError::semantic(line, format!("argument {} must be a string literal", index + 1))
    })
}

fn module_argument(args: &[Expression], index: usize, line: u32) -> CompileResult<String> {
    module_ref(argument(args, index, line)?, line)
}

fn module_ref(arg: &Expression, line: u32) -> CompileResult<String> {
    match &arg.kind {
        ExpressionKind::ModuleRef(name) => Ok(name.clone()),
        _ => Err(CompilerError::WrongType {
            line,
            expected: "module".to_string(),
            found: "expression".to_string(),
        }),
    }
}
