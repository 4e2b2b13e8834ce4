//! Expression code generation
//!
//! Every expression leaves its value in a freshly allocated register and
//! hands it to the caller, which must deallocate it.

use super::context::{quoted, CodeGenerator};
use super::opcode::Opcode;
use super::register::Register;
use crate::ast::{BinaryOp, Expression, ExpressionKind};
use crate::error::{CompileResult, CompilerError};
use crate::types::{TypeId, VarKind, VmType};

impl Expression {
    pub fn generate(&self, gen: &mut CodeGenerator<'_>) -> CompileResult<Register> {
        match &self.kind {
            ExpressionKind::Literal(value) | ExpressionKind::Constant { value, .. } => {
                self.generate_literal(value, gen)
            }
            ExpressionKind::Variable(var) => {
                let source = gen.operand(*var, self.line())?;
                let reg = gen.alloc(self.meta)?;
                gen.emit(Opcode::Copy, &[&source, &reg]);
                Ok(reg)
            }
            ExpressionKind::Binary { op, left, right } => {
                self.generate_binary(*op, left, right, gen)
            }
            ExpressionKind::Not(inner) => self.generate_unary(Opcode::Not, inner, gen),
            ExpressionKind::Negate(inner) => self.generate_unary(Opcode::Negate, inner, gen),
            ExpressionKind::Cast(inner) => {
                let vm = gen.vm_type(self.ty)?;
                let source = inner.generate(gen)?;
                let reg = gen.alloc(self.meta)?;
                gen.emit(Opcode::Cast, &[&source, &reg, &format!("#{}", vm)]);
                gen.dealloc(source, self.line())?;
                Ok(reg)
            }
            ExpressionKind::Call(call) => call
                .generate(self.meta, self.ty, gen)?
                .ok_or_else(|| {
                    CompilerError::semantic(
                        self.line(),
                        format!("{} does not return a value", call.method.name),
                    )
                }),
            ExpressionKind::StructField { target, field } => {
                let source = target.generate(gen)?;
                let reg = gen.alloc(self.meta)?;
                gen.load_scratch(&quoted(field));
                gen.emit(Opcode::Get, &[&source, &reg, &"r0"]);
                gen.dealloc(source, self.line())?;
                Ok(reg)
            }
            ExpressionKind::ArrayElement { array, index } => {
                let source = array.generate(gen)?;
                let key = index.generate(gen)?;
                let reg = gen.alloc(self.meta)?;
                gen.emit(Opcode::Get, &[&source, &reg, &key]);
                gen.dealloc(key, self.line())?;
                gen.dealloc(source, self.line())?;
                Ok(reg)
            }
            ExpressionKind::ThisAddress => {
                let reg = gen.alloc(self.meta)?;
                let bytes = gen.this_address();
                gen.emit(Opcode::Load, &[&reg, &bytes]);
                convert_interop(&reg, "Address()", gen);
                Ok(reg)
            }
            ExpressionKind::ModuleRef(name) => {
                let script = hex::encode(&gen.artifacts(name, self.line())?.script);
                let reg = gen.alloc(self.meta)?;
                gen.emit(Opcode::Load, &[&reg, &format!("0x{}", script)]);
                Ok(reg)
            }
        }
    }

    fn generate_literal(
        &self,
        value: &str,
        gen: &mut CodeGenerator<'_>,
    ) -> CompileResult<Register> {
        let reg = gen.alloc(self.meta)?;
        match gen.types().kind(self.ty) {
            VarKind::Address => {
                gen.emit(Opcode::Load, &[&reg, &quoted(value)]);
                convert_interop(&reg, "Address()", gen);
            }
            VarKind::Hash => {
                gen.emit(Opcode::Load, &[&reg, &quoted(value)]);
                convert_interop(&reg, "Hash()", gen);
            }
            VarKind::Enum => {
                gen.emit(Opcode::Load, &[&reg, &value]);
                gen.emit(Opcode::Cast, &[&reg, &reg, &format!("#{}", VmType::Enum)]);
            }
            VarKind::Method => {
                gen.emit(Opcode::Load, &[&reg, &quoted(value)]);
            }
            _ => gen.emit(Opcode::Load, &[&reg, &value]),
        }
        Ok(reg)
    }

    fn generate_unary(
        &self,
        opcode: Opcode,
        inner: &Expression,
        gen: &mut CodeGenerator<'_>,
    ) -> CompileResult<Register> {
        let source = inner.generate(gen)?;
        let reg = gen.alloc(self.meta)?;
        gen.emit(opcode, &[&source, &reg]);
        gen.dealloc(source, self.line())?;
        Ok(reg)
    }

    fn generate_binary(
        &self,
        op: BinaryOp,
        left: &Expression,
        right: &Expression,
        gen: &mut CodeGenerator<'_>,
    ) -> CompileResult<Register> {
        let reg = gen.alloc(self.meta)?;
        let a = left.generate(gen)?;
        let b = right.generate(gen)?;

        let precision = gen.types().precision(left.ty);
        if let (BinaryOp::Div, Some(precision)) = (op, precision) {
            gen.load_scratch(&decimal_scale(precision));
            gen.emit(Opcode::Mul, &[&a, &"r0", &a]);
        }

        let opcode = binary_opcode(op, left.ty, gen);
        gen.emit(opcode, &[&a, &b, &reg]);

        if let (BinaryOp::Mul, Some(precision)) = (op, precision) {
            gen.load_scratch(&decimal_scale(precision));
            gen.emit(Opcode::Div, &[&reg, &"r0", &reg]);
        }

        gen.dealloc(b, self.line())?;
        gen.dealloc(a, self.line())?;
        Ok(reg)
    }
}

fn binary_opcode(op: BinaryOp, operand: TypeId, gen: &CodeGenerator<'_>) -> Opcode {
    match op {
        BinaryOp::Add
            if matches!(
                gen.types().kind(operand),
                VarKind::String | VarKind::Bytes
            ) =>
        {
            Opcode::Cat
        }
        BinaryOp::Add => Opcode::Add,
        BinaryOp::Sub => Opcode::Sub,
        BinaryOp::Mul => Opcode::Mul,
        BinaryOp::Div => Opcode::Div,
        BinaryOp::Mod => Opcode::Mod,
        BinaryOp::Shl => Opcode::Shl,
        BinaryOp::Shr => Opcode::Shr,
        BinaryOp::And => Opcode::And,
        BinaryOp::Or => Opcode::Or,
        BinaryOp::Xor => Opcode::Xor,
        BinaryOp::Equal => Opcode::Equal,
        BinaryOp::Less => Opcode::Lt,
        BinaryOp::LessEqual => Opcode::Lte,
        BinaryOp::Greater => Opcode::Gt,
        BinaryOp::GreaterEqual => Opcode::Gte,
    }
}

/// `10^precision`
pub(crate) fn decimal_scale(precision: u8) -> String {
    format!("1{}", "0".repeat(precision as usize))
}

/// Turn the text in `reg` into an interop object by calling its constructor
fn convert_interop(reg: &Register, constructor: &str, gen: &mut CodeGenerator<'_>) {
    gen.emit(Opcode::Push, &[reg]);
    gen.ext_call(constructor);
    gen.emit(Opcode::Pop, &[reg]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_scale() {
        assert_eq!(decimal_scale(3), "1000");
        assert_eq!(decimal_scale(1), "10");
    }

    #[test]
    fn test_string_concatenation_uses_cat() {
        use crate::codegen::CodegenEnv;
        use crate::config::CompilerConfig;
        use crate::library::Builtins;
        use crate::symbols::ScopeTree;
        use crate::types::TypeContext;
        use rustc_hash::FxHashMap;

        let types = TypeContext::new();
        let scopes = ScopeTree::new();
        let builtins = Builtins::default();
        let artifacts = FxHashMap::default();
        let config = CompilerConfig::default();
        let env = CodegenEnv {
            types: &types,
            scopes: &scopes,
            builtins: &builtins,
            artifacts: &artifacts,
            config: &config,
            source: "",
        };
        let gen = CodeGenerator::new(env, "test");
        assert_eq!(binary_opcode(BinaryOp::Add, TypeId::STRING, &gen), Opcode::Cat);
        assert_eq!(binary_opcode(BinaryOp::Add, TypeId::NUMBER, &gen), Opcode::Add);
        assert_eq!(binary_opcode(BinaryOp::LessEqual, TypeId::NUMBER, &gen), Opcode::Lte);
    }
}
