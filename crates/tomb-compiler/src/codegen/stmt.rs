//! Statement code generation

use super::context::{quoted, CodeGenerator};
use super::control::Labels;
use super::opcode::Opcode;
use crate::ast::{
    AssignSelector, AssignTarget, Block, Expression, ExpressionKind, Statement, StatementKind,
};
use crate::error::{CompileResult, CompilerError};
use crate::symbols::{ScopeId, VarStorage};

impl Block {
    pub fn generate(&self, gen: &mut CodeGenerator<'_>) -> CompileResult<()> {
        for statement in &self.statements {
            statement.generate(gen)?;
        }
        leave_scope(self.scope, self.last_line(), gen)
    }

    fn last_line(&self) -> u32 {
        self.statements.last().map(Statement::line).unwrap_or(0)
    }
}

/// Release the registers of the locals declared in `scope`
pub(crate) fn leave_scope(
    scope: ScopeId,
    line: u32,
    gen: &mut CodeGenerator<'_>,
) -> CompileResult<()> {
    let scopes = gen.env.scopes;
    for &var in scopes.scope(scope).variables() {
        let decl = scopes.variable(var);
        if decl.storage != VarStorage::Local {
            continue;
        }
        if !gen.release(var, line)? {
            return Err(CompilerError::semantic(
                decl.line,
                format!("unused variable: {}", decl.name),
            ));
        }
    }
    Ok(())
}

impl Statement {
    pub fn generate(&self, gen: &mut CodeGenerator<'_>) -> CompileResult<()> {
        gen.annotate(self.line());
        let line = self.line();
        match &self.kind {
            StatementKind::Local { var, value } => {
                if let Some(value) = value {
                    let target = AssignTarget {
                        var: *var,
                        selector: AssignSelector::Whole,
                    };
                    self.generate_assign(&target, value, gen)?;
                }
                Ok(())
            }
            StatementKind::Assign { target, value } => self.generate_assign(target, value, gen),
            StatementKind::Call(expr) => {
                match &expr.kind {
                    ExpressionKind::Call(call) => {
                        if let Some(reg) = call.generate(expr.meta, expr.ty, gen)? {
                            gen.dealloc(reg, line)?;
                        }
                        Ok(())
                    }
                    _ => {
                        let reg = expr.generate(gen)?;
                        gen.dealloc(reg, line)
                    }
                }
            }
            StatementKind::If {
                condition,
                body,
                else_body,
            } => {
                let else_label = Labels::else_label(self.meta.id);
                let then_label = Labels::then_label(self.meta.id);

                let reg = condition.generate(gen)?;
                gen.emit(Opcode::JmpNot, &[&reg, &else_label]);
                gen.dealloc(reg, line)?;
                body.generate(gen)?;
                gen.emit(Opcode::Jmp, &[&then_label]);
                gen.emit_label(&else_label);
                if let Some(else_body) = else_body {
                    else_body.generate(gen)?;
                }
                gen.emit_label(&then_label);
                Ok(())
            }
            StatementKind::While { condition, body } => {
                let start = Labels::loop_start(self.meta.id);
                let end = Labels::loop_end(self.meta.id);

                gen.emit_label(&start);
                let reg = condition.generate(gen)?;
                gen.emit(Opcode::JmpNot, &[&reg, &end]);
                gen.dealloc(reg, line)?;

                gen.loops.push(end.clone(), start.clone());
                body.generate(gen)?;
                gen.loops.pop();

                gen.emit(Opcode::Jmp, &[&start]);
                gen.emit_label(&end);
                Ok(())
            }
            StatementKind::DoWhile { body, condition } => {
                let start = Labels::loop_start(self.meta.id);
                let next = Labels::loop_continue(self.meta.id);
                let end = Labels::loop_end(self.meta.id);

                gen.emit_label(&start);
                gen.loops.push(end.clone(), next.clone());
                body.generate(gen)?;
                gen.loops.pop();

                gen.emit_label(&next);
                let reg = condition.generate(gen)?;
                gen.emit(Opcode::JmpIf, &[&reg, &start]);
                gen.dealloc(reg, line)?;
                gen.emit_label(&end);
                Ok(())
            }
            StatementKind::For {
                scope,
                init,
                condition,
                step,
                body,
            } => {
                let start = Labels::loop_start(self.meta.id);
                let next = Labels::loop_continue(self.meta.id);
                let end = Labels::loop_end(self.meta.id);

                init.generate(gen)?;
                gen.emit_label(&start);
                let reg = condition.generate(gen)?;
                gen.emit(Opcode::JmpNot, &[&reg, &end]);
                gen.dealloc(reg, line)?;

                gen.loops.push(end.clone(), next.clone());
                body.generate(gen)?;
                gen.loops.pop();

                gen.emit_label(&next);
                step.generate(gen)?;
                gen.emit(Opcode::Jmp, &[&start]);
                gen.emit_label(&end);
                leave_scope(*scope, line, gen)
            }
            StatementKind::Switch {
                value,
                cases,
                default,
            } => {
                let end = Labels::end_case(self.meta.id);
                let scrutinee = value.generate(gen)?;
                for (index, case) in cases.iter().enumerate() {
                    let skip = Labels::case_label(self.meta.id, index);
                    let reg = case.value.generate(gen)?;
                    gen.emit(Opcode::Equal, &[&scrutinee, &reg, &reg]);
                    gen.emit(Opcode::JmpNot, &[&reg, &skip]);
                    gen.dealloc(reg, line)?;
                    case.body.generate(gen)?;
                    gen.emit(Opcode::Jmp, &[&end]);
                    gen.emit_label(&skip);
                }
                if let Some(default) = default {
                    default.generate(gen)?;
                }
                gen.emit_label(&end);
                gen.dealloc(scrutinee, line)
            }
            StatementKind::Return(value) => {
                if let Some(value) = value {
                    let reg = value.generate(gen)?;
                    gen.emit(Opcode::Push, &[&reg]);
                    gen.dealloc(reg, line)?;
                }
                let exit = gen
                    .exit_label
                    .clone()
                    .ok_or_else(|| CompilerError::internal(line, "return outside of a method"))?;
                gen.emit(Opcode::Jmp, &[&exit]);
                Ok(())
            }
            StatementKind::Throw(value) => {
                let reg = value.generate(gen)?;
                gen.emit(Opcode::Throw, &[&reg]);
                gen.dealloc(reg, line)
            }
            StatementKind::Break => {
                let label = gen
                    .loops
                    .break_label()
                    .map(str::to_string)
                    .ok_or(CompilerError::NotInsideLoop {
                        line,
                        keyword: "break",
                    })?;
                gen.emit(Opcode::Jmp, &[&label]);
                Ok(())
            }
            StatementKind::Continue => {
                let label = gen
                    .loops
                    .continue_label()
                    .map(str::to_string)
                    .ok_or(CompilerError::NotInsideLoop {
                        line,
                        keyword: "continue",
                    })?;
                gen.emit(Opcode::Jmp, &[&label]);
                Ok(())
            }
            StatementKind::Emit {
                kind,
                address,
                value,
                ..
            } => {
                let data = value.generate(gen)?;
                gen.emit(Opcode::Push, &[&data]);
                gen.dealloc(data, line)?;
                let target = address.generate(gen)?;
                gen.emit(Opcode::Push, &[&target]);
                gen.dealloc(target, line)?;
                gen.load_scratch(kind);
                gen.emit(Opcode::Push, &[&"r0"]);
                gen.ext_call("Runtime.Notify");
                Ok(())
            }
            StatementKind::Asm(lines) => {
                for asm in lines {
                    let asm = asm.trim();
                    if !asm.is_empty() {
                        gen.emit_raw(asm);
                    }
                }
                Ok(())
            }
        }
    }

    fn generate_assign(
        &self,
        target: &AssignTarget,
        value: &Expression,
        gen: &mut CodeGenerator<'_>,
    ) -> CompileResult<()> {
        let line = self.line();
        let reg = value.generate(gen)?;
        let fresh = gen.ensure_bound(target.var, self.meta)?;
        let var = gen.operand(target.var, line)?;

        match &target.selector {
            AssignSelector::Whole => {
                gen.emit(Opcode::Copy, &[&reg, &var]);
            }
            AssignSelector::Field(field) => {
                if fresh {
                    gen.emit(Opcode::Clear, &[&var]);
                }
                gen.load_scratch(&quoted(field));
                gen.emit(Opcode::Put, &[&reg, &var, &"r0"]);
            }
            AssignSelector::Index(index) => {
                if fresh {
                    gen.emit(Opcode::Clear, &[&var]);
                }
                let key = index.generate(gen)?;
                gen.emit(Opcode::Put, &[&reg, &var, &key]);
                gen.dealloc(key, line)?;
            }
        }
        gen.dealloc(reg, line)
    }
}
