//! Statements and blocks

use super::expr::is_read_only;
use super::Parser;
use crate::ast::{
    AssignSelector, AssignTarget, Block, Expression, ExpressionKind, Statement, StatementKind,
    SwitchCase,
};
use crate::error::{CompileResult, CompilerError};
use crate::parser::token::{is_assignment_operator, TokenKind};
use crate::symbols::{ScopeId, VarId, VarStorage};
use crate::types::TypeId;

impl Parser<'_> {
    /// `{ ... }` in a new child scope of `parent`
    pub(super) fn parse_block(&mut self, parent: ScopeId) -> CompileResult<Block> {
        self.expect_separator("{")?;
        let scope = self.scopes.create_child(parent);
        let mut statements = Vec::new();
        while !self.eat(TokenKind::Separator, "}") {
            statements.push(self.parse_statement(scope)?);
        }
        Ok(Block { scope, statements })
    }

    fn parse_statement(&mut self, scope: ScopeId) -> CompileResult<Statement> {
        let token = self.current()?.clone();
        let line = token.line();

        match (token.kind, token.value.as_str()) {
            (TokenKind::Keyword, "local") => {
                self.pos += 1;
                self.parse_local(scope, line)
            }
            (TokenKind::Keyword, "if") => {
                self.pos += 1;
                self.parse_if(scope, line)
            }
            (TokenKind::Keyword, "while") => {
                self.pos += 1;
                let condition = self.parse_condition(scope)?;
                let body = self.parse_block(scope)?;
                Ok(self.statement(line, StatementKind::While { condition, body }))
            }
            (TokenKind::Keyword, "do") => {
                self.pos += 1;
                let body = self.parse_block(scope)?;
                self.expect(TokenKind::Keyword, "while")?;
                let condition = self.parse_condition(scope)?;
                self.expect_separator(";")?;
                Ok(self.statement(line, StatementKind::DoWhile { body, condition }))
            }
            (TokenKind::Keyword, "for") => {
                self.pos += 1;
                self.parse_for(scope, line)
            }
            (TokenKind::Keyword, "switch") => {
                self.pos += 1;
                self.parse_switch(scope, line)
            }
            (TokenKind::Keyword, "break") => {
                self.pos += 1;
                self.expect_separator(";")?;
                Ok(self.statement(line, StatementKind::Break))
            }
            (TokenKind::Keyword, "continue") => {
                self.pos += 1;
                self.expect_separator(";")?;
                Ok(self.statement(line, StatementKind::Continue))
            }
            (TokenKind::Keyword, "return") => {
                self.pos += 1;
                self.parse_return(scope, line)
            }
            (TokenKind::Keyword, "throw") => {
                self.pos += 1;
                let value = self.parse_expression(scope)?;
                let value = self.coerce(value, TypeId::STRING, line)?;
                self.expect_separator(";")?;
                Ok(self.statement(line, StatementKind::Throw(value)))
            }
            (TokenKind::Keyword, "emit") => {
                self.pos += 1;
                self.parse_emit(scope, line)
            }
            (TokenKind::Asm, _) => {
                self.pos += 1;
                let lines = token.value.lines().map(str::to_string).collect();
                Ok(self.statement(line, StatementKind::Asm(lines)))
            }
            (TokenKind::Identifier, _) if self.is_assignment_ahead() => {
                self.parse_assignment(scope, true)
            }
            (TokenKind::Identifier, _) | (TokenKind::Keyword, "this") => {
                let expr = self.parse_expression(scope)?;
                self.expect_separator(";")?;
                if !matches!(expr.kind, ExpressionKind::Call(_)) {
                    return Err(CompilerError::semantic(
                        line,
                        "only calls can be used as statements",
                    ));
                }
                Ok(self.statement(line, StatementKind::Call(expr)))
            }
            _ => Err(CompilerError::UnexpectedToken {
                line,
                token: token.value,
            }),
        }
    }

    /// `x = `, `x.field += ` or `x[` at the cursor
    fn is_assignment_ahead(&self) -> bool {
        let is_assign = |offset: usize| {
            self.peek(offset)
                .is_some_and(|t| t.kind == TokenKind::Operator && is_assignment_operator(&t.value))
        };
        match self.peek(1) {
            Some(t) if t.is(TokenKind::Selector, ".") => is_assign(3),
            Some(t) if t.is(TokenKind::Separator, "[") => true,
            _ => is_assign(1),
        }
    }

    /// `( condition )`
    fn parse_condition(&mut self, scope: ScopeId) -> CompileResult<Expression> {
        self.expect_separator("(")?;
        let line = self.line();
        let condition = self.parse_expression(scope)?;
        self.expect_separator(")")?;
        if condition.ty != TypeId::BOOL {
            return Err(CompilerError::WrongType {
                line,
                expected: "bool".to_string(),
                found: self.types.display(condition.ty),
            });
        }
        Ok(condition)
    }

    /// `local x: type [= value];` or `local x = value;`
    fn parse_local(&mut self, scope: ScopeId, line: u32) -> CompileResult<Statement> {
        let name = self.expect_identifier()?.value;
        let declared = if self.eat(TokenKind::Separator, ":") {
            Some(self.parse_type()?)
        } else {
            None
        };

        let value = if self.eat(TokenKind::Operator, "=") {
            let value = self.parse_expression(scope)?;
            Some(match declared {
                Some(ty) => self.coerce(value, ty, line)?,
                None => value,
            })
        } else {
            None
        };
        self.expect_separator(";")?;

        let ty = match (declared, &value) {
            (Some(ty), _) => ty,
            (None, Some(value)) => value.ty,
            (None, None) => {
                return Err(CompilerError::semantic(
                    line,
                    format!("local {} needs a type or a value", name),
                ))
            }
        };
        if ty == TypeId::NONE {
            return Err(CompilerError::semantic(
                line,
                format!("local {} cannot hold a value of type none", name),
            ));
        }

        let var = self
            .scopes
            .add_variable(scope, &name, ty, VarStorage::Local, line)?;
        Ok(self.statement(line, StatementKind::Local { var, value }))
    }

    /// `if (c) { } else if (d) { } else { }`
    fn parse_if(&mut self, scope: ScopeId, line: u32) -> CompileResult<Statement> {
        let condition = self.parse_condition(scope)?;
        let body = self.parse_block(scope)?;

        let else_body = if self.eat(TokenKind::Keyword, "else") {
            if self.check(TokenKind::Keyword, "if") {
                let else_line = self.line();
                self.pos += 1;
                let inner = self.scopes.create_child(scope);
                let nested = self.parse_if(inner, else_line)?;
                Some(Block {
                    scope: inner,
                    statements: vec![nested],
                })
            } else {
                Some(self.parse_block(scope)?)
            }
        } else {
            None
        };

        Ok(self.statement(
            line,
            StatementKind::If {
                condition,
                body,
                else_body,
            },
        ))
    }

    /// `for (local i = 0; i < n; i += 1) { }`
    fn parse_for(&mut self, scope: ScopeId, line: u32) -> CompileResult<Statement> {
        let for_scope = self.scopes.create_child(scope);
        self.expect_separator("(")?;

        let init = if self.eat(TokenKind::Keyword, "local") {
            self.parse_local(for_scope, line)?
        } else {
            self.parse_assignment(for_scope, true)?
        };
        let condition = self.parse_expression(for_scope)?;
        if condition.ty != TypeId::BOOL {
            return Err(CompilerError::WrongType {
                line,
                expected: "bool".to_string(),
                found: self.types.display(condition.ty),
            });
        }
        self.expect_separator(";")?;
        let step = self.parse_assignment(for_scope, false)?;
        self.expect_separator(")")?;
        let body = self.parse_block(for_scope)?;

        Ok(self.statement(
            line,
            StatementKind::For {
                scope: for_scope,
                init: Box::new(init),
                condition,
                step: Box::new(step),
                body,
            },
        ))
    }

    /// `switch (x) { case 1: ... default: ... }`
    fn parse_switch(&mut self, scope: ScopeId, line: u32) -> CompileResult<Statement> {
        self.expect_separator("(")?;
        let value = self.parse_expression(scope)?;
        self.expect_separator(")")?;
        self.expect_separator("{")?;

        let mut cases = Vec::new();
        let mut default = None;
        while !self.eat(TokenKind::Separator, "}") {
            let token = self.fetch()?;
            match (token.kind, token.value.as_str()) {
                (TokenKind::Keyword, "case") => {
                    let case_line = token.line();
                    let case_value = self.parse_operand(scope, false)?;
                    if !case_value.is_literal() {
                        return Err(CompilerError::semantic(
                            case_line,
                            "case values must be literals",
                        ));
                    }
                    let case_value = self.coerce(case_value, value.ty, case_line)?;
                    self.expect_separator(":")?;
                    let body = self.parse_case_body(scope)?;
                    cases.push(SwitchCase {
                        value: case_value,
                        body,
                    });
                }
                (TokenKind::Keyword, "default") if default.is_none() => {
                    self.expect_separator(":")?;
                    default = Some(self.parse_case_body(scope)?);
                }
                _ => {
                    return Err(CompilerError::UnexpectedToken {
                        line: token.line(),
                        token: token.value,
                    })
                }
            }
        }

        Ok(self.statement(
            line,
            StatementKind::Switch {
                value,
                cases,
                default,
            },
        ))
    }

    /// Statements up to the next `case`, `default` or closing brace
    fn parse_case_body(&mut self, parent: ScopeId) -> CompileResult<Block> {
        let scope = self.scopes.create_child(parent);
        let mut statements = Vec::new();
        while !self.check(TokenKind::Keyword, "case")
            && !self.check(TokenKind::Keyword, "default")
            && !self.check(TokenKind::Separator, "}")
        {
            statements.push(self.parse_statement(scope)?);
        }
        Ok(Block { scope, statements })
    }

    fn parse_return(&mut self, scope: ScopeId, line: u32) -> CompileResult<Statement> {
        let expected = self.ctx()?.return_type;
        if self.eat(TokenKind::Separator, ";") {
            if expected != TypeId::NONE {
                return Err(CompilerError::semantic(
                    line,
                    format!("return needs a value of type {}", self.types.display(expected)),
                ));
            }
            return Ok(self.statement(line, StatementKind::Return(None)));
        }

        let value = self.parse_expression(scope)?;
        self.expect_separator(";")?;
        if expected == TypeId::NONE {
            return Err(CompilerError::semantic(line, "method does not return a value"));
        }
        let value = self.coerce(value, expected, line)?;
        Ok(self.statement(line, StatementKind::Return(Some(value))))
    }

    /// `emit Event(address, value);`
    fn parse_emit(&mut self, scope: ScopeId, line: u32) -> CompileResult<Statement> {
        let name = self.expect_identifier()?.value;
        let (kind, event_type) = self
            .ctx()?
            .find_event(&name)
            .map(|e| (e.value, e.return_type))
            .ok_or_else(|| CompilerError::UnknownIdentifier {
                line,
                name: name.clone(),
            })?;

        self.expect_separator("(")?;
        let address = self.parse_expression(scope)?;
        let address = self.coerce(address, TypeId::ADDRESS, line)?;
        self.expect_separator(",")?;
        let value = self.parse_expression(scope)?;
        let value = self.coerce(value, event_type, line)?;
        self.expect_separator(")")?;
        self.expect_separator(";")?;

        Ok(self.statement(
            line,
            StatementKind::Emit {
                event: name,
                kind,
                address,
                value,
            },
        ))
    }

    /// `x op= value`, `x.field op= value` or `x[i] op= value`. `terminated`
    /// consumes the trailing `;`.
    fn parse_assignment(&mut self, scope: ScopeId, terminated: bool) -> CompileResult<Statement> {
        let token = self.expect_identifier()?;
        let line = token.line();
        if self.scopes.find_constant(scope, &token.value).is_some() {
            return Err(CompilerError::semantic(
                line,
                format!("cannot assign to constant {}", token.value),
            ));
        }
        let var = self
            .scopes
            .find_variable(scope, &token.value, true, line)?
            .ok_or_else(|| CompilerError::internal(line, "variable lookup returned nothing"))?;
        let decl = self.scopes.variable(var).clone();
        if decl.collection.is_some() {
            return Err(CompilerError::semantic(
                line,
                format!("storage collection {} cannot be assigned", decl.name),
            ));
        }
        if is_read_only(decl.storage) {
            return Err(CompilerError::semantic(
                line,
                format!("{} is read-only", decl.name),
            ));
        }

        let (selector, target_ty) = if self.eat(TokenKind::Selector, ".") {
            let field = self.expect_member()?.value;
            let ty = self
                .types
                .struct_of(decl.ty)
                .and_then(|s| s.field(&field))
                .map(|f| f.ty)
                .ok_or_else(|| {
                    CompilerError::semantic(
                        line,
                        format!("{} has no field {}", self.types.display(decl.ty), field),
                    )
                })?;
            (AssignSelector::Field(field), ty)
        } else if self.eat(TokenKind::Separator, "[") {
            let element = self.types.element_type(decl.ty).ok_or_else(|| {
                CompilerError::WrongType {
                    line,
                    expected: "array".to_string(),
                    found: self.types.display(decl.ty),
                }
            })?;
            let index = self.parse_expression(scope)?;
            let index = self.coerce(index, TypeId::NUMBER, line)?;
            self.expect_separator("]")?;
            (AssignSelector::Index(index), element)
        } else {
            (AssignSelector::Whole, decl.ty)
        };

        let op = self.fetch()?;
        if op.kind != TokenKind::Operator || !is_assignment_operator(&op.value) {
            return Err(CompilerError::expected(op.line(), "assignment", op.value));
        }
        let mut value = self.parse_expression(scope)?;
        if op.value != "=" {
            let base = op.value.trim_end_matches('=').to_string();
            let current = self.assigned_value(var, &selector, target_ty, line)?;
            value = self.binary(&base, current, value, line)?;
        }
        let value = self.coerce(value, target_ty, line)?;
        if terminated {
            self.expect_separator(";")?;
        }

        Ok(self.statement(
            line,
            StatementKind::Assign {
                target: AssignTarget { var, selector },
                value,
            },
        ))
    }

    /// Current value of an assignment target, the left side of `x op= y`
    fn assigned_value(
        &mut self,
        var: VarId,
        selector: &AssignSelector,
        ty: TypeId,
        line: u32,
    ) -> CompileResult<Expression> {
        let target = self.variable_expression(var, line)?;
        let kind = match selector {
            AssignSelector::Whole => return Ok(target),
            AssignSelector::Field(field) => ExpressionKind::StructField {
                target: Box::new(target),
                field: field.clone(),
            },
            AssignSelector::Index(index) => ExpressionKind::ArrayElement {
                array: Box::new(target),
                index: Box::new(index.clone()),
            },
        };
        Ok(self.expression(line, ty, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::BinaryOp;

    fn body_of(source: &str) -> Block {
        let compilation = Parser::new(source).unwrap().process().unwrap();
        let contract = compilation.modules[0].contract().unwrap();
        contract.methods[0].body.clone()
    }

    #[test]
    fn test_compound_assignment_is_expanded() {
        let body = body_of(
            "contract test { public f(x: number): number { local y: number = 1; y += x; return y; } }",
        );
        let StatementKind::Assign { value, .. } = &body.statements[1].kind else {
            panic!("expected assignment");
        };
        assert!(matches!(
            value.kind,
            ExpressionKind::Binary {
                op: BinaryOp::Add,
                ..
            }
        ));
    }

    #[test]
    fn test_else_if_nests_in_else_block() {
        let body = body_of(
            "contract test { public f(x: number): number {\n\
             if (x > 1) { return 1; } else if (x > 0) { return 2; } else { return 3; }\n\
             } }",
        );
        let StatementKind::If { else_body, .. } = &body.statements[0].kind else {
            panic!("expected if");
        };
        let nested = &else_body.as_ref().unwrap().statements[0];
        assert!(matches!(nested.kind, StatementKind::If { .. }));
    }

    #[test]
    fn test_switch_cases() {
        let body = body_of(
            "contract test { public f(x: number): number {\n\
             local y: number = 0;\n\
             switch (x) { case 1: y = 10; case 2: y = 20; default: y = 30; }\n\
             return y; } }",
        );
        let StatementKind::Switch { cases, default, .. } = &body.statements[1].kind else {
            panic!("expected switch");
        };
        assert_eq!(cases.len(), 2);
        assert!(default.is_some());
    }

    #[test]
    fn test_return_type_is_checked() {
        let source = "contract test { public f(): number { return \"x\"; } }";
        let err = Parser::new(source).unwrap().process().unwrap_err();
        assert!(matches!(err, CompilerError::WrongType { line: 1, .. }));
    }

    #[test]
    fn test_non_call_statement_is_rejected() {
        let source = "contract test { public f(x: number) { x; } }";
        let err = Parser::new(source).unwrap().process().unwrap_err();
        assert!(matches!(err, CompilerError::Semantic { .. }));
    }

    #[test]
    fn test_constant_cannot_be_assigned() {
        let source = "contract test { const LIMIT: number = 5; public f() { LIMIT = 3; } }";
        let err = Parser::new(source).unwrap().process().unwrap_err();
        assert!(matches!(err, CompilerError::Semantic { .. }));
    }
}
