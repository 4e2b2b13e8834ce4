//! Expression parsing
//!
//! Binary operators fold left to right with no precedence levels:
//! `a + b * c` is `(a + b) * c`. Parentheses group a sub-expression; a
//! group that starts an expression must be followed by an operator.

use super::types::{decimal_literal, rescale};
use super::Parser;
use crate::ast::{BinaryOp, Expression, ExpressionKind, MethodCall};
use crate::codegen::context::quoted;
use crate::error::{CompileResult, CompilerError};
use crate::library::{GenericReturn, MethodInterface};
use crate::parser::token::{is_binary_operator, Token, TokenKind};
use crate::symbols::{ScopeId, VarId, VarStorage};
use crate::types::{TypeId, VarKind, VmType};

impl Parser<'_> {
    pub(super) fn parse_expression(&mut self, scope: ScopeId) -> CompileResult<Expression> {
        let first = self.parse_operand(scope, true)?;
        self.parse_binary_tail(first, scope)
    }

    fn parse_binary_tail(
        &mut self,
        mut left: Expression,
        scope: ScopeId,
    ) -> CompileResult<Expression> {
        while let Some(op) = self.peek_binary_operator() {
            let line = self.line();
            self.pos += 1;
            let right = self.parse_operand(scope, false)?;
            left = self.binary(&op, left, right, line)?;
        }
        Ok(left)
    }

    fn peek_binary_operator(&self) -> Option<String> {
        self.peek(0)
            .filter(|t| t.kind == TokenKind::Operator && is_binary_operator(&t.value))
            .map(|t| t.value.clone())
    }

    /// One operand of a binary chain. `leading` is set for the first operand
    /// of an expression.
    pub(super) fn parse_operand(
        &mut self,
        scope: ScopeId,
        leading: bool,
    ) -> CompileResult<Expression> {
        let token = self.fetch()?;
        let line = token.line();
        match token.kind {
            TokenKind::Operator if token.value == "!" => {
                let inner = self.parse_expression(scope)?;
                if inner.ty != TypeId::BOOL {
                    return Err(self.wrong_type(line, TypeId::BOOL, inner.ty));
                }
                Ok(self.expression(line, TypeId::BOOL, ExpressionKind::Not(Box::new(inner))))
            }
            TokenKind::Operator if token.value == "-" => self.parse_negation(scope, line),
            TokenKind::Separator if token.value == "(" => {
                let inner = self.parse_expression(scope)?;
                self.expect_separator(")")?;
                if leading && self.peek_binary_operator().is_none() {
                    let found = self.current()?.value.clone();
                    return Err(CompilerError::expected(
                        self.line(),
                        "operator after `)`",
                        found,
                    ));
                }
                Ok(inner)
            }
            kind if kind.is_literal() => self.literal(&token),
            TokenKind::Macro => self.parse_macro(&token),
            TokenKind::Keyword if token.value == "this" => {
                self.expect(TokenKind::Selector, ".")?;
                let member = self.expect_member()?;
                let method = self
                    .ctx()?
                    .this
                    .find_method(&member.value)
                    .cloned()
                    .ok_or_else(|| CompilerError::UnknownMethod {
                        line,
                        library: "this".to_string(),
                        method: member.value.clone(),
                    })?;
                self.parse_call(&method, Vec::new(), scope, line)
            }
            TokenKind::Identifier => self.parse_identifier(token, scope),
            _ => Err(CompilerError::UnexpectedToken {
                line,
                token: token.value,
            }),
        }
    }

    fn parse_negation(&mut self, scope: ScopeId, line: u32) -> CompileResult<Expression> {
        let next = self.current()?.clone();
        if matches!(next.kind, TokenKind::Number | TokenKind::Decimal) {
            self.pos += 1;
            let mut literal = self.literal(&next)?;
            if let ExpressionKind::Literal(value) = &mut literal.kind {
                value.insert(0, '-');
            }
            return Ok(literal);
        }

        let inner = self.parse_expression(scope)?;
        if !matches!(self.types.kind(inner.ty), VarKind::Number | VarKind::Decimal) {
            return Err(self.wrong_type(line, TypeId::NUMBER, inner.ty));
        }
        let ty = inner.ty;
        Ok(self.expression(line, ty, ExpressionKind::Negate(Box::new(inner))))
    }

    pub(super) fn literal(&mut self, token: &Token) -> CompileResult<Expression> {
        let (value, ty) = self.literal_value(token)?;
        Ok(self.expression(token.line(), ty, ExpressionKind::Literal(value)))
    }

    /// Text and type of a literal token; decimals come back scaled
    pub(super) fn literal_value(&mut self, token: &Token) -> CompileResult<(String, TypeId)> {
        let line = token.line();
        let ty = match token.kind {
            TokenKind::String => TypeId::STRING,
            TokenKind::Number => TypeId::NUMBER,
            TokenKind::Bool => TypeId::BOOL,
            TokenKind::Address => TypeId::ADDRESS,
            TokenKind::Hash => TypeId::HASH,
            TokenKind::Bytes => TypeId::BYTES,
            TokenKind::Decimal => {
                let (value, precision) = decimal_literal(&token.value)
                    .filter(|(_, p)| *p <= crate::types::MAX_DECIMAL_PRECISION)
                    .ok_or_else(|| {
                        CompilerError::semantic(
                            line,
                            format!("invalid decimal literal {}", token.value),
                        )
                    })?;
                return Ok((value, self.types.decimal(precision)?));
            }
            _ => return Err(CompilerError::expected(line, "literal", token.value.clone())),
        };
        Ok((token.value.clone(), ty))
    }

    fn parse_macro(&mut self, token: &Token) -> CompileResult<Expression> {
        let line = token.line();
        match token.value.as_str() {
            "THIS_ADDRESS" => {
                Ok(self.expression(line, TypeId::ADDRESS, ExpressionKind::ThisAddress))
            }
            "THIS_SYMBOL" => {
                let symbol = self.ctx()?.symbol().ok_or_else(|| {
                    CompilerError::semantic(line, "$THIS_SYMBOL is only available in tokens")
                })?;
                let value = ExpressionKind::Literal(quoted(&symbol));
                Ok(self.expression(line, TypeId::STRING, value))
            }
            "TYPE_OF" => {
                self.expect_separator("(")?;
                let ty = self.parse_type()?;
                self.expect_separator(")")?;
                let tag = VmType::from_kind(self.types.kind(ty))?.tag();
                let value = ExpressionKind::Literal(tag.to_string());
                Ok(self.expression(line, TypeId::NUMBER, value))
            }
            _ => Err(CompilerError::UnknownIdentifier {
                line,
                name: format!("${}", token.value),
            }),
        }
    }

    fn parse_identifier(&mut self, token: Token, scope: ScopeId) -> CompileResult<Expression> {
        let line = token.line();
        let name = token.value.as_str();

        if self.check(TokenKind::Separator, "(") {
            let method = self.this_method(name, line)?;
            return self.parse_call(&method, Vec::new(), scope, line);
        }
        if self.eat(TokenKind::Selector, ".") {
            return self.parse_selector(&token, scope);
        }
        if self.eat(TokenKind::Separator, "[") {
            return self.parse_element(&token, scope);
        }

        if let Some(var) = self.scopes.find_variable(scope, name, false, line)? {
            return self.variable_expression(var, line);
        }
        if let Some(constant) = self.scopes.find_constant(scope, name) {
            let (ty, value) = (constant.ty, constant.value.clone());
            return Ok(self.expression(
                line,
                ty,
                ExpressionKind::Constant {
                    name: name.to_string(),
                    value,
                },
            ));
        }
        if self.ctx()?.this.find_method(name).is_some() {
            let ty = self.types.method(name);
            return Ok(self.expression(line, ty, ExpressionKind::Literal(name.to_string())));
        }
        if self.is_module_name(name) {
            return Ok(self.expression(
                line,
                TypeId::MODULE,
                ExpressionKind::ModuleRef(name.to_string()),
            ));
        }
        Err(CompilerError::UndeclaredVariable {
            line,
            name: name.to_string(),
        })
    }

    pub(super) fn variable_expression(
        &mut self,
        var: VarId,
        line: u32,
    ) -> CompileResult<Expression> {
        let decl = self.scopes.variable(var);
        if decl.collection.is_some() {
            return Err(CompilerError::semantic(
                line,
                format!("storage collection {} can only be used through its methods", decl.name),
            ));
        }
        let ty = decl.ty;
        Ok(self.expression(line, ty, ExpressionKind::Variable(var)))
    }

    /// `a[i]`
    fn parse_element(&mut self, token: &Token, scope: ScopeId) -> CompileResult<Expression> {
        let line = token.line();
        let var = self
            .scopes
            .find_variable(scope, &token.value, true, line)?
            .ok_or_else(|| CompilerError::internal(line, "variable lookup returned nothing"))?;
        let array = self.variable_expression(var, line)?;
        let element = self
            .types
            .element_type(array.ty)
            .ok_or_else(|| CompilerError::WrongType {
                line,
                expected: "array".to_string(),
                found: self.types.display(array.ty),
            })?;

        let index = self.parse_expression(scope)?;
        let index = self.coerce(index, TypeId::NUMBER, line)?;
        self.expect_separator("]")?;
        Ok(self.expression(
            line,
            element,
            ExpressionKind::ArrayElement {
                array: Box::new(array),
                index: Box::new(index),
            },
        ))
    }

    /// `target.member`: a variable, then an enum, then an imported library
    fn parse_selector(&mut self, target: &Token, scope: ScopeId) -> CompileResult<Expression> {
        let line = target.line();
        let member = self.expect_member()?;

        if let Some(var) = self.scopes.find_variable(scope, &target.value, false, line)? {
            return self.parse_variable_member(var, &member, scope);
        }

        if let Some(decl) = self.types.enum_decl(&target.value) {
            let entry = decl.entry(&member.value).map(|e| e.value).ok_or_else(|| {
                CompilerError::UnknownIdentifier {
                    line,
                    name: format!("{}.{}", target.value, member.value),
                }
            })?;
            let ty = self
                .types
                .named_type(&target.value)
                .ok_or_else(|| CompilerError::internal(line, "enum without a type"))?;
            return Ok(self.expression(line, ty, ExpressionKind::Literal(entry.to_string())));
        }

        if let Some(library) = self.ctx()?.library(&target.value) {
            let method = library.find_method(&member.value).cloned().ok_or_else(|| {
                CompilerError::UnknownMethod {
                    line,
                    library: target.value.clone(),
                    method: member.value.clone(),
                }
            })?;
            return self.parse_call(&method, Vec::new(), scope, line);
        }

        if self.registry.is_known(&target.value) {
            return Err(CompilerError::UnimportedLibrary {
                line,
                name: target.value.clone(),
            });
        }
        Err(CompilerError::UnknownIdentifier {
            line,
            name: target.value.clone(),
        })
    }

    /// Struct fields, storage collection methods and value-type methods
    fn parse_variable_member(
        &mut self,
        var: VarId,
        member: &Token,
        scope: ScopeId,
    ) -> CompileResult<Expression> {
        let line = member.line();
        let decl = self.scopes.variable(var).clone();

        if decl.collection.is_some() {
            let library = self.registry.patch_collection(&decl, &mut self.types)?;
            let method = library.find_method(&member.value).cloned().ok_or_else(|| {
                CompilerError::UnknownMethod {
                    line,
                    library: decl.name.clone(),
                    method: member.value.clone(),
                }
            })?;
            let field = ExpressionKind::Literal(quoted(&decl.name));
            let field = self.expression(line, TypeId::STRING, field);
            return self.parse_call(&method, vec![field], scope, line);
        }

        let kind = self.types.kind(decl.ty);
        if kind == VarKind::Struct && !self.check(TokenKind::Separator, "(") {
            let field_ty = self
                .types
                .struct_of(decl.ty)
                .and_then(|s| s.field(&member.value))
                .map(|f| f.ty)
                .ok_or_else(|| {
                    CompilerError::semantic(
                        line,
                        format!("{} has no field {}", self.types.display(decl.ty), member.value),
                    )
                })?;
            let target = self.variable_expression(var, line)?;
            return Ok(self.expression(
                line,
                field_ty,
                ExpressionKind::StructField {
                    target: Box::new(target),
                    field: member.value.clone(),
                },
            ));
        }

        let library_name = match kind {
            VarKind::String => "String",
            VarKind::Bytes => "Bytes",
            VarKind::Array => "Array",
            VarKind::Decimal => "Decimal",
            VarKind::Enum => "Enum",
            VarKind::Address => "Address",
            _ => {
                return Err(CompilerError::semantic(
                    line,
                    format!("{} has no methods", self.types.display(decl.ty)),
                ))
            }
        };
        let library = self.registry.load(library_name, &mut self.types, line)?;
        let method = library.find_method(&member.value).cloned().ok_or_else(|| {
            CompilerError::UnknownMethod {
                line,
                library: library_name.to_string(),
                method: member.value.clone(),
            }
        })?;
        let target = self.variable_expression(var, line)?;
        self.parse_call(&method, vec![target], scope, line)
    }

    pub(super) fn this_method(&self, name: &str, line: u32) -> CompileResult<MethodInterface> {
        let ctx = self.ctx()?;
        ctx.this
            .find_method(name)
            .cloned()
            .ok_or_else(|| CompilerError::UnknownMethod {
                line,
                library: ctx.name.clone(),
                method: name.to_string(),
            })
    }

    /// Parse `[<T>](args)` after a method name. `arguments` holds implicit
    /// leading arguments such as the target of a value-type method.
    fn parse_call(
        &mut self,
        method: &MethodInterface,
        mut arguments: Vec<Expression>,
        scope: ScopeId,
        line: u32,
    ) -> CompileResult<Expression> {
        let type_argument = if self.eat(TokenKind::Operator, "<") {
            let ty = self.parse_type()?;
            self.expect_close_angle()?;
            Some(ty)
        } else {
            None
        };

        self.expect_separator("(")?;
        if !self.eat(TokenKind::Separator, ")") {
            loop {
                arguments.push(self.parse_expression(scope)?);
                if self.eat(TokenKind::Separator, ")") {
                    break;
                }
                self.expect_separator(",")?;
            }
        }

        let arguments = self.check_arguments(method, arguments, line)?;
        let ty = self.call_type(method, &arguments, type_argument, line)?;
        log::trace!(
            "resolved call {}.{} -> {}",
            method.library,
            method.name,
            self.types.display(ty)
        );
        Ok(self.expression(
            line,
            ty,
            ExpressionKind::Call(MethodCall {
                method: method.clone(),
                arguments,
                type_argument,
            }),
        ))
    }

    fn check_arguments(
        &mut self,
        method: &MethodInterface,
        arguments: Vec<Expression>,
        line: u32,
    ) -> CompileResult<Vec<Expression>> {
        let expected = method.parameters.len();
        let count_ok = if method.is_untyped() {
            arguments.len() >= expected
        } else {
            arguments.len() == expected
        };
        if !count_ok {
            return Err(CompilerError::semantic(
                line,
                format!(
                    "{}.{} expects {} arguments, got {}",
                    method.library,
                    method.name,
                    expected,
                    arguments.len()
                ),
            ));
        }
        if method.is_untyped() {
            return Ok(arguments);
        }

        arguments
            .into_iter()
            .zip(&method.parameters)
            .map(|(arg, param)| self.coerce(arg, param.ty, line))
            .collect()
    }

    /// Type of the call expression at this call site
    fn call_type(
        &self,
        method: &MethodInterface,
        arguments: &[Expression],
        type_argument: Option<TypeId>,
        line: u32,
    ) -> CompileResult<TypeId> {
        match method.generic {
            GenericReturn::Concrete => Ok(method.return_type),
            GenericReturn::Explicit { required } => match type_argument {
                Some(ty) => Ok(ty),
                None if required => Err(CompilerError::semantic(
                    line,
                    format!("{}.{} needs a type argument", method.library, method.name),
                )),
                None => Ok(TypeId::NONE),
            },
            GenericReturn::Argument(index) => arguments
                .get(index)
                .map(|arg| arg.ty)
                .ok_or_else(|| CompilerError::internal(line, "generic argument out of range")),
            GenericReturn::Element(index) => {
                let arg = arguments
                    .get(index)
                    .ok_or_else(|| CompilerError::internal(line, "generic argument out of range"))?;
                self.types
                    .element_type(arg.ty)
                    .ok_or_else(|| CompilerError::WrongType {
                        line,
                        expected: "array".to_string(),
                        found: self.types.display(arg.ty),
                    })
            }
        }
    }

    /// Make `expr` fit where `target` is expected: as is, by rescaling a
    /// decimal literal, or through an implicit cast
    pub(super) fn coerce(
        &mut self,
        expr: Expression,
        target: TypeId,
        line: u32,
    ) -> CompileResult<Expression> {
        if self.types.accepts(target, expr.ty) {
            return Ok(expr);
        }
        if let Some(precision) = self.types.precision(target) {
            if let Some(rescaled) = self.rescale_literal(&expr, precision)? {
                return Ok(rescaled);
            }
        }
        if self.types.can_cast(expr.ty, target) {
            return Ok(self.cast(expr, target));
        }
        Err(self.wrong_type(line, target, expr.ty))
    }

    fn cast(&mut self, expr: Expression, target: TypeId) -> Expression {
        let line = expr.line();
        self.expression(line, target, ExpressionKind::Cast(Box::new(expr)))
    }

    /// A number or decimal literal raised to `precision` decimal places
    fn rescale_literal(
        &mut self,
        expr: &Expression,
        precision: u8,
    ) -> CompileResult<Option<Expression>> {
        let ExpressionKind::Literal(text) = &expr.kind else {
            return Ok(None);
        };
        let from = match self.types.kind(expr.ty) {
            VarKind::Number => 0,
            VarKind::Decimal => self.types.precision(expr.ty).unwrap_or(0),
            _ => return Ok(None),
        };
        let Some(scaled) = rescale(text, from, precision) else {
            return Ok(None);
        };
        let ty = self.types.decimal(precision)?;
        Ok(Some(self.expression(expr.line(), ty, ExpressionKind::Literal(scaled))))
    }

    /// Build `left op right`, inserting the implicit casts the operators allow
    pub(super) fn binary(
        &mut self,
        op_text: &str,
        left: Expression,
        right: Expression,
        line: u32,
    ) -> CompileResult<Expression> {
        let op = BinaryOp::from_token(op_text).ok_or_else(|| CompilerError::UnexpectedToken {
            line,
            token: op_text.to_string(),
        })?;
        let (left, right) = self.unify_operands(op, left, right, line)?;

        let ty = if op.is_comparison() { TypeId::BOOL } else { left.ty };
        let expr = self.expression(
            line,
            ty,
            ExpressionKind::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
            },
        );
        if op_text == "!=" {
            return Ok(self.expression(line, TypeId::BOOL, ExpressionKind::Not(Box::new(expr))));
        }
        Ok(expr)
    }

    fn unify_operands(
        &mut self,
        op: BinaryOp,
        left: Expression,
        right: Expression,
        line: u32,
    ) -> CompileResult<(Expression, Expression)> {
        let implicit = match (op, self.types.kind(left.ty), self.types.kind(right.ty)) {
            (BinaryOp::Add, VarKind::String, kind) if kind != VarKind::String => {
                Some(TypeId::STRING)
            }
            (BinaryOp::Sub, VarKind::Number, VarKind::Timestamp) => Some(TypeId::NUMBER),
            (BinaryOp::Add, VarKind::Timestamp, VarKind::Number) => Some(TypeId::TIMESTAMP),
            _ => None,
        };
        let right = match implicit {
            Some(target) if self.types.can_cast(right.ty, target) => self.cast(right, target),
            _ => right,
        };

        if left.ty == right.ty {
            return Ok((left, right));
        }
        if let Some(precision) = self.types.precision(left.ty) {
            if let Some(right) = self.rescale_literal(&right, precision)? {
                return Ok((left, right));
            }
        }
        if let Some(precision) = self.types.precision(right.ty) {
            if let Some(left) = self.rescale_literal(&left, precision)? {
                return Ok((left, right));
            }
        }
        Err(CompilerError::TypeMismatch {
            line,
            left: self.types.display(left.ty),
            right: self.types.display(right.ty),
        })
    }

    fn wrong_type(&self, line: u32, expected: TypeId, found: TypeId) -> CompilerError {
        CompilerError::WrongType {
            line,
            expected: self.types.display(expected),
            found: self.types.display(found),
        }
    }

    /// Names usable as `Module` values: finished modules and NFT sub-modules
    pub(super) fn is_module_name(&self, name: &str) -> bool {
        self.modules.iter().any(|m| m.name == name)
            || self
                .contexts
                .iter()
                .any(|ctx| ctx.nfts.iter().any(|m| m.name == name))
    }
}

/// Whether a variable is backed by token data rather than a register
pub(super) fn is_read_only(storage: VarStorage) -> bool {
    storage == VarStorage::Nft
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::ModuleKind;

    fn first_return(source: &str) -> (Expression, crate::types::TypeContext) {
        let compilation = Parser::new(source).unwrap().process().unwrap();
        let module = &compilation.modules[0];
        let contract = module.contract().unwrap();
        let body = &contract.methods[0].body;
        let value = body
            .statements
            .iter()
            .find_map(|s| match &s.kind {
                crate::ast::StatementKind::Return(Some(value)) => Some(value.clone()),
                _ => None,
            })
            .unwrap();
        assert!(matches!(module.kind, ModuleKind::Contract(_)));
        (value, compilation.types)
    }

    #[test]
    fn test_left_fold_without_precedence() {
        let source = "contract test { public f(a: number, b: number, c: number): number { return a + b * c; } }";
        let (value, _) = first_return(source);
        let ExpressionKind::Binary { op, left, .. } = &value.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(*op, BinaryOp::Mul);
        assert!(matches!(left.kind, ExpressionKind::Binary { op: BinaryOp::Add, .. }));
    }

    #[test]
    fn test_not_equal_is_negated_equal() {
        let source = "contract test { public f(a: number): bool { return a != 3; } }";
        let (value, _) = first_return(source);
        let ExpressionKind::Not(inner) = &value.kind else {
            panic!("expected negation");
        };
        assert!(matches!(inner.kind, ExpressionKind::Binary { op: BinaryOp::Equal, .. }));
    }

    #[test]
    fn test_decimal_literal_is_rescaled() {
        let source = "contract test { public f(a: decimal<3>): decimal<3> { return a + 1.5; } }";
        let (value, types) = first_return(source);
        let ExpressionKind::Binary { right, .. } = &value.kind else {
            panic!("expected binary expression");
        };
        assert_eq!(right.kind, ExpressionKind::Literal("1500".to_string()));
        assert_eq!(types.precision(right.ty), Some(3));
    }

    #[test]
    fn test_leading_group_needs_operator() {
        let source = "contract test { public f(a: number): number { return (a); } }";
        let err = Parser::new(source).unwrap().process().unwrap_err();
        assert!(matches!(err, CompilerError::Expected { .. }));

        let source = "contract test { public f(a: number): number { return (a + 1) * 2; } }";
        assert!(Parser::new(source).unwrap().process().is_ok());
    }

    #[test]
    fn test_negative_literal() {
        let source = "contract test { public f(): number { return -5; } }";
        let (value, _) = first_return(source);
        assert_eq!(value.kind, ExpressionKind::Literal("-5".to_string()));
    }
}
