//! Type annotations, struct and enum declarations

use super::Parser;
use crate::error::{CompileResult, CompilerError};
use crate::parser::token::{is_type_name, Token, TokenKind};
use crate::types::{
    EnumDeclaration, StructDeclaration, TypeId, VarKind, MAX_DECIMAL_PRECISION,
};

impl Parser<'_> {
    /// `number`, `decimal<8>`, `Person`, `string[]`, ...
    pub(super) fn parse_type(&mut self) -> CompileResult<TypeId> {
        let token = self.fetch()?;
        let mut ty = match token.kind {
            TokenKind::Type | TokenKind::Keyword if is_type_name(&token.value) => {
                self.builtin_type(&token)?
            }
            TokenKind::Identifier => {
                self.types
                    .named_type(&token.value)
                    .ok_or_else(|| CompilerError::UnknownIdentifier {
                        line: token.line(),
                        name: token.value.clone(),
                    })?
            }
            _ => return Err(CompilerError::expected(token.line(), "type", token.value)),
        };

        while self.check(TokenKind::Separator, "[")
            && self.peek(1).is_some_and(|t| t.is(TokenKind::Separator, "]"))
        {
            self.pos += 2;
            ty = self.types.array(ty);
        }
        Ok(ty)
    }

    fn builtin_type(&mut self, token: &Token) -> CompileResult<TypeId> {
        let line = token.line();
        let kind = VarKind::from_type_name(&token.value)
            .ok_or_else(|| CompilerError::expected(line, "type", token.value.clone()))?;
        match kind {
            VarKind::Decimal => {
                self.expect_operator("<")?;
                let precision = self.parse_precision()?;
                self.expect_close_angle()?;
                self.types.decimal(precision)
            }
            VarKind::StorageMap | VarKind::StorageList | VarKind::StorageSet => {
                Err(CompilerError::semantic(
                    line,
                    format!("{} can only be the type of a global", token.value),
                ))
            }
            VarKind::Method => Ok(self.types.method("")),
            _ => self.types.primitive(kind),
        }
    }

    fn parse_precision(&mut self) -> CompileResult<u8> {
        let token = self.fetch()?;
        if token.kind != TokenKind::Number {
            return Err(CompilerError::expected(token.line(), "decimal precision", token.value));
        }
        match token.value.parse::<u8>() {
            Ok(p) if (1..=MAX_DECIMAL_PRECISION).contains(&p) => Ok(p),
            _ => Err(CompilerError::semantic(
                token.line(),
                format!(
                    "decimal precision must be between 1 and {}, got {}",
                    MAX_DECIMAL_PRECISION, token.value
                ),
            )),
        }
    }

    /// `struct Name { field: type; ... }`
    pub(super) fn parse_struct(&mut self) -> CompileResult<()> {
        let line = self.expect(TokenKind::Keyword, "struct")?.line();
        let name = self.expect_identifier()?.value;
        self.expect_separator("{")?;

        let mut decl = StructDeclaration::new(&name);
        while !self.eat(TokenKind::Separator, "}") {
            let field = self.expect_identifier()?;
            self.expect_separator(":")?;
            let ty = self.parse_type()?;
            decl.add_field(&field.value, ty, field.line())?;
            if !self.eat(TokenKind::Separator, ";") {
                self.eat(TokenKind::Separator, ",");
            }
        }

        log::debug!("declared struct {} with {} fields", name, decl.fields.len());
        self.types.declare_struct(decl, line)?;
        Ok(())
    }

    /// `enum Name { A, B = 4, C }`
    pub(super) fn parse_enum(&mut self) -> CompileResult<()> {
        let line = self.expect(TokenKind::Keyword, "enum")?.line();
        let name = self.expect_identifier()?.value;
        self.expect_separator("{")?;

        let mut decl = EnumDeclaration::new(&name);
        while !self.eat(TokenKind::Separator, "}") {
            let entry = self.expect_identifier()?;
            let value = if self.eat(TokenKind::Operator, "=") {
                let token = self.fetch()?;
                let value = match token.kind {
                    TokenKind::Number => token.value.parse::<u32>().ok(),
                    _ => None,
                };
                Some(value.ok_or_else(|| {
                    CompilerError::expected(token.line(), "enum value", token.value)
                })?)
            } else {
                None
            };
            decl.add_entry(&entry.value, value, entry.line())?;
            self.eat(TokenKind::Separator, ",");
        }

        self.types.declare_enum(decl, line)?;
        Ok(())
    }
}

/// Turn `1.50` into its scaled integer text and precision: `("150", 2)`
pub(crate) fn decimal_literal(text: &str) -> Option<(String, u8)> {
    let (whole, fraction) = text.split_once('.')?;
    let precision = u8::try_from(fraction.len()).ok()?;
    let digits = format!("{}{}", whole, fraction);
    let trimmed = digits.trim_start_matches('0');
    let scaled = if trimmed.is_empty() { "0" } else { trimmed };
    Some((scaled.to_string(), precision))
}

/// Append zeros to a scaled literal to raise its precision
pub(crate) fn rescale(text: &str, from: u8, to: u8) -> Option<String> {
    if from > to {
        return None;
    }
    Some(format!("{}{}", text, "0".repeat(usize::from(to - from))))
}
