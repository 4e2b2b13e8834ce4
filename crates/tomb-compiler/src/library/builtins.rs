//! Precompiled helper routines
//!
//! The helpers ship as an assembly asset. Each `#BUILTIN` header names the
//! library, method, return type and parameters of the routine whose body
//! follows it. A builtin is called like a local method and its body is
//! appended to the assembly of every module that uses it.

use super::declaration::{MethodImplementation, MethodInterface, MethodParameter};
use crate::error::{CompileResult, CompilerError};
use crate::types::{TypeContext, VarKind};

const BUILTINS_ASM: &str = include_str!("../../builtins/builtins.tasm");

const MARKER: &str = "#BUILTIN";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinMethod {
    pub library: String,
    pub name: String,
    pub return_type: VarKind,
    pub parameters: Vec<(String, VarKind)>,
    /// Entry label, without the trailing colon
    pub label: String,
    pub body: Vec<String>,
}

impl BuiltinMethod {
    /// Signature as a callable library method
    pub fn interface(&self, types: &mut TypeContext) -> CompileResult<MethodInterface> {
        let return_type = types.primitive(self.return_type)?;
        let parameters = self
            .parameters
            .iter()
            .map(|(name, kind)| {
                Ok(MethodParameter {
                    name: name.clone(),
                    ty: types.primitive(*kind)?,
                })
            })
            .collect::<CompileResult<Vec<_>>>()?;

        let mut method = MethodInterface::new(
            &self.library,
            &self.name,
            MethodImplementation::LocalCall,
            return_type,
            parameters,
        );
        method.with_alias(&self.label);
        Ok(method)
    }
}

/// Table of all builtin routines
#[derive(Debug, Clone, Default)]
pub struct Builtins {
    methods: Vec<BuiltinMethod>,
}

impl Builtins {
    /// Parse the embedded asset
    pub fn load() -> CompileResult<Self> {
        Self::parse(BUILTINS_ASM)
    }

    pub fn parse(text: &str) -> CompileResult<Self> {
        let mut methods = Vec::new();
        let mut current: Option<(BuiltinMethod, Vec<String>)> = None;

        for (index, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if let Some(header) = line.strip_prefix(MARKER) {
                if let Some(pending) = current.take() {
                    methods.push(finish(pending, index as u32)?);
                }
                current = Some((parse_header(header, index as u32 + 1)?, Vec::new()));
                continue;
            }
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            match current.as_mut() {
                Some((_, body)) => body.push(line.to_string()),
                None => {
                    return Err(CompilerError::internal(
                        index as u32 + 1,
                        format!("builtin code outside of a routine: {}", line),
                    ))
                }
            }
        }

        if let Some(pending) = current.take() {
            methods.push(finish(pending, text.lines().count() as u32)?);
        }

        log::debug!("loaded {} builtin routines", methods.len());
        Ok(Self { methods })
    }

    pub fn methods(&self) -> &[BuiltinMethod] {
        &self.methods
    }

    pub fn for_library<'a>(&'a self, library: &'a str) -> impl Iterator<Item = &'a BuiltinMethod> {
        self.methods.iter().filter(move |m| m.library == library)
    }

    pub fn find_by_label(&self, label: &str) -> Option<&BuiltinMethod> {
        self.methods.iter().find(|m| m.label == label)
    }
}

fn parse_header(header: &str, line: u32) -> CompileResult<BuiltinMethod> {
    let mut parts = header.split_whitespace();
    let (Some(library), Some(name), Some(return_type)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(CompilerError::internal(line, "malformed builtin header"));
    };

    let return_type = parse_kind(return_type, line)?;
    let parameters = parts
        .map(|param| {
            let (name, kind) = param
                .split_once(':')
                .ok_or_else(|| {
                    CompilerError::internal(line, format!("malformed builtin parameter {}", param))
                })?;
            Ok((name.to_string(), parse_kind(kind, line)?))
        })
        .collect::<CompileResult<Vec<_>>>()?;

    Ok(BuiltinMethod {
        library: library.to_string(),
        name: name.to_string(),
        return_type,
        parameters,
        label: String::new(),
        body: Vec::new(),
    })
}

fn parse_kind(name: &str, line: u32) -> CompileResult<VarKind> {
    match VarKind::from_type_name(name) {
        Some(kind) if kind.is_primitive() => Ok(kind),
        _ => Err(CompilerError::internal(
            line,
            format!("unsupported builtin type {}", name),
        )),
    }
}

fn finish(
    (mut method, body): (BuiltinMethod, Vec<String>),
    line: u32,
) -> CompileResult<BuiltinMethod> {
    let label = body
        .first()
        .and_then(|first| first.split(':').next())
        .filter(|label| label.starts_with('@'))
        .ok_or_else(|| {
            CompilerError::internal(
                line,
                format!("builtin {}.{} has no entry label", method.library, method.name),
            )
        })?;
    method.label = label.to_string();
    method.body = body;
    Ok(method)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_asset_parses() {
        let builtins = Builtins::load().unwrap();
        let sqrt = builtins.for_library("Math").find(|m| m.name == "sqrt").unwrap();
        assert_eq!(sqrt.label, "@tomb_math_sqrt");
        assert_eq!(sqrt.return_type, VarKind::Number);
        assert_eq!(sqrt.parameters, vec![("value".to_string(), VarKind::Number)]);
        assert_eq!(sqrt.body.last().map(String::as_str), Some("RET"));
        assert!(builtins.find_by_label("@tomb_string_toUpper").is_some());
    }

    #[test]
    fn test_interface_is_local_call() {
        let builtins = Builtins::load().unwrap();
        let mut types = TypeContext::new();
        let method = builtins.methods()[0].interface(&mut types).unwrap();
        assert_eq!(method.implementation, MethodImplementation::LocalCall);
        assert_eq!(method.alias, builtins.methods()[0].label);
    }

    #[test]
    fn test_missing_label_is_rejected() {
        let err = Builtins::parse("#BUILTIN Math broken number\nRET\n").unwrap_err();
        assert!(err.is_internal());
    }

    #[test]
    fn test_code_before_header_is_rejected() {
        assert!(Builtins::parse("POP r1\n").is_err());
    }
}
