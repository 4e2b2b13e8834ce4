//! Struct and enum declarations

use crate::error::{CompileResult, CompilerError};
use crate::types::TypeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub ty: TypeId,
}

/// A user-declared struct: an ordered list of typed fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructDeclaration {
    pub name: String,
    pub fields: Vec<StructField>,
}

impl StructDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn add_field(&mut self, name: &str, ty: TypeId, line: u32) -> CompileResult<()> {
        if self.field(name).is_some() {
            return Err(CompilerError::Duplicate {
                line,
                name: format!("{}.{}", self.name, name),
            });
        }
        self.fields.push(StructField {
            name: name.to_string(),
            ty,
        });
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&StructField> {
        self.fields.iter().find(|f| f.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub name: String,
    pub value: u32,
}

/// A user-declared enum. Values are explicit or follow the previous entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDeclaration {
    pub name: String,
    pub entries: Vec<EnumEntry>,
}

impl EnumDeclaration {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Add an entry; `value` of `None` auto-increments from the last entry.
    pub fn add_entry(&mut self, name: &str, value: Option<u32>, line: u32) -> CompileResult<u32> {
        if self.entry(name).is_some() {
            return Err(CompilerError::Duplicate {
                line,
                name: format!("{}.{}", self.name, name),
            });
        }
        let value = match value {
            Some(value) => value,
            None => self.entries.last().map(|e| e.value + 1).unwrap_or(0),
        };
        if self.entries.iter().any(|e| e.value == value) {
            return Err(CompilerError::semantic(
                line,
                format!("duplicated value {} in enum {}", value, self.name),
            ));
        }
        self.entries.push(EnumEntry {
            name: name.to_string(),
            value,
        });
        Ok(value)
    }

    pub fn entry(&self, name: &str) -> Option<&EnumEntry> {
        self.entries.iter().find(|e| e.name == name)
    }
}
