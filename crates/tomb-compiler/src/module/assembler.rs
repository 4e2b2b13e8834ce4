//! Interface to the bytecode assembler
//!
//! Turning assembly text into a script is done by an external assembler.
//! The compiler hands it the generated lines and gets back the script, a
//! source map and the offset of every label.

use crate::error::{CompileResult, CompilerError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Failure reported by an assembler
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("line {line}: {message}")]
pub struct AssemblerError {
    /// Index of the offending assembly line, 1-based
    pub line: usize,
    pub message: String,
}

/// Script bytes produced from one source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugRange {
    #[serde(rename = "sourceLine")]
    pub source_line: u32,
    #[serde(rename = "startOffset")]
    pub start_offset: u32,
    #[serde(rename = "endOffset")]
    pub end_offset: u32,
}

/// Source map written as the `.debug` file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebugInfo {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub ranges: Vec<DebugRange>,
}

impl DebugInfo {
    pub fn to_json(&self) -> CompileResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CompilerError::internal(0, e.to_string()))
    }

    /// Source line that produced the byte at `offset`
    pub fn find_line(&self, offset: u32) -> Option<u32> {
        self.ranges
            .iter()
            .find(|r| r.start_offset <= offset && offset <= r.end_offset)
            .map(|r| r.source_line)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    pub script: Vec<u8>,
    pub debug_info: DebugInfo,
    /// Byte offset of every label, keyed by its name including `@`
    pub labels: BTreeMap<String, u32>,
}

pub trait Assembler {
    fn assemble(&self, lines: &[String]) -> Result<Assembly, AssemblerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_info_lookup() {
        let info = DebugInfo {
            file_name: "test.tomb".to_string(),
            ranges: vec![
                DebugRange {
                    source_line: 2,
                    start_offset: 0,
                    end_offset: 9,
                },
                DebugRange {
                    source_line: 3,
                    start_offset: 10,
                    end_offset: 14,
                },
            ],
        };
        assert_eq!(info.find_line(12), Some(3));
        assert_eq!(info.find_line(40), None);
        assert!(info.to_json().unwrap().contains("\"sourceLine\": 2"));
    }
}
