//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::BTreeMap;
use tomb_compiler::module::{DebugInfo, DebugRange};
use tomb_compiler::{
    compile, Assembler, AssemblerError, Assembly, CompileResult, CompiledModule, CompilerConfig,
};

/// Stand-in assembler: every instruction is one byte, comments are free
pub struct LineAssembler;

impl Assembler for LineAssembler {
    fn assemble(&self, lines: &[String]) -> Result<Assembly, AssemblerError> {
        let mut assembly = Assembly::default();
        let mut offset = 0u32;
        let mut source_line = 0u32;

        for (index, line) in lines.iter().enumerate() {
            let line = line.trim();
            if let Some(comment) = line.strip_prefix("// Line ") {
                source_line = comment
                    .split(':')
                    .next()
                    .and_then(|n| n.parse().ok())
                    .unwrap_or(source_line);
                continue;
            }
            if line.is_empty() || line.starts_with("//") {
                continue;
            }
            if line.starts_with("BOGUS") {
                return Err(AssemblerError {
                    line: index + 1,
                    message: format!("unknown opcode in `{}`", line),
                });
            }
            if let Some((label, _)) = line.split_once(':') {
                if label.starts_with('@') {
                    assembly.labels.insert(label.to_string(), offset);
                }
            }
            assembly.script.push((offset % 256) as u8);
            assembly.debug_info.ranges.push(DebugRange {
                source_line,
                start_offset: offset,
                end_offset: offset,
            });
            offset += 1;
        }
        assembly.debug_info = DebugInfo {
            file_name: "test.tomb".to_string(),
            ranges: std::mem::take(&mut assembly.debug_info.ranges),
        };
        Ok(assembly)
    }
}

pub fn compile_source(source: &str) -> CompileResult<Vec<CompiledModule>> {
    let config = CompilerConfig {
        failed_asm_path: None,
        ..CompilerConfig::default()
    };
    compile(source, &LineAssembler, &config)
}

/// Instructions only, without source comments
pub fn instructions(module: &CompiledModule) -> Vec<&str> {
    module
        .asm
        .iter()
        .map(|l| l.trim())
        .filter(|l| !l.is_empty() && !l.starts_with("//"))
        .collect()
}

pub fn labels(module: &CompiledModule) -> BTreeMap<String, usize> {
    instructions(module)
        .iter()
        .enumerate()
        .filter_map(|(i, l)| l.split_once(':').map(|(label, _)| (label, i)))
        .filter(|(label, _)| label.starts_with('@'))
        .map(|(label, i)| (label.to_string(), i))
        .collect()
}
