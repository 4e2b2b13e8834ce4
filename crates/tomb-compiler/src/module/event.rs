//! Event declarations
//!
//! Every event carries a description payload that wallets run to render it.
//! A string template becomes a tiny script that concatenates the event
//! address and data into the template.

use crate::codegen::Opcode;
use crate::types::TypeId;

/// First event kind available to contracts
pub const CUSTOM_EVENT_BASE: u8 = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventDescription {
    /// `"{address} bought {data}"`
    Template(String),
    /// Raw description script, hex without the `0x` prefix
    Bytes(String),
    /// Script of a compiled `description` module
    Module(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDeclaration {
    pub name: String,
    /// Event kind written by `emit`
    pub value: u8,
    pub return_type: TypeId,
    pub description: EventDescription,
    pub line: u32,
}

/// One piece of a description template
#[derive(Debug, Clone, PartialEq, Eq)]
enum TemplatePart<'a> {
    Text(&'a str),
    Address,
    Data,
}

fn split_template(template: &str) -> Vec<TemplatePart<'_>> {
    let mut parts = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let part = match &rest[start + 1..start + len] {
            "address" => TemplatePart::Address,
            "data" => TemplatePart::Data,
            _ => {
                // Unknown placeholders stay as text
                parts.push(TemplatePart::Text(&rest[..start + len + 1]));
                rest = &rest[start + len + 1..];
                continue;
            }
        };
        if start > 0 {
            parts.push(TemplatePart::Text(&rest[..start]));
        }
        parts.push(part);
        rest = &rest[start + len + 1..];
    }
    if !rest.is_empty() {
        parts.push(TemplatePart::Text(rest));
    }
    parts
}

/// Assembly of the description script for a template. The script pops the
/// event address and data and pushes the rendered string.
pub fn template_asm(template: &str) -> Vec<String> {
    let op = |opcode: Opcode, operands: &str| format!("{} {}", opcode.name(), operands);
    let mut asm = vec![
        op(Opcode::Pop, "r2"),
        op(Opcode::Cast, "r2 r2 #String"),
        op(Opcode::Pop, "r3"),
        op(Opcode::Cast, "r3 r3 #String"),
        op(Opcode::Load, "r1 \"\""),
    ];
    for part in split_template(template) {
        match part {
            TemplatePart::Text(text) => {
                asm.push(op(Opcode::Load, &format!("r0 \"{}\"", text)));
                asm.push(op(Opcode::Cat, "r1 r0 r1"));
            }
            TemplatePart::Address => asm.push(op(Opcode::Cat, "r1 r2 r1")),
            TemplatePart::Data => asm.push(op(Opcode::Cat, "r1 r3 r1")),
        }
    }
    asm.push(op(Opcode::Push, "r1"));
    asm.push(Opcode::Ret.name().to_string());
    asm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_template() {
        assert_eq!(
            split_template("{address} bought {data}!"),
            vec![
                TemplatePart::Address,
                TemplatePart::Text(" bought "),
                TemplatePart::Data,
                TemplatePart::Text("!"),
            ]
        );
        assert_eq!(
            split_template("odd {name} here"),
            vec![TemplatePart::Text("odd {name}"), TemplatePart::Text(" here")]
        );
        assert!(split_template("").is_empty());
    }

    #[test]
    fn test_template_asm_renders_parts_in_order() {
        let asm = template_asm("{address} sent {data}");
        assert_eq!(asm[0], "POP r2");
        assert!(asm.contains(&"LOAD r0 \" sent \"".to_string()));
        let address = asm.iter().position(|l| l == "CAT r1 r2 r1").unwrap();
        let data = asm.iter().position(|l| l == "CAT r1 r3 r1").unwrap();
        assert!(address < data);
        assert_eq!(asm.last().unwrap(), "RET");
    }
}
