//! Token definitions for Tomb source code.

use std::fmt;

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `( ) { } [ ] , ; :`
    Separator,
    Operator,
    /// The `.` member selector
    Selector,
    Keyword,
    Identifier,
    /// A built-in type name such as `number`
    Type,
    /// String literal, quotes included
    String,
    Number,
    Decimal,
    Bool,
    /// `@` address literal, the sigil is stripped
    Address,
    /// `#` hash literal, the sigil is stripped
    Hash,
    /// `0x` byte literal
    Bytes,
    /// Raw text captured from an `asm { ... }` block
    Asm,
    /// `$NAME` compile-time macro
    Macro,
    /// Anything the lexer could not classify
    Invalid,
}

impl TokenKind {
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Separator => "separator",
            TokenKind::Operator => "operator",
            TokenKind::Selector => "selector",
            TokenKind::Keyword => "keyword",
            TokenKind::Identifier => "identifier",
            TokenKind::Type => "type",
            TokenKind::String => "string",
            TokenKind::Number => "number",
            TokenKind::Decimal => "decimal",
            TokenKind::Bool => "bool",
            TokenKind::Address => "address",
            TokenKind::Hash => "hash",
            TokenKind::Bytes => "bytes",
            TokenKind::Asm => "asm block",
            TokenKind::Macro => "macro",
            TokenKind::Invalid => "invalid token",
        }
    }

    /// Literal kinds that can appear directly as an expression operand
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::String
                | TokenKind::Number
                | TokenKind::Decimal
                | TokenKind::Bool
                | TokenKind::Address
                | TokenKind::Hash
                | TokenKind::Bytes
        )
    }
}

/// Source location information for a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub line: u32,
    pub column: u32,
}

impl Span {
    pub fn new(start: usize, end: usize, line: u32, column: u32) -> Self {
        Self {
            start,
            end,
            line,
            column,
        }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            value: value.into(),
            span,
        }
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.span.line
    }

    /// Check both category and text
    #[inline]
    pub fn is(&self, kind: TokenKind, value: &str) -> bool {
        self.kind == kind && self.value == value
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

pub const KEYWORDS: &[&str] = &[
    "contract",
    "token",
    "script",
    "description",
    "organization",
    "struct",
    "enum",
    "const",
    "global",
    "local",
    "import",
    "event",
    "constructor",
    "property",
    "public",
    "private",
    "task",
    "trigger",
    "code",
    "nft",
    "if",
    "else",
    "while",
    "do",
    "for",
    "switch",
    "case",
    "default",
    "break",
    "continue",
    "return",
    "throw",
    "emit",
    "asm",
    "this",
];

pub const TYPE_NAMES: &[&str] = &[
    "none",
    "number",
    "bool",
    "string",
    "timestamp",
    "address",
    "hash",
    "bytes",
    "any",
    "task",
    "method",
    "module",
    "decimal",
    "storage_map",
    "storage_list",
    "storage_set",
];

pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}

pub fn is_type_name(word: &str) -> bool {
    TYPE_NAMES.contains(&word)
}

/// Binary operators, including compound assignments
pub const BINARY_OPERATORS: &[&str] = &[
    "==", "!=", "<=", ">=", "<", ">", "+", "-", "*", "/", "%", "&&", "||", "&", "|", "^", "<<",
    ">>",
];

pub const ASSIGNMENT_OPERATORS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "<<=", ">>=", "|=", "&=", "^=",
];

pub fn is_binary_operator(op: &str) -> bool {
    BINARY_OPERATORS.contains(&op)
}

pub fn is_assignment_operator(op: &str) -> bool {
    ASSIGNMENT_OPERATORS.contains(&op)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_task_is_keyword_and_type() {
        let shared: Vec<_> = KEYWORDS.iter().filter(|kw| is_type_name(kw)).collect();
        assert_eq!(shared, vec![&"task"]);
    }

    #[test]
    fn test_operator_classification() {
        assert!(is_binary_operator("<<"));
        assert!(!is_binary_operator("<<="));
        assert!(is_assignment_operator("<<="));
        assert!(!is_assignment_operator("=="));
    }

    #[test]
    fn test_token_is() {
        let tok = Token::new(TokenKind::Separator, "{", Span::new(0, 1, 1, 1));
        assert!(tok.is(TokenKind::Separator, "{"));
        assert!(!tok.is(TokenKind::Operator, "{"));
        assert_eq!(tok.line(), 1);
    }
}
