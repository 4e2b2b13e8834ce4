//! Lexer for the Tomb language.
//!
//! Whitespace, comments and `asm { ... }` blocks are scanned by hand; every
//! other token goes through logos. Lexing never fails: characters that fit no
//! category become `Invalid` tokens and the parser reports them.

use crate::parser::token::{is_keyword, is_type_name, Span, Token, TokenKind};
use logos::Logos;

/// Logos-based token enum for lexing.
///
/// Converted to a `TokenKind` right after matching; the token text is kept
/// verbatim.
#[derive(Logos, Debug, Clone, PartialEq)]
enum LogosToken {
    #[regex(r"[ \t\r\n]+", logos::skip)]
    Whitespace,

    #[regex(r"[0-9]+\.[0-9]+")]
    Decimal,

    #[regex(r"[0-9]+")]
    Number,

    #[regex(r"0x[0-9a-fA-F]*")]
    Bytes,

    #[token("true")]
    #[token("false")]
    Bool,

    #[regex(r"@[A-Za-z0-9]+")]
    Address,

    #[regex(r"#[0-9a-fA-F]+")]
    Hash,

    #[regex(r"\$[A-Za-z_][A-Za-z0-9_]*")]
    Macro,

    // An unterminated string runs to the end of input and keeps no closing quote
    #[regex(r#""[^"]*"?"#)]
    String,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word,

    #[token("==")]
    #[token("!=")]
    #[token("<=")]
    #[token(">=")]
    #[token("<")]
    #[token(">")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("!")]
    #[token("&&")]
    #[token("||")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("<<")]
    #[token(">>")]
    #[token("=")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("|=")]
    #[token("&=")]
    #[token("^=")]
    Operator,

    #[token("(")]
    #[token(")")]
    #[token("{")]
    #[token("}")]
    #[token("[")]
    #[token("]")]
    #[token(",")]
    #[token(";")]
    #[token(":")]
    Separator,

    #[token(".")]
    Selector,
}

pub struct Lexer<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    line: u32,
    column: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            tokens: Vec::new(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize a whole source file.
    pub fn process(source: &str) -> Vec<Token> {
        Lexer::new(source).tokenize()
    }

    pub fn tokenize(mut self) -> Vec<Token> {
        while self.pos < self.source.len() {
            self.skip_trivia();

            if self.pos >= self.source.len() {
                break;
            }

            if self.try_asm_block() {
                continue;
            }

            // Use logos for regular tokens
            let mut logos_lexer = LogosToken::lexer(&self.source[self.pos..]);

            let Some(token_result) = logos_lexer.next() else {
                break;
            };

            let range = logos_lexer.span();
            let start = self.pos + range.start;
            let end = self.pos + range.end;
            let span = Span::new(start, end, self.line, self.column);
            let text = &self.source[start..end];

            let token = match token_result {
                Ok(logos_token) => Self::convert_token(logos_token, text, span),
                Err(_) => Token::new(TokenKind::Invalid, text, span),
            };
            self.tokens.push(token);

            self.advance_to(end);
        }

        log::trace!("lexed {} tokens", self.tokens.len());
        self.tokens
    }

    fn convert_token(logos_token: LogosToken, text: &str, span: Span) -> Token {
        let kind = match logos_token {
            LogosToken::Decimal => TokenKind::Decimal,
            LogosToken::Number => TokenKind::Number,
            LogosToken::Bytes => TokenKind::Bytes,
            LogosToken::Bool => TokenKind::Bool,
            LogosToken::Address => return Token::new(TokenKind::Address, &text[1..], span),
            LogosToken::Hash => return Token::new(TokenKind::Hash, &text[1..], span),
            LogosToken::Macro => return Token::new(TokenKind::Macro, &text[1..], span),
            LogosToken::String => TokenKind::String,
            LogosToken::Word if is_keyword(text) => TokenKind::Keyword,
            LogosToken::Word if is_type_name(text) => TokenKind::Type,
            LogosToken::Word => TokenKind::Identifier,
            LogosToken::Operator => TokenKind::Operator,
            LogosToken::Separator => TokenKind::Separator,
            LogosToken::Selector => TokenKind::Selector,
            LogosToken::Whitespace => TokenKind::Invalid,
        };
        Token::new(kind, text, span)
    }

    /// Skip whitespace and comments. An unterminated block comment runs to
    /// the end of input.
    fn skip_trivia(&mut self) {
        let bytes = self.source.as_bytes();
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b' ' | b'\t' | b'\r' | b'\n' => self.advance_to(self.pos + 1),
                b'/' if self.pos + 1 < bytes.len() => match bytes[self.pos + 1] {
                    b'/' => {
                        let end = self.source[self.pos..]
                            .find('\n')
                            .map(|offset| self.pos + offset)
                            .unwrap_or(bytes.len());
                        self.advance_to(end);
                    }
                    b'*' => {
                        let end = self.source[self.pos + 2..]
                            .find("*/")
                            .map(|offset| self.pos + 2 + offset + 2)
                            .unwrap_or(bytes.len());
                        self.advance_to(end);
                    }
                    _ => break,
                },
                _ => break,
            }
        }
    }

    /// Capture the raw body of `asm { ... }`, honouring nested braces.
    /// An unterminated block runs to the end of input.
    fn try_asm_block(&mut self) -> bool {
        let rest = &self.source[self.pos..];
        if !rest.starts_with("asm") {
            return false;
        }
        let after = &rest[3..];
        if after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return false;
        }
        let trimmed = after.trim_start();
        if !trimmed.starts_with('{') {
            return false;
        }

        let open = self.pos + 3 + (after.len() - trimmed.len());
        let body_start = open + 1;
        let mut depth = 1usize;
        let mut close = None;
        for (offset, c) in self.source[body_start..].char_indices() {
            match c {
                '{' => depth += 1,
                '}' => {
                    depth -= 1;
                    if depth == 0 {
                        close = Some(body_start + offset);
                        break;
                    }
                }
                _ => {}
            }
        }

        let (body_end, end) = match close {
            Some(close) => (close, close + 1),
            None => (self.source.len(), self.source.len()),
        };

        let span = Span::new(self.pos, end, self.line, self.column);
        self.tokens.push(Token::new(
            TokenKind::Asm,
            &self.source[body_start..body_end],
            span,
        ));
        self.advance_to(end);
        true
    }

    /// Move to `end`, updating line and column
    fn advance_to(&mut self, end: usize) {
        for c in self.source[self.pos..end].chars() {
            if c == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }
}
