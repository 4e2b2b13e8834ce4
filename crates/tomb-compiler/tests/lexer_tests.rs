use tomb_compiler::parser::token::{Token, TokenKind, ASSIGNMENT_OPERATORS, BINARY_OPERATORS};
use tomb_compiler::Lexer;

const CONTRACT: &str = r#"struct Bid { owner: address; amount: decimal<8>; }

contract auction {
    import Runtime;

    global bids: storage_map<address, decimal<8>>;
    global owner: address;

    constructor(creator: address) {
        owner = creator;
    }

    public bid(from: address, amount: decimal<8>) {
        Runtime.expect(Runtime.isWitness(from), "witness failed");
        bids.set(from, amount);
    }
}
"#;

fn find<'a>(tokens: &'a [Token], kind: TokenKind, value: &str) -> Option<&'a Token> {
    tokens.iter().find(|t| t.is(kind, value))
}

#[test]
fn test_contract_has_no_invalid_tokens() {
    let tokens = Lexer::process(CONTRACT);
    assert!(tokens.iter().all(|t| t.kind != TokenKind::Invalid));
}

#[test]
fn test_token_lines() {
    let tokens = Lexer::process(CONTRACT);
    assert_eq!(find(&tokens, TokenKind::Keyword, "struct").unwrap().line(), 1);
    assert_eq!(find(&tokens, TokenKind::Keyword, "contract").unwrap().line(), 3);
    assert_eq!(find(&tokens, TokenKind::Keyword, "constructor").unwrap().line(), 9);
    assert_eq!(find(&tokens, TokenKind::Identifier, "bid").unwrap().line(), 13);
}

#[test]
fn test_type_names_and_keywords() {
    let tokens = Lexer::process(CONTRACT);
    assert!(find(&tokens, TokenKind::Type, "storage_map").is_some());
    assert!(find(&tokens, TokenKind::Type, "decimal").is_some());
    assert!(find(&tokens, TokenKind::Keyword, "global").is_some());
    assert!(find(&tokens, TokenKind::Identifier, "Runtime").is_some());
}

#[test]
fn test_nested_generic_closes_with_shift_token() {
    let tokens = Lexer::process("storage_map<address, decimal<8>>");
    let last = tokens.last().unwrap();
    assert_eq!(last.kind, TokenKind::Operator);
    assert_eq!(last.value, ">>");
}

#[test]
fn test_spans_cover_token_text() {
    let source = "local total = 15;";
    for token in Lexer::process(source) {
        let text = &source[token.span.start..token.span.end];
        assert_eq!(text, token.value);
    }
}

#[test]
fn test_string_keeps_quotes() {
    let tokens = Lexer::process(r#"Runtime.log("hello world");"#);
    let string = tokens.iter().find(|t| t.kind == TokenKind::String).unwrap();
    assert_eq!(string.value, "\"hello world\"");
}

#[test]
fn test_every_operator_lexes_to_one_token() {
    let operators = BINARY_OPERATORS
        .iter()
        .chain(ASSIGNMENT_OPERATORS)
        .chain(["!"].iter());
    for &op in operators {
        let tokens = Lexer::process(op);
        assert_eq!(tokens.len(), 1, "{}", op);
        assert_eq!(tokens[0].kind, TokenKind::Operator, "{}", op);
        assert_eq!(tokens[0].value, op);
    }
}
