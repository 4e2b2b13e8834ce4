use tomb_compiler::ast::{AssignSelector, ExpressionKind, StatementKind};
use tomb_compiler::library::MethodKind;
use tomb_compiler::module::{EventDescription, ModuleKind};
use tomb_compiler::symbols::VarStorage;
use tomb_compiler::types::TypeId;
use tomb_compiler::{Compilation, CompilerError, Parser};

fn parse(source: &str) -> Compilation {
    Parser::new(source).unwrap().process().unwrap()
}

fn parse_err(source: &str) -> CompilerError {
    match Parser::new(source).unwrap().process() {
        Ok(_) => panic!("expected an error"),
        Err(err) => err,
    }
}

// ============================================================================
// Modules
// ============================================================================

#[test]
fn test_module_kinds() {
    let compilation = parse(
        "contract a { }\n\
         token B { }\n\
         organization c { }\n\
         script d { code() { } }\n\
         description e { code(from: address, data: any): string { return \"x\"; } }",
    );
    let kinds: Vec<&str> = compilation.modules.iter().map(|m| m.kind.name()).collect();
    assert_eq!(
        kinds,
        vec!["contract", "token", "organization", "script", "description"]
    );
}

#[test]
fn test_duplicate_module_name() {
    let err = parse_err("contract a { }\ncontract a { }");
    assert!(matches!(err, CompilerError::Duplicate { line: 2, .. }));
}

#[test]
fn test_script_needs_code() {
    let err = parse_err("script empty { }");
    assert!(matches!(err, CompilerError::Semantic { .. }));
}

#[test]
fn test_global_not_allowed_in_script() {
    let err = parse_err("script s { global x: number; code() { } }");
    match err {
        CompilerError::Semantic { message, .. } => {
            assert_eq!(message, "global is not allowed in a script")
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_nft_inside_token() {
    let compilation = parse(
        "struct GhostRom { name: string; }\n\
         token GHOST {\n\
             nft ghost<GhostRom, number> {\n\
                 property name: string = _ROM.name;\n\
             }\n\
         }",
    );
    let token = &compilation.modules[0];
    assert_eq!(token.sub_modules().len(), 1);

    let nft = compilation.find_module("ghost").unwrap();
    let ModuleKind::Nft { ram, token, .. } = &nft.kind else {
        panic!("expected an NFT module");
    };
    assert_eq!(*ram, TypeId::NUMBER);
    assert_eq!(token, "GHOST");

    let getter = &nft.contract().unwrap().methods[0];
    assert_eq!(getter.name(), "getName");
    assert_eq!(getter.interface.kind, MethodKind::Property);

    let implicit: Vec<_> = compilation
        .scopes
        .scope(nft.scope)
        .variables()
        .iter()
        .map(|&v| compilation.scopes.variable(v))
        .filter(|d| d.storage == VarStorage::Nft)
        .map(|d| d.name.as_str())
        .collect();
    assert_eq!(implicit, vec!["_tokenID", "_seriesID", "_mintID", "_ROM", "_RAM"]);
}

#[test]
fn test_nft_only_in_token() {
    let err = parse_err("contract c { nft thing<number, number> { } }");
    assert!(matches!(err, CompilerError::Semantic { .. }));
}

#[test]
fn test_nft_variables_are_read_only() {
    let err = parse_err(
        "token T { nft n<number, number> { public f() { _RAM = 2; } } }",
    );
    assert!(matches!(err, CompilerError::Semantic { .. }));
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_import_is_required_for_libraries() {
    let err = parse_err("contract c { public f() { Runtime.log(\"hi\"); } }");
    assert!(matches!(err, CompilerError::UnimportedLibrary { line: 1, .. }));
}

#[test]
fn test_unknown_library() {
    let err = parse_err("contract c { import Nonsense; }");
    assert!(matches!(err, CompilerError::UnknownLibrary { .. }));
}

#[test]
fn test_import_twice() {
    let err = parse_err("contract c { import Runtime; import Runtime; }");
    assert!(matches!(err, CompilerError::Duplicate { .. }));
}

#[test]
fn test_dotted_import_without_abi() {
    let err = parse_err("contract c { import other.thing; }");
    assert!(matches!(err, CompilerError::UnknownLibrary { .. }));
}

#[test]
fn test_constants() {
    let compilation = parse(
        "contract c {\n\
             const LIMIT: number = 10;\n\
             const RATE: decimal<3> = 1.5;\n\
             public f(): number { return LIMIT; }\n\
         }",
    );
    let module = &compilation.modules[0];
    let rate = compilation.scopes.find_constant(module.scope, "RATE").unwrap();
    assert_eq!(rate.value, "1500");
}

#[test]
fn test_constant_names_are_uppercase() {
    let err = parse_err("contract c { const limit: number = 10; }");
    assert!(matches!(err, CompilerError::InvalidName { .. }));
}

#[test]
fn test_duplicate_global() {
    let err = parse_err("contract c { global x: number; global x: string; }");
    assert!(matches!(err, CompilerError::Duplicate { .. }));
}

#[test]
fn test_storage_collection_types() {
    let compilation = parse(
        "contract c {\n\
             global balances: storage_map<address, decimal<8>>;\n\
             global names: storage_list<string>;\n\
         }",
    );
    let module = &compilation.modules[0];
    let vars = compilation.scopes.scope(module.scope).variables().to_vec();
    let balances = compilation.scopes.variable(vars[0]);
    let collection = balances.collection.unwrap();
    assert_eq!(collection.key, Some(TypeId::ADDRESS));
    assert_eq!(compilation.types.precision(collection.value), Some(8));

    let names = compilation.scopes.variable(vars[1]).collection.unwrap();
    assert_eq!(names.key, None);
    assert_eq!(names.value, TypeId::STRING);
}

#[test]
fn test_storage_type_outside_global() {
    let err = parse_err("contract c { public f(x: storage_map<number, number>) { } }");
    assert!(matches!(err, CompilerError::Semantic { .. }));
}

#[test]
fn test_events() {
    let compilation = parse(
        "description show { code(from: address, data: any): string { return \"shown\"; } }\n\
         contract c {\n\
             event Bought: number = \"{address} bought {data}\";\n\
             event Raw: string = 0x0102;\n\
             event Shown: number = show;\n\
         }",
    );
    let contract = compilation.modules[1].contract().unwrap();
    let values: Vec<u8> = contract.events.iter().map(|e| e.value).collect();
    assert_eq!(values, vec![64, 65, 66]);
    assert_eq!(
        contract.events[0].description,
        EventDescription::Template("{address} bought {data}".to_string())
    );
    assert_eq!(
        contract.events[1].description,
        EventDescription::Bytes("0102".to_string())
    );
    assert_eq!(
        contract.events[2].description,
        EventDescription::Module("show".to_string())
    );
}

#[test]
fn test_event_description_module_must_exist() {
    let err = parse_err(
        "description show { code(from: address, data: any): string { return \"x\"; } }\n\
         contract c { event E: number = missing; }",
    );
    assert!(matches!(err, CompilerError::UnknownIdentifier { .. }));
}

// ============================================================================
// Methods
// ============================================================================

#[test]
fn test_constructor_signature() {
    let compilation = parse("contract c { constructor(owner: address) { } }");
    let method = &compilation.modules[0].contract().unwrap().methods[0];
    assert_eq!(method.name(), "Initialize");
    assert_eq!(method.interface.kind, MethodKind::Constructor);

    let err = parse_err("contract c { constructor(owner: number) { } }");
    assert!(matches!(err, CompilerError::Semantic { .. }));
}

#[test]
fn test_trigger_names() {
    let compilation = parse(
        "contract c {\n\
             trigger upgrade(from: address) { }\n\
             trigger onKill(from: address) { }\n\
         }",
    );
    let methods = &compilation.modules[0].contract().unwrap().methods;
    assert_eq!(methods[0].name(), "onUpgrade");
    assert_eq!(methods[1].name(), "onKill");
}

#[test]
fn test_trigger_must_fit_module_kind() {
    let err = parse_err(
        "organization o { trigger onMint(a: address, b: address, s: string, n: number) { } }",
    );
    assert!(matches!(err, CompilerError::Semantic { .. }));

    let err = parse_err("contract c { trigger onWitness(from: number) { } }");
    assert!(matches!(err, CompilerError::Semantic { .. }));
}

#[test]
fn test_property_names() {
    let compilation = parse(
        "contract c {\n\
             property isOpen: bool = true;\n\
             property price: number = 5;\n\
         }",
    );
    let methods = &compilation.modules[0].contract().unwrap().methods;
    assert_eq!(methods[0].name(), "isOpen");
    assert_eq!(methods[1].name(), "getPrice");
}

#[test]
fn test_task_returns_bool() {
    let compilation = parse("contract c { task tick() { return true; } }");
    let method = &compilation.modules[0].contract().unwrap().methods[0];
    assert_eq!(method.interface.return_type, TypeId::BOOL);
}

#[test]
fn test_missing_return_value() {
    let err = parse_err("contract c { public f(): number { } }");
    assert!(matches!(err, CompilerError::Semantic { .. }));
}

#[test]
fn test_return_on_one_branch_only() {
    let err = parse_err(
        "contract c { public f(ok: bool): number { if (ok) { return 1; } } }",
    );
    assert!(matches!(err, CompilerError::Semantic { ref message, .. }
        if message == "f must return a value on every path"));

    parse(
        "contract c { public f(ok: bool): number { if (ok) { return 1; } else { throw \"no\"; } } }",
    );
}

#[test]
fn test_recursive_call() {
    let compilation = parse(
        "contract c {\n\
             public fact(n: number): number {\n\
                 if (n < 2) { return 1; }\n\
                 return n * fact(n - 1);\n\
             }\n\
         }",
    );
    let method = &compilation.modules[0].contract().unwrap().methods[0];
    assert_eq!(method.body.statements.len(), 2);
}

#[test]
fn test_call_to_later_method_is_unknown() {
    let err = parse_err(
        "contract c {\n\
             public a(): number { return this.b(); }\n\
             public b(): number { return 1; }\n\
         }",
    );
    assert!(matches!(err, CompilerError::UnknownMethod { line: 2, .. }));
}

// ============================================================================
// Statements and expressions
// ============================================================================

#[test]
fn test_storage_map_call_gets_field_name() {
    let compilation = parse(
        "contract c {\n\
             global balances: storage_map<address, number>;\n\
             public get(from: address): number { return balances.get(from); }\n\
         }",
    );
    let method = &compilation.modules[0].contract().unwrap().methods[0];
    let StatementKind::Return(Some(value)) = &method.body.statements[0].kind else {
        panic!("expected return");
    };
    assert_eq!(value.ty, TypeId::NUMBER);
    let ExpressionKind::Call(call) = &value.kind else {
        panic!("expected call");
    };
    assert_eq!(call.arguments[0].string_value(), Some("balances"));
    assert_eq!(call.arguments.len(), 2);
}

#[test]
fn test_storage_collection_is_not_a_value() {
    let err = parse_err(
        "contract c {\n\
             global names: storage_list<string>;\n\
             public f() { local x = names; }\n\
         }",
    );
    assert!(matches!(err, CompilerError::Semantic { line: 3, .. }));
}

#[test]
fn test_struct_field_assignment() {
    let compilation = parse(
        "struct Point { x: number; y: number; }\n\
         contract c {\n\
             public f(): number { local p: Point; p.x = 1; p.y = 2; return p.x; }\n\
         }",
    );
    let method = &compilation.modules[0].contract().unwrap().methods[0];
    let StatementKind::Assign { target, .. } = &method.body.statements[1].kind else {
        panic!("expected assignment");
    };
    assert_eq!(target.selector, AssignSelector::Field("x".to_string()));
}

#[test]
fn test_implicit_string_cast() {
    let compilation = parse(
        "contract c { public f(n: number): string { return \"n = \" + n; } }",
    );
    let method = &compilation.modules[0].contract().unwrap().methods[0];
    let StatementKind::Return(Some(value)) = &method.body.statements[0].kind else {
        panic!("expected return");
    };
    let ExpressionKind::Binary { right, .. } = &value.kind else {
        panic!("expected binary");
    };
    assert!(matches!(right.kind, ExpressionKind::Cast(_)));
    assert_eq!(right.ty, TypeId::STRING);
}

#[test]
fn test_type_mismatch() {
    let err = parse_err("contract c { public f(a: number, b: bool): number { return a + b; } }");
    assert!(matches!(err, CompilerError::TypeMismatch { .. }));
}

#[test]
fn test_undeclared_variable() {
    let err = parse_err("contract c { public f(): number { return missing; } }");
    assert!(matches!(err, CompilerError::UndeclaredVariable { .. }));
}

#[test]
fn test_enum_values() {
    let compilation = parse(
        "enum Color { Red, Green, Blue }\n\
         contract c { public f(): Color { return Color.Blue; } }",
    );
    let method = &compilation.modules[0].contract().unwrap().methods[0];
    let StatementKind::Return(Some(value)) = &method.body.statements[0].kind else {
        panic!("expected return");
    };
    assert_eq!(value.literal_value(), Some("2"));
}

#[test]
fn test_emit_checks_event() {
    let err = parse_err(
        "contract c { public f(from: address) { emit Missing(from, 1); } }",
    );
    assert!(matches!(err, CompilerError::UnknownIdentifier { .. }));
}

#[test]
fn test_this_symbol_in_token() {
    let compilation = parse("token GAS { property symbol: string = $THIS_SYMBOL; }");
    let method = &compilation.modules[0].contract().unwrap().methods[0];
    let StatementKind::Return(Some(value)) = &method.body.statements[0].kind else {
        panic!("expected return");
    };
    assert_eq!(value.string_value(), Some("GAS"));
}
