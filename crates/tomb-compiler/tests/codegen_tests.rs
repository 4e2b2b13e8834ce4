mod common;

use common::{compile_source, instructions, LineAssembler};
use tomb_compiler::{compile, CompilerConfig, CompilerError};

fn asm_of(source: &str) -> Vec<String> {
    let modules = compile_source(source).unwrap();
    instructions(&modules[0])
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn semantic_message(source: &str) -> String {
    match compile_source(source) {
        Err(CompilerError::Semantic { message, .. }) => message,
        other => panic!("expected a semantic error, got {:?}", other),
    }
}

#[test]
fn test_method_pops_arguments_in_order() {
    let asm = asm_of("contract c { public add(a: number, b: number): number { return a + b; } }");
    let pop_a = asm.iter().position(|l| l == "POP $a").unwrap();
    let pop_b = asm.iter().position(|l| l == "POP $b").unwrap();
    assert!(pop_a < pop_b);
    assert_eq!(asm[0], "@entry_add: NOP");
    assert!(asm.iter().any(|l| l.starts_with("ADD ")));
    assert_eq!(asm.last().map(String::as_str), Some("RET"));
}

#[test]
fn test_registers_are_balanced() {
    let modules = compile_source(
        "contract c {\n\
             public f(a: number, b: number): number {\n\
                 local total: number = 0;\n\
                 while (total < a) { total += b; }\n\
                 return total;\n\
             }\n\
         }",
    )
    .unwrap();
    let stats = modules[0].register_stats;
    assert_eq!(stats.allocations, stats.deallocations);
    assert!(stats.peak > 0);
}

#[test]
fn test_globals_are_loaded_and_stored() {
    let modules = compile_source(
        "contract counter {\n\
             global count: number;\n\
             constructor(owner: address) { count = 0; }\n\
             public increment() { count += 1; }\n\
             public peek(): number { return 7; }\n\
         }",
    )
    .unwrap();
    let asm = modules[0].asm.join("\n");
    let (constructor, rest) = asm.split_once("@entry_increment").unwrap();
    let (increment, peek) = rest.split_once("@entry_peek").unwrap();

    assert!(!constructor.contains("\"Data.Get\""));
    assert!(constructor.contains("\"Data.Set\""));
    assert!(increment.contains("\"Data.Get\""));
    assert!(increment.contains("\"Data.Set\""));
    assert!(!peek.contains("\"Data.Get\""));
}

#[test]
fn test_constructor_must_initialize_globals() {
    let message = semantic_message(
        "contract c {\n\
             global owner: address;\n\
             global total: number;\n\
             constructor(creator: address) { owner = creator; }\n\
         }",
    );
    assert_eq!(message, "global total is not initialized in the constructor");
}

#[test]
fn test_constructor_initializes_globals_once() {
    let message = semantic_message(
        "contract c {\n\
             global total: number;\n\
             constructor(creator: address) { total = 1; total = 2; }\n\
         }",
    );
    assert_eq!(
        message,
        "global total is initialized more than once in the constructor"
    );
}

#[test]
fn test_collections_need_no_initialization() {
    let result = compile_source(
        "contract c {\n\
             global balances: storage_map<address, number>;\n\
             constructor(creator: address) { balances.set(creator, 10); }\n\
         }",
    );
    assert!(result.is_ok());
}

#[test]
fn test_unused_variable() {
    let message = semantic_message("contract c { public f() { local x: number; } }");
    assert_eq!(message, "unused variable: x");
}

#[test]
fn test_variable_used_before_assignment() {
    let message = semantic_message(
        "contract c { public f(): number { local x: number; return x; } }",
    );
    assert_eq!(message, "variable x is used before being assigned");
}

#[test]
fn test_break_outside_loop() {
    let err = compile_source("contract c { public f() { break; } }").unwrap_err();
    assert!(matches!(
        err,
        CompilerError::NotInsideLoop {
            keyword: "break",
            ..
        }
    ));
}

#[test]
fn test_while_loop_labels() {
    let asm = asm_of(
        "contract c {\n\
             public f(n: number): number {\n\
                 local i: number = 0;\n\
                 while (i < n) { i += 1; }\n\
                 return i;\n\
             }\n\
         }",
    );
    let start = asm.iter().find(|l| l.starts_with("@loop_start_")).unwrap();
    let label = start.trim_end_matches(": NOP");
    assert!(asm.iter().any(|l| l == &format!("JMP {}", label)));
    assert!(asm.iter().any(|l| l.starts_with("JMPNOT ")));
}

#[test]
fn test_continue_in_do_while_jumps_to_condition() {
    let asm = asm_of(
        "contract c {\n\
             public f(n: number): number {\n\
                 local i: number = 0;\n\
                 do { i += 1; continue; } while (i < n);\n\
                 return i;\n\
             }\n\
         }",
    );
    let next = asm.iter().find(|l| l.starts_with("@loop_continue_")).unwrap();
    let label = next.trim_end_matches(": NOP");
    assert!(asm.iter().any(|l| l == &format!("JMP {}", label)));
}

#[test]
fn test_runtime_expect_throws() {
    let asm = asm_of(
        "contract c {\n\
             import Runtime;\n\
             public f(from: address) { Runtime.expect(Runtime.isWitness(from), \"no witness\"); }\n\
         }",
    );
    assert!(asm.iter().any(|l| l.starts_with("JMPIF ")));
    assert!(asm.iter().any(|l| l.starts_with("THROW ")));
    assert!(asm.iter().any(|l| l.starts_with("@expect_")));
    assert!(asm.iter().any(|l| l == "LOAD r0 \"Runtime.IsWitness\""));
}

#[test]
fn test_local_call() {
    let asm = asm_of(
        "contract c {\n\
             private double(x: number): number { return x * 2; }\n\
             public f(x: number): number { return this.double(x); }\n\
         }",
    );
    assert!(asm.iter().any(|l| l == "CALL @entry_double"));
}

#[test]
fn test_decimal_multiplication_is_rescaled() {
    let asm = asm_of(
        "contract c { public f(a: decimal<2>, b: decimal<2>): decimal<2> { return a * b; } }",
    );
    let mul = asm.iter().position(|l| l.starts_with("MUL ")).unwrap();
    assert_eq!(asm[mul + 1], "LOAD r0 100");
    assert!(asm[mul + 2].starts_with("DIV "));
}

#[test]
fn test_address_literal_is_converted() {
    let asm = asm_of(
        "contract c { public f(): address { return @P2KFNXEbz1hbeNaW8uDfvR7fnYYWQyp5jRkYsTqGWdq6KLX; } }",
    );
    assert!(asm
        .iter()
        .any(|l| l.ends_with("\"P2KFNXEbz1hbeNaW8uDfvR7fnYYWQyp5jRkYsTqGWdq6KLX\"")));
    assert!(asm.iter().any(|l| l == "LOAD r0 \"Address()\""));
}

#[test]
fn test_asm_block_is_copied() {
    let asm = asm_of("contract c { public f() { asm { LOAD r1 5\n DEBUG r1 } } }");
    assert!(asm.iter().any(|l| l == "LOAD r1 5"));
    assert!(asm.iter().any(|l| l == "DEBUG r1"));
}

#[test]
fn test_source_annotations() {
    let source = "contract c {\n    public f() { }\n}";
    let annotated = compile_source(source).unwrap();
    assert!(annotated[0].asm.iter().any(|l| l == "// Line 2: public f() { }"));

    let config = CompilerConfig {
        annotate_source: false,
        failed_asm_path: None,
        ..CompilerConfig::default()
    };
    let plain = compile(source, &LineAssembler, &config).unwrap();
    assert!(plain[0].asm.iter().all(|l| !l.starts_with("//")));
}

#[test]
fn test_shadowing_local_gets_its_own_alias() {
    let asm = asm_of(
        "contract c {\n\
             global x: number;\n\
             constructor(owner: address) { x = 1; }\n\
             public f(): number {\n\
                 local y: number = 0;\n\
                 if (y == 0) { local x: number = 2; y = x; }\n\
                 return y + x;\n\
             }\n\
         }",
    );
    let entry = asm.iter().position(|l| l == "@entry_f: NOP").unwrap();
    let body = &asm[entry..];

    let aliases: Vec<&String> = body.iter().filter(|l| l.starts_with("ALIAS ")).collect();
    assert_eq!(aliases.iter().filter(|l| l.ends_with(" $x")).count(), 1);
    let inner = aliases
        .iter()
        .find_map(|l| l.split_whitespace().last().filter(|a| a.starts_with("$x_")))
        .unwrap();

    let assign_y = body
        .iter()
        .rposition(|l| l.starts_with("COPY ") && l.ends_with(" $y"))
        .unwrap();
    assert!(body[assign_y - 1].starts_with(&format!("COPY {} ", inner)));

    let add = body.iter().position(|l| l.starts_with("ADD ")).unwrap();
    assert!(body[add - 1].starts_with("COPY $x "));
    assert!(body[add..].iter().all(|l| !l.contains(inner)));
}

#[test]
fn test_switch_jumps_between_cases() {
    let source = "contract c {\n\
                      public f(x: number): string {\n\
                          switch (x) { case 0: return \"zero\"; default: return \"other\"; }\n\
                      }\n\
                  }";
    let asm = asm_of(source);

    let equal = asm.iter().position(|l| l.starts_with("EQUAL ")).unwrap();
    assert!(asm[equal - 1].starts_with("LOAD ") && asm[equal - 1].ends_with(" 0"));
    let jump = &asm[equal + 1];
    assert!(jump.starts_with("JMPNOT "));
    let skip = jump.split_whitespace().last().unwrap();
    assert!(skip.starts_with("@case_") && skip.ends_with("_0"));

    let label = asm
        .iter()
        .position(|l| *l == format!("{}: NOP", skip))
        .unwrap();
    assert!(asm[equal..label].iter().any(|l| l.contains("\"zero\"")));
    let other = asm.iter().position(|l| l.contains("\"other\"")).unwrap();
    assert!(other > label);
    let end = asm
        .iter()
        .position(|l| l.starts_with("@end_case_") && l.ends_with(": NOP"))
        .unwrap();
    assert!(end > other);

    let modules = compile_source(source).unwrap();
    let stats = modules[0].register_stats;
    assert_eq!(stats.allocations, stats.deallocations);
}
