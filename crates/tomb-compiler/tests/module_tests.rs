mod common;

use common::{compile_source, labels, LineAssembler};
use tomb_compiler::module::{ContractInterface, ContractMethod, ContractParameter};
use tomb_compiler::types::VmType;
use tomb_compiler::{compile, diagnostic, CompilerConfig, CompilerError};

const AUCTION: &str = r#"struct Bid { bidder: address; amount: number; }

contract auction {
    import Runtime;

    global highest: number;
    global bids: storage_list<number>;

    event Placed: number = "{address} bid {data}";
    event Raw: number = 0xAB;

    constructor(owner: address) {
        highest = 0;
    }

    public place(from: address, amount: number) {
        Runtime.expect(amount > highest, "bid too low");
        highest = amount;
        bids.add(amount);
        emit Placed(from, amount);
    }

    public best(): number {
        return highest;
    }

    private unused(): number {
        return 0;
    }
}
"#;

#[test]
fn test_abi_lists_public_methods() {
    let modules = compile_source(AUCTION).unwrap();
    let module = &modules[0];
    let abi = module.abi.as_ref().unwrap();

    let names: Vec<&str> = abi.methods.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Initialize", "place", "best"]);

    let place = abi.find_method("place").unwrap();
    assert_eq!(place.return_type, VmType::None);
    assert_eq!(place.parameters.len(), 2);
    assert_eq!(place.parameters[0].ty, VmType::Object);

    let best = abi.find_method("best").unwrap();
    assert_eq!(best.return_type, VmType::Number);
}

#[test]
fn test_abi_offsets_match_labels() {
    let modules = compile_source(AUCTION).unwrap();
    let module = &modules[0];
    let labels = labels(module);
    let abi = module.abi.as_ref().unwrap();
    for (method, label) in [("Initialize", "@entry_Initialize"), ("best", "@entry_best")] {
        let offset = abi.find_method(method).unwrap().offset as usize;
        assert_eq!(labels[label], offset, "{}", method);
    }
}

#[test]
fn test_abi_events() {
    let modules = compile_source(AUCTION).unwrap();
    let abi = modules[0].abi.as_ref().unwrap();

    let placed = abi.find_event("Placed").unwrap();
    assert_eq!(placed.value, 64);
    assert!(!placed.description.is_empty());
    assert!(hex::decode(&placed.description).is_ok());

    let raw = abi.find_event("Raw").unwrap();
    assert_eq!(raw.value, 65);
    assert_eq!(raw.description, "AB");
}

#[test]
fn test_emit_notifies_runtime() {
    let modules = compile_source(AUCTION).unwrap();
    let asm = &modules[0].asm;
    let notify = asm.iter().position(|l| l == "LOAD r0 \"Runtime.Notify\"").unwrap();
    assert!(asm[..notify].iter().any(|l| l == "LOAD r0 64"));
}

#[test]
fn test_debug_info_maps_lines() {
    let modules = compile_source(AUCTION).unwrap();
    let info = &modules[0].debug_info;
    assert!(info.ranges.iter().any(|r| r.source_line == 17));
    let json = info.to_json().unwrap();
    assert!(json.contains("sourceLine"));
}

#[test]
fn test_script_has_no_abi() {
    let modules = compile_source(
        "script hello {\n\
             import Runtime;\n\
             code() { Runtime.log(\"hello\"); }\n\
         }",
    )
    .unwrap();
    assert_eq!(modules[0].kind, "script");
    assert!(modules[0].abi.is_none());
    assert!(!modules[0].script.is_empty());
}

#[test]
fn test_description_module_feeds_event() {
    let modules = compile_source(
        "description shown {\n\
             code(from: address, data: any): string { return \"shown\"; }\n\
         }\n\
         contract c {\n\
             event Shown: number = shown;\n\
         }",
    )
    .unwrap();
    let description = &modules[0];
    let event = modules[1].abi.as_ref().unwrap().find_event("Shown").unwrap();
    assert_eq!(event.description, hex::encode(&description.script));
}

#[test]
fn test_nft_sub_modules_compile_first() {
    let modules = compile_source(
        "struct Rom { name: string; }\n\
         token GHOST {\n\
             nft ghost<Rom, number> {\n\
                 property name: string = _ROM.name;\n\
             }\n\
         }",
    )
    .unwrap();
    let token = &modules[0];
    let nft = token.find("ghost").unwrap();
    assert_eq!(nft.kind, "nft");
    let getter = nft.abi.as_ref().unwrap().find_method("getName").unwrap();
    assert_eq!(getter.return_type, VmType::String);

    let asm = nft.asm.join("\n");
    assert!(asm.contains("\"Runtime.ReadToken\""));
    assert!(asm.contains("\"GHOST\""));
}

#[test]
fn test_failed_assembly_is_dumped() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("failed.asm");
    let config = CompilerConfig {
        failed_asm_path: Some(path.clone()),
        ..CompilerConfig::default()
    };

    let err = compile(
        "contract broken { public f() { asm { BOGUS r1 } } }",
        &LineAssembler,
        &config,
    )
    .unwrap_err();
    assert!(matches!(err, CompilerError::Assembler { ref module, .. } if module == "broken"));

    let dumped = std::fs::read_to_string(&path).unwrap();
    assert!(dumped.contains("BOGUS r1"));
}

#[test]
fn test_imported_contract_from_library_path() {
    let dir = tempfile::tempdir().unwrap();
    let interface = ContractInterface {
        methods: vec![ContractMethod {
            name: "getOwner".to_string(),
            return_type: VmType::Object,
            offset: 0,
            parameters: vec![ContractParameter {
                name: "id".to_string(),
                ty: VmType::Number,
            }],
        }],
        events: Vec::new(),
    };
    std::fs::write(
        dir.path().join("games.Arena.abi.json"),
        interface.to_bytes().unwrap(),
    )
    .unwrap();

    let config = CompilerConfig {
        library_paths: vec![dir.path().to_path_buf()],
        failed_asm_path: None,
        ..CompilerConfig::default()
    };
    let modules = compile(
        "contract c {\n\
             import games.Arena;\n\
             public owner(id: number): address { return Arena.getOwner(id); }\n\
         }",
        &LineAssembler,
        &config,
    )
    .unwrap();
    let asm = modules[0].asm.join("\n");
    assert!(asm.contains("\"getOwner\""));
    assert!(asm.contains("\"Arena\""));
}

#[test]
fn test_error_report_names_file_and_line() {
    let source = "contract c {\n    public f(): number { return missing; }\n}";
    let err = compile_source(source).unwrap_err();
    let report = diagnostic::render(&err, "auction.tomb", source);
    assert!(report.contains("auction.tomb:2"));
    assert!(report.contains("undeclared variable: missing"));
}
