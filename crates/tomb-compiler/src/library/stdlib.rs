//! Construction routines for the standard libraries
//!
//! Every importable library name maps to one function declaring its
//! methods. Map, List and Set are generic templates specialized per storage
//! collection by the registry.

use super::declaration::{
    CustomCodegen, GenericReturn, LibraryDeclaration, MethodImplementation,
};
use crate::codegen::Opcode;
use crate::types::{TypeContext, TypeId, VarType, VmType};

use CustomCodegen as C;
use MethodImplementation::{ContractCall, Custom, ExtCall};

const NONE: TypeId = TypeId::NONE;
const NUMBER: TypeId = TypeId::NUMBER;
const BOOL: TypeId = TypeId::BOOL;
const STRING: TypeId = TypeId::STRING;
const TIMESTAMP: TypeId = TypeId::TIMESTAMP;
const ADDRESS: TypeId = TypeId::ADDRESS;
const HASH: TypeId = TypeId::HASH;
const BYTES: TypeId = TypeId::BYTES;
const TASK: TypeId = TypeId::TASK;
const ANY: TypeId = TypeId::ANY;
const MODULE: TypeId = TypeId::MODULE;
const G0: TypeId = TypeId::GENERIC;
const G1: TypeId = TypeId::GENERIC_1;

/// Names accepted by `import`
pub const LIBRARY_NAMES: &[&str] = &[
    "Call",
    "Runtime",
    "Math",
    "Token",
    "NFT",
    "Organization",
    "Oracle",
    "Storage",
    "Contract",
    "Array",
    "Leaderboard",
    "Market",
    "Account",
    "Crowdsale",
    "Stake",
    "Governance",
    "Relay",
    "Mail",
    "Time",
    "Task",
    "UID",
    "Map",
    "List",
    "String",
    "Bytes",
    "Decimal",
    "Enum",
    "Address",
    "Module",
    "ABI",
    "Format",
];

/// Build a library from scratch. `Set` is not importable but backs
/// `storage_set` globals.
pub fn create(name: &str, types: &mut TypeContext) -> Option<LibraryDeclaration> {
    let mut lib = LibraryDeclaration::new(name);
    match name {
        "Call" => call(&mut lib),
        "Runtime" => runtime(&mut lib),
        "Math" => math(&mut lib),
        "Token" => token(&mut lib),
        "NFT" => nft(&mut lib),
        "Organization" => organization(&mut lib),
        "Oracle" => oracle(&mut lib),
        "Storage" => storage(&mut lib),
        "Contract" => contract(&mut lib),
        "Array" => array(&mut lib, types),
        "Leaderboard" => leaderboard(&mut lib),
        "Market" => market(&mut lib),
        "Account" => account(&mut lib),
        "Crowdsale" => crowdsale(&mut lib),
        "Stake" => stake(&mut lib),
        "Governance" => governance(&mut lib),
        "Relay" => relay(&mut lib),
        "Mail" => mail(&mut lib),
        "Time" => time(&mut lib),
        "Task" => task(&mut lib, types),
        "UID" => uid(&mut lib),
        "Map" => map(&mut lib),
        "List" => list(&mut lib),
        "Set" => set(&mut lib),
        "String" => string(&mut lib),
        "Bytes" => bytes(&mut lib),
        "Decimal" => decimal(&mut lib),
        "Enum" => enumeration(&mut lib),
        "Address" => address(&mut lib),
        "Module" => module(&mut lib),
        "ABI" => abi(&mut lib),
        "Format" => format(&mut lib),
        _ => return None,
    }
    Some(lib)
}

fn call(lib: &mut LibraryDeclaration) {
    let optional = GenericReturn::Explicit { required: false };
    lib.add_method("interop", Custom(C::CallInterop), G0, &[("method", STRING)])
        .with_generic(optional);
    lib.add_method(
        "contract",
        Custom(C::CallContract),
        G0,
        &[("contract", STRING), ("method", STRING)],
    )
    .with_generic(optional);
    lib.add_method("method", Custom(C::CallMethod), G0, &[("method", STRING)])
        .with_generic(optional);
}

fn runtime(lib: &mut LibraryDeclaration) {
    lib.add_method("log", ExtCall, NONE, &[("message", STRING)]);
    lib.add_method(
        "expect",
        Custom(C::RuntimeExpect),
        NONE,
        &[("condition", BOOL), ("error", STRING)],
    );
    lib.add_method("isWitness", ExtCall, BOOL, &[("target", ADDRESS)]);
    lib.add_method("isTrigger", ExtCall, BOOL, &[]);
    lib.add_method("transactionHash", ExtCall, HASH, &[]);
    lib.add_method("time", ExtCall, TIMESTAMP, &[]);
    lib.add_method("isMinter", ExtCall, BOOL, &[("target", ADDRESS), ("symbol", STRING)]);
    lib.add_method("gasTarget", ExtCall, ADDRESS, &[]);
    lib.add_method("context", ExtCall, STRING, &[]);
    lib.add_method("previousContext", ExtCall, STRING, &[]);
    lib.add_method("version", ExtCall, NUMBER, &[]);
    lib.add_method("getGovernanceValue", ExtCall, NUMBER, &[("name", STRING)])
        .with_alias("Nexus.GetGovernanceValue");
}

fn math(lib: &mut LibraryDeclaration) {
    let pair = &[("a", NUMBER), ("b", NUMBER)];
    lib.add_method("min", Custom(C::BinaryOpcode(Opcode::Min)), NUMBER, pair);
    lib.add_method("max", Custom(C::BinaryOpcode(Opcode::Max)), NUMBER, pair);
    let power = &[("base", NUMBER), ("exponent", NUMBER)];
    lib.add_method("pow", Custom(C::BinaryOpcode(Opcode::Pow)), NUMBER, power);
    lib.add_method("abs", Custom(C::UnaryOpcode(Opcode::Abs)), NUMBER, &[("value", NUMBER)]);
    lib.add_method("sign", Custom(C::UnaryOpcode(Opcode::Sign)), NUMBER, &[("value", NUMBER)]);
}

fn token(lib: &mut LibraryDeclaration) {
    lib.add_method("exists", ExtCall, BOOL, &[("symbol", STRING)])
        .with_alias("Runtime.TokenExists");
    lib.add_method("getDecimals", ExtCall, NUMBER, &[("symbol", STRING)])
        .with_alias("Runtime.GetTokenDecimals");
    lib.add_method("getFlags", ExtCall, NUMBER, &[("symbol", STRING)])
        .with_alias("Runtime.GetTokenFlags");
    lib.add_method(
        "transfer",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("to", ADDRESS), ("symbol", STRING), ("amount", NUMBER)],
    )
    .with_alias("Runtime.TransferTokens");
    lib.add_method(
        "transferAll",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("to", ADDRESS), ("symbol", STRING)],
    )
    .with_alias("Runtime.TransferBalance");
    lib.add_method(
        "mint",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("to", ADDRESS), ("symbol", STRING), ("amount", NUMBER)],
    )
    .with_alias("Runtime.MintTokens");
    lib.add_method(
        "burn",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("symbol", STRING), ("amount", NUMBER)],
    )
    .with_alias("Runtime.BurnTokens");
    lib.add_method(
        "swap",
        ExtCall,
        NONE,
        &[
            ("targetChain", STRING),
            ("source", ADDRESS),
            ("destination", ADDRESS),
            ("symbol", STRING),
            ("amount", NUMBER),
        ],
    )
    .with_alias("Runtime.SwapTokens");
    lib.add_method("getBalance", ExtCall, NUMBER, &[("from", ADDRESS), ("symbol", STRING)])
        .with_alias("Runtime.GetBalance");
    lib.add_method("isMinter", ExtCall, BOOL, &[("address", ADDRESS), ("symbol", STRING)])
        .with_alias("Runtime.IsMinter");
    lib.add_method("getCurrentSupply", ExtCall, NUMBER, &[("symbol", STRING)])
        .with_alias("Runtime.GetTokenSupply");
}

fn nft(lib: &mut LibraryDeclaration) {
    lib.add_method(
        "transfer",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("to", ADDRESS), ("symbol", STRING), ("id", NUMBER)],
    )
    .with_alias("Runtime.TransferToken");
    lib.add_method(
        "mint",
        ExtCall,
        NUMBER,
        &[
            ("from", ADDRESS),
            ("to", ADDRESS),
            ("symbol", STRING),
            ("rom", ANY),
            ("ram", ANY),
            ("seriesID", NUMBER),
        ],
    )
    .with_alias("Runtime.MintToken");
    lib.add_method(
        "burn",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("symbol", STRING), ("id", NUMBER)],
    )
    .with_alias("Runtime.BurnToken");
    lib.add_method(
        "infuse",
        ExtCall,
        NONE,
        &[
            ("from", ADDRESS),
            ("symbol", STRING),
            ("id", NUMBER),
            ("infuseSymbol", STRING),
            ("infuseValue", NUMBER),
        ],
    )
    .with_alias("Runtime.InfuseToken");
    lib.add_method(
        "write",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("symbol", STRING), ("id", NUMBER), ("ram", ANY)],
    )
    .with_alias("Runtime.WriteToken");
    lib.add_method(
        "createSeries",
        Custom(C::NftCreateSeries),
        NONE,
        &[
            ("from", ADDRESS),
            ("symbol", STRING),
            ("seriesID", NUMBER),
            ("maxSupply", NUMBER),
            ("mode", NUMBER),
            ("nft", MODULE),
        ],
    )
    .with_alias("Nexus.CreateTokenSeries");

    let required = GenericReturn::Explicit { required: true };
    lib.add_method(
        "readROM",
        Custom(C::NftRead { field: "ROM" }),
        G0,
        &[("symbol", STRING), ("id", NUMBER)],
    )
    .with_alias("Runtime.ReadToken")
    .with_generic(required);
    lib.add_method(
        "readRAM",
        Custom(C::NftRead { field: "RAM" }),
        G0,
        &[("symbol", STRING), ("id", NUMBER)],
    )
    .with_alias("Runtime.ReadToken")
    .with_generic(required);
}

fn organization(lib: &mut LibraryDeclaration) {
    lib.add_method(
        "create",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("id", STRING), ("name", STRING), ("script", BYTES)],
    )
    .with_alias("Nexus.CreateOrganization");
    lib.add_method(
        "addMember",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("name", STRING), ("target", ADDRESS)],
    );
    lib.add_method(
        "removeMember",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("name", STRING), ("target", ADDRESS)],
    );
}

fn oracle(lib: &mut LibraryDeclaration) {
    lib.add_method("read", ExtCall, BYTES, &[("url", STRING)]);
    lib.add_method("price", ExtCall, NUMBER, &[("symbol", STRING)]);
    lib.add_method(
        "quote",
        ExtCall,
        NUMBER,
        &[("baseSymbol", STRING), ("quoteSymbol", STRING), ("amount", NUMBER)],
    );
}

fn storage(lib: &mut LibraryDeclaration) {
    lib.add_method(
        "read",
        Custom(C::Storage {
            reads_contract: false,
            typed: true,
        }),
        G0,
        &[("contract", STRING), ("field", STRING)],
    )
    .with_alias("Data.Get")
    .with_generic(GenericReturn::Explicit { required: true });
    lib.add_method("write", ExtCall, NONE, &[("field", STRING), ("value", ANY)])
        .with_alias("Data.Set");
    lib.add_method("delete", ExtCall, NONE, &[("field", STRING)])
        .with_alias("Data.Delete");
}

fn contract(lib: &mut LibraryDeclaration) {
    lib.add_method("exists", ExtCall, BOOL, &[("name", STRING)])
        .with_alias("Runtime.ContractExists");
    lib.add_method(
        "deploy",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("name", STRING), ("script", BYTES), ("abi", BYTES)],
    )
    .with_alias("Runtime.DeployContract");
    lib.add_method(
        "upgrade",
        ExtCall,
        NONE,
        &[("from", ADDRESS), ("name", STRING), ("script", BYTES), ("abi", BYTES)],
    )
    .with_alias("Runtime.UpgradeContract");
    lib.add_method("kill", ExtCall, NONE, &[("from", ADDRESS), ("name", STRING)])
        .with_alias("Runtime.KillContract");
    lib.add_method("getAddress", ExtCall, ADDRESS, &[("name", STRING)])
        .with_alias("Runtime.GetContractAddress");
}

fn array(lib: &mut LibraryDeclaration, types: &mut TypeContext) {
    let generic_array = types.array(G0);
    lib.add_method(
        "length",
        Custom(C::UnaryOpcode(Opcode::Count)),
        NUMBER,
        &[("target", generic_array)],
    );
    lib.add_method(
        "get",
        Custom(C::ArrayGet),
        G0,
        &[("target", generic_array), ("index", NUMBER)],
    )
    .with_generic(GenericReturn::Element(0));
}

fn leaderboard(lib: &mut LibraryDeclaration) {
    let target = "ranking";
    lib.add_method(
        "create",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("boardName", STRING), ("capacity", NUMBER)],
    )
    .with_alias("CreateLeaderboard")
    .targeting(target);
    lib.add_method(
        "insert",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("target", ADDRESS), ("boardName", STRING), ("score", NUMBER)],
    )
    .with_alias("InsertScore")
    .targeting(target);
    lib.add_method(
        "getAddress",
        ContractCall,
        ADDRESS,
        &[("boardName", STRING), ("index", NUMBER)],
    )
    .with_alias("GetAddressByIndex")
    .targeting(target);
    lib.add_method(
        "getScoreByIndex",
        ContractCall,
        NUMBER,
        &[("boardName", STRING), ("index", NUMBER)],
    )
    .targeting(target);
    lib.add_method(
        "getScoreByAddress",
        ContractCall,
        NUMBER,
        &[("boardName", STRING), ("target", ADDRESS)],
    )
    .targeting(target);
    lib.add_method("getSize", ContractCall, NUMBER, &[("boardName", STRING)])
        .targeting(target);
    lib.add_method("reset", ContractCall, NONE, &[("from", ADDRESS), ("boardName", STRING)])
        .with_alias("ResetLeaderboard")
        .targeting(target);
}

fn market(lib: &mut LibraryDeclaration) {
    let target = "market";
    lib.add_method(
        "sell",
        ContractCall,
        NONE,
        &[
            ("from", ADDRESS),
            ("baseSymbol", STRING),
            ("quoteSymbol", STRING),
            ("tokenID", NUMBER),
            ("price", NUMBER),
            ("endDate", TIMESTAMP),
        ],
    )
    .with_alias("SellToken")
    .targeting(target);
    lib.add_method(
        "buy",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("symbol", STRING), ("tokenID", NUMBER)],
    )
    .with_alias("BuyToken")
    .targeting(target);
    lib.add_method(
        "cancel",
        ContractCall,
        NONE,
        &[("symbol", STRING), ("tokenID", NUMBER)],
    )
    .with_alias("CancelSale")
    .targeting(target);
    lib.add_method(
        "hasAuction",
        ContractCall,
        BOOL,
        &[("symbol", STRING), ("tokenID", NUMBER)],
    )
    .targeting(target);
    lib.add_method(
        "bid",
        ContractCall,
        NONE,
        &[
            ("from", ADDRESS),
            ("symbol", STRING),
            ("tokenID", NUMBER),
            ("price", NUMBER),
            ("buyingFee", NUMBER),
            ("buyingFeeAddress", ADDRESS),
        ],
    )
    .with_alias("BidToken")
    .targeting(target);
}

fn account(lib: &mut LibraryDeclaration) {
    let target = "account";
    lib.add_method("getName", ContractCall, STRING, &[("target", ADDRESS)])
        .with_alias("LookUpAddress")
        .targeting(target);
    lib.add_method("getLastActivity", ContractCall, TIMESTAMP, &[("target", ADDRESS)])
        .targeting(target);
    lib.add_method(
        "registerName",
        ContractCall,
        NONE,
        &[("target", ADDRESS), ("name", STRING)],
    )
    .targeting(target);
    lib.add_method("unregisterName", ContractCall, NONE, &[("target", ADDRESS)])
        .targeting(target);
    lib.add_method(
        "registerScript",
        ContractCall,
        NONE,
        &[("target", ADDRESS), ("script", BYTES), ("abi", BYTES)],
    )
    .targeting(target);
    lib.add_method("hasScript", ContractCall, BOOL, &[("address", ADDRESS)])
        .targeting(target);
    lib.add_method("lookUpScript", ContractCall, BYTES, &[("address", ADDRESS)])
        .targeting(target);
    lib.add_method("lookUpABI", ContractCall, BYTES, &[("address", ADDRESS)])
        .targeting(target);
    lib.add_method("lookUpName", ContractCall, ADDRESS, &[("name", STRING)])
        .targeting(target);
    lib.add_method("migrate", ContractCall, NONE, &[("from", ADDRESS), ("target", ADDRESS)])
        .targeting(target);
}

fn crowdsale(lib: &mut LibraryDeclaration) {
    let target = "sale";
    lib.add_method(
        "create",
        ContractCall,
        HASH,
        &[
            ("from", ADDRESS),
            ("name", STRING),
            ("flags", NUMBER),
            ("startDate", TIMESTAMP),
            ("endDate", TIMESTAMP),
            ("sellSymbol", STRING),
            ("receiveSymbol", STRING),
            ("price", NUMBER),
            ("globalSoftCap", NUMBER),
            ("globalHardCap", NUMBER),
            ("userSoftCap", NUMBER),
            ("userHardCap", NUMBER),
        ],
    )
    .with_alias("CreateSale")
    .targeting(target);
    lib.add_method("isSeller", ContractCall, BOOL, &[("target", ADDRESS)])
        .targeting(target);
    lib.add_method("isSaleActive", ContractCall, BOOL, &[("saleHash", HASH)])
        .targeting(target);
    lib.add_method(
        "isWhitelisted",
        ContractCall,
        BOOL,
        &[("saleHash", HASH), ("address", ADDRESS)],
    )
    .targeting(target);
    lib.add_method(
        "addToWhitelist",
        ContractCall,
        NONE,
        &[("saleHash", HASH), ("target", ADDRESS)],
    )
    .targeting(target);
    lib.add_method(
        "removeFromWhitelist",
        ContractCall,
        NONE,
        &[("saleHash", HASH), ("target", ADDRESS)],
    )
    .targeting(target);
    lib.add_method(
        "getPurchasedAmount",
        ContractCall,
        NUMBER,
        &[("saleHash", HASH), ("address", ADDRESS)],
    )
    .targeting(target);
    lib.add_method("getSoldAmount", ContractCall, NUMBER, &[("saleHash", HASH)])
        .targeting(target);
    lib.add_method(
        "purchase",
        ContractCall,
        NONE,
        &[
            ("from", ADDRESS),
            ("saleHash", HASH),
            ("quoteSymbol", STRING),
            ("quoteAmount", NUMBER),
        ],
    )
    .targeting(target);
    lib.add_method(
        "closeSale",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("saleHash", HASH)],
    )
    .targeting(target);
    lib.add_method("getLatestSaleHash", ContractCall, HASH, &[])
        .targeting(target);
}

fn stake(lib: &mut LibraryDeclaration) {
    let target = "stake";
    lib.add_method("getMasterThreshold", ContractCall, NUMBER, &[])
        .targeting(target);
    lib.add_method("isMaster", ContractCall, BOOL, &[("address", ADDRESS)])
        .targeting(target);
    lib.add_method("getMasterCount", ContractCall, NUMBER, &[])
        .targeting(target);
    lib.add_method("getMasterAddress", ContractCall, ADDRESS, &[("index", NUMBER)])
        .targeting(target);
    lib.add_method(
        "getClaimMasterCount",
        ContractCall,
        NUMBER,
        &[("claimDate", TIMESTAMP)],
    )
    .targeting(target);
    lib.add_method(
        "getMasterClaimDate",
        ContractCall,
        TIMESTAMP,
        &[("claimDistance", NUMBER)],
    )
    .targeting(target);
    lib.add_method("getMasterDate", ContractCall, TIMESTAMP, &[("target", ADDRESS)])
        .targeting(target);
    lib.add_method("getMasterRewards", ContractCall, NUMBER, &[("address", ADDRESS)])
        .targeting(target);
    lib.add_method("getLastMasterClaim", ContractCall, TIMESTAMP, &[])
        .targeting(target);
    lib.add_method("getUnclaimed", ContractCall, NUMBER, &[("from", ADDRESS)])
        .targeting(target);
    lib.add_method("getStake", ContractCall, NUMBER, &[("address", ADDRESS)])
        .targeting(target);
    lib.add_method("getStorageStake", ContractCall, NUMBER, &[("address", ADDRESS)])
        .targeting(target);
    lib.add_method("getStakeTimestamp", ContractCall, TIMESTAMP, &[("from", ADDRESS)])
        .targeting(target);
    lib.add_method("stake", ContractCall, NONE, &[("from", ADDRESS), ("stakeAmount", NUMBER)])
        .targeting(target);
    lib.add_method(
        "unstake",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("unstakeAmount", NUMBER)],
    )
    .targeting(target);
    lib.add_method(
        "claim",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("stakeAddress", ADDRESS)],
    )
    .targeting(target);
}

fn governance(lib: &mut LibraryDeclaration) {
    let target = "governance";
    lib.add_method("hasName", ContractCall, BOOL, &[("name", STRING)])
        .targeting(target);
    lib.add_method("hasValue", ContractCall, BOOL, &[("name", STRING)])
        .targeting(target);
    lib.add_method("getValue", ContractCall, NUMBER, &[("name", STRING)])
        .targeting(target);
    lib.add_method(
        "createValue",
        ContractCall,
        NONE,
        &[("name", STRING), ("initial", NUMBER), ("constraints", BYTES)],
    )
    .targeting(target);
    lib.add_method("setValue", ContractCall, NONE, &[("name", STRING), ("value", NUMBER)])
        .targeting(target);
}

fn relay(lib: &mut LibraryDeclaration) {
    let target = "relay";
    lib.add_method("getBalance", ContractCall, NUMBER, &[("from", ADDRESS)])
        .targeting(target);
    lib.add_method("getIndex", ContractCall, NUMBER, &[("from", ADDRESS), ("to", ADDRESS)])
        .targeting(target);
    lib.add_method("getTopUpAddress", ContractCall, ADDRESS, &[("from", ADDRESS)])
        .targeting(target);
    lib.add_method(
        "openChannel",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("publicKey", BYTES)],
    )
    .targeting(target);
    lib.add_method("getKey", ContractCall, BYTES, &[("from", ADDRESS)])
        .targeting(target);
    lib.add_method("topUpChannel", ContractCall, NONE, &[("from", ADDRESS), ("count", NUMBER)])
        .targeting(target);
    lib.add_method("settleChannel", ContractCall, NONE, &[("receipt", BYTES)])
        .targeting(target);
}

fn mail(lib: &mut LibraryDeclaration) {
    let target = "mail";
    lib.add_method(
        "pushMessage",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("target", ADDRESS), ("archiveHash", HASH)],
    )
    .targeting(target);
    lib.add_method("domainExists", ContractCall, BOOL, &[("domainName", STRING)])
        .targeting(target);
    lib.add_method(
        "registerDomain",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("domainName", STRING)],
    )
    .targeting(target);
    lib.add_method("unregisterDomain", ContractCall, NONE, &[("domainName", STRING)])
        .targeting(target);
    lib.add_method(
        "migrateDomain",
        ContractCall,
        NONE,
        &[("domainName", STRING), ("target", ADDRESS)],
    )
    .targeting(target);
    lib.add_method(
        "joinDomain",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("domainName", STRING)],
    )
    .targeting(target);
    lib.add_method(
        "leaveDomain",
        ContractCall,
        NONE,
        &[("from", ADDRESS), ("domainName", STRING)],
    )
    .targeting(target);
    lib.add_method("getUserDomain", ContractCall, STRING, &[("target", ADDRESS)])
        .targeting(target);
}

fn time(lib: &mut LibraryDeclaration) {
    lib.add_method("now", ExtCall, TIMESTAMP, &[])
        .with_alias("Runtime.Time");
    lib.add_method(
        "unix",
        Custom(C::Cast(VmType::Timestamp)),
        TIMESTAMP,
        &[("value", NUMBER)],
    );
}

fn task(lib: &mut LibraryDeclaration, types: &mut TypeContext) {
    let any_method = types.intern(VarType::Method(String::new()));
    lib.add_method(
        "start",
        ExtCall,
        TASK,
        &[
            ("method", any_method),
            ("from", ADDRESS),
            ("frequency", NUMBER),
            ("mode", NUMBER),
            ("gasLimit", NUMBER),
        ],
    );
    lib.add_method("stop", ExtCall, NONE, &[("task", TASK)]);
    lib.add_method("current", ExtCall, TASK, &[]);
}

fn uid(lib: &mut LibraryDeclaration) {
    lib.add_method("generate", ExtCall, NUMBER, &[])
        .with_alias("Runtime.GenerateUID");
}

fn map(lib: &mut LibraryDeclaration) {
    let reads = C::Storage {
        reads_contract: true,
        typed: false,
    };
    let writes = C::Storage {
        reads_contract: false,
        typed: false,
    };
    lib.add_method(
        "get",
        Custom(C::Storage {
            reads_contract: true,
            typed: true,
        }),
        G1,
        &[("field", STRING), ("key", G0)],
    )
    .with_alias("Map.Get");
    lib.add_method(
        "set",
        Custom(writes.clone()),
        NONE,
        &[("field", STRING), ("key", G0), ("value", G1)],
    )
    .with_alias("Map.Set");
    lib.add_method("remove", Custom(writes.clone()), NONE, &[("field", STRING), ("key", G0)])
        .with_alias("Map.Remove");
    lib.add_method("clear", Custom(writes), NONE, &[("field", STRING)])
        .with_alias("Map.Clear");
    lib.add_method("count", Custom(reads.clone()), NUMBER, &[("field", STRING)])
        .with_alias("Map.Count");
    lib.add_method("has", Custom(reads), BOOL, &[("field", STRING), ("key", G0)])
        .with_alias("Map.Has");
}

fn list(lib: &mut LibraryDeclaration) {
    let reads = C::Storage {
        reads_contract: true,
        typed: false,
    };
    let writes = C::Storage {
        reads_contract: false,
        typed: false,
    };
    lib.add_method(
        "get",
        Custom(C::Storage {
            reads_contract: true,
            typed: true,
        }),
        G0,
        &[("field", STRING), ("index", NUMBER)],
    )
    .with_alias("List.Get");
    lib.add_method("add", Custom(writes.clone()), NONE, &[("field", STRING), ("value", G0)])
        .with_alias("List.Add");
    lib.add_method(
        "replace",
        Custom(writes.clone()),
        NONE,
        &[("field", STRING), ("index", NUMBER), ("value", G0)],
    )
    .with_alias("List.Replace");
    lib.add_method(
        "removeAt",
        Custom(writes.clone()),
        NONE,
        &[("field", STRING), ("index", NUMBER)],
    )
    .with_alias("List.RemoveAt");
    lib.add_method("count", Custom(reads), NUMBER, &[("field", STRING)])
        .with_alias("List.Count");
    lib.add_method("clear", Custom(writes), NONE, &[("field", STRING)])
        .with_alias("List.Clear");
}

fn set(lib: &mut LibraryDeclaration) {
    let reads = C::Storage {
        reads_contract: true,
        typed: false,
    };
    let writes = C::Storage {
        reads_contract: false,
        typed: false,
    };
    lib.add_method("add", Custom(writes.clone()), NONE, &[("field", STRING), ("value", G0)])
        .with_alias("Set.Add");
    lib.add_method("remove", Custom(writes.clone()), NONE, &[("field", STRING), ("value", G0)])
        .with_alias("Set.Remove");
    lib.add_method("count", Custom(reads.clone()), NUMBER, &[("field", STRING)])
        .with_alias("Set.Count");
    lib.add_method("has", Custom(reads), BOOL, &[("field", STRING), ("value", G0)])
        .with_alias("Set.Has");
    lib.add_method("clear", Custom(writes), NONE, &[("field", STRING)])
        .with_alias("Set.Clear");
}

fn string(lib: &mut LibraryDeclaration) {
    lib.add_method(
        "length",
        Custom(C::UnaryOpcode(Opcode::Size)),
        NUMBER,
        &[("target", STRING)],
    );
    lib.add_method(
        "substr",
        Custom(C::Range),
        STRING,
        &[("target", STRING), ("index", NUMBER), ("length", NUMBER)],
    );
    lib.add_method(
        "toBytes",
        Custom(C::Cast(VmType::Bytes)),
        BYTES,
        &[("target", STRING)],
    );
}

fn bytes(lib: &mut LibraryDeclaration) {
    lib.add_method(
        "length",
        Custom(C::UnaryOpcode(Opcode::Size)),
        NUMBER,
        &[("target", BYTES)],
    );
    lib.add_method(
        "toString",
        Custom(C::Cast(VmType::String)),
        STRING,
        &[("target", BYTES)],
    );
}

fn decimal(lib: &mut LibraryDeclaration) {
    lib.add_method("decimals", Custom(C::DecimalPrecision), NUMBER, &[("target", ANY)]);
}

fn enumeration(lib: &mut LibraryDeclaration) {
    lib.add_method(
        "isSet",
        Custom(C::EnumIsSet),
        BOOL,
        &[("target", ANY), ("flag", ANY)],
    );
}

fn address(lib: &mut LibraryDeclaration) {
    lib.add_method("isNull", ExtCall, BOOL, &[("target", ADDRESS)]);
    lib.add_method("isUser", ExtCall, BOOL, &[("target", ADDRESS)]);
    lib.add_method("isSystem", ExtCall, BOOL, &[("target", ADDRESS)]);
    lib.add_method("isInterop", ExtCall, BOOL, &[("target", ADDRESS)]);
    lib.add_method(
        "toString",
        Custom(C::Cast(VmType::String)),
        STRING,
        &[("target", ADDRESS)],
    );
}

fn module(lib: &mut LibraryDeclaration) {
    lib.add_method("getScript", Custom(C::ModuleScript), BYTES, &[("target", MODULE)]);
    lib.add_method("getABI", Custom(C::ModuleAbi), BYTES, &[("target", MODULE)]);
}

fn abi(lib: &mut LibraryDeclaration) {
    lib.add_method("hasMethod", ExtCall, BOOL, &[("abi", BYTES), ("name", STRING)]);
    lib.add_method("hasTrigger", ExtCall, BOOL, &[("abi", BYTES), ("name", STRING)]);
}

fn format(lib: &mut LibraryDeclaration) {
    lib.add_method("decimals", ExtCall, STRING, &[("value", NUMBER), ("symbol", STRING)]);
    lib.add_method("symbol", ExtCall, STRING, &[("symbol", STRING)]);
    lib.add_method("account", ExtCall, STRING, &[("target", ADDRESS)]);
}
