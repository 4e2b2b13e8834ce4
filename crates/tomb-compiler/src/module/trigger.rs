//! Trigger names and signatures
//!
//! The host calls triggers on fixed events. Which names are valid depends
//! on the module kind, and every trigger has a fixed parameter list.

use super::ModuleKind;
use crate::types::TypeId;

const ACCOUNT_TRIGGERS: &[&str] = &[
    "onMint",
    "onBurn",
    "onSend",
    "onReceive",
    "onWitness",
    "onUpgrade",
    "onKill",
];

const TOKEN_TRIGGERS: &[&str] = &[
    "onMint",
    "onBurn",
    "onSend",
    "onReceive",
    "onInfuse",
    "onUpgrade",
    "onSeries",
    "onWrite",
    "onMigrate",
    "onKill",
];

const ORGANIZATION_TRIGGERS: &[&str] = &["onAdd", "onRemove"];

const TRANSFER: &[TypeId] = &[TypeId::ADDRESS, TypeId::ADDRESS, TypeId::STRING, TypeId::NUMBER];
const SINGLE_ADDRESS: &[TypeId] = &[TypeId::ADDRESS];
const TWO_ADDRESSES: &[TypeId] = &[TypeId::ADDRESS, TypeId::ADDRESS];
const WRITE: &[TypeId] = &[TypeId::ADDRESS, TypeId::NUMBER];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerSet {
    Account,
    Token,
    Organization,
}

impl TriggerSet {
    /// Trigger set of a module kind; scripts and NFTs have none
    pub fn for_kind(kind: &ModuleKind) -> Option<TriggerSet> {
        match kind {
            ModuleKind::Contract(_) => Some(TriggerSet::Account),
            ModuleKind::Token { .. } => Some(TriggerSet::Token),
            ModuleKind::Organization(_) => Some(TriggerSet::Organization),
            ModuleKind::Nft { .. } | ModuleKind::Script(_) | ModuleKind::Description(_) => None,
        }
    }

    pub fn names(self) -> &'static [&'static str] {
        match self {
            TriggerSet::Account => ACCOUNT_TRIGGERS,
            TriggerSet::Token => TOKEN_TRIGGERS,
            TriggerSet::Organization => ORGANIZATION_TRIGGERS,
        }
    }

    pub fn contains(self, name: &str) -> bool {
        self.names().contains(&name)
    }
}

/// Parameter types a trigger must declare
pub fn trigger_signature(name: &str) -> Option<&'static [TypeId]> {
    let params = match name {
        "onMint" | "onBurn" | "onSend" | "onReceive" | "onInfuse" => TRANSFER,
        "onWitness" | "onUpgrade" | "onKill" | "onSeries" => SINGLE_ADDRESS,
        "onMigrate" | "onAdd" | "onRemove" => TWO_ADDRESSES,
        "onWrite" => WRITE,
        _ => return None,
    };
    Some(params)
}

/// `mint` becomes `onMint`; names already starting with `on` are kept
pub fn trigger_name(name: &str) -> String {
    let prefixed = name
        .strip_prefix("on")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase());
    if prefixed {
        name.to_string()
    } else {
        format!("on{}", crate::library::declaration::capitalize(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::Contract;

    #[test]
    fn test_sets_per_kind() {
        let token = ModuleKind::Token {
            contract: Contract::default(),
            nfts: Vec::new(),
        };
        let set = TriggerSet::for_kind(&token).unwrap();
        assert!(set.contains("onMint"));
        assert!(set.contains("onSeries"));
        assert!(!set.contains("onFoo"));

        let org = TriggerSet::for_kind(&ModuleKind::Organization(Contract::default())).unwrap();
        assert!(org.contains("onAdd"));
        assert!(!org.contains("onMint"));
    }

    #[test]
    fn test_every_trigger_has_a_signature() {
        for set in [TriggerSet::Account, TriggerSet::Token, TriggerSet::Organization] {
            for name in set.names() {
                assert!(trigger_signature(name).is_some(), "{}", name);
            }
        }
        assert_eq!(trigger_signature("onMint").unwrap().len(), 4);
        assert_eq!(trigger_signature("onWrite").unwrap(), WRITE);
    }

    #[test]
    fn test_trigger_name() {
        assert_eq!(trigger_name("mint"), "onMint");
        assert_eq!(trigger_name("onMint"), "onMint");
        assert_eq!(trigger_name("online"), "onOnline");
    }
}
