//! Libraries backed by the ABI of a deployed contract
//!
//! `import Some.Contract;` looks the interface up through an `AbiResolver`
//! and exposes each of its methods as a contract call.

use super::declaration::{LibraryDeclaration, MethodImplementation};
use crate::config::CompilerConfig;
use crate::module::abi::ContractInterface;
use crate::types::{TypeId, VmType};
use std::path::PathBuf;

/// Source of contract interfaces for qualified imports
pub trait AbiResolver {
    fn resolve(&self, name: &str) -> Option<ContractInterface>;
}

/// Resolver that finds nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAbiResolver;

impl AbiResolver for NoAbiResolver {
    fn resolve(&self, _name: &str) -> Option<ContractInterface> {
        None
    }
}

/// Looks for `<name>.abi.json` along a list of directories
#[derive(Debug, Clone, Default)]
pub struct FsAbiResolver {
    paths: Vec<PathBuf>,
}

impl FsAbiResolver {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }

    pub fn from_config(config: &CompilerConfig) -> Self {
        Self::new(config.library_paths.clone())
    }
}

impl AbiResolver for FsAbiResolver {
    fn resolve(&self, name: &str) -> Option<ContractInterface> {
        for dir in &self.paths {
            let path = dir.join(format!("{}.abi.json", name));
            let Ok(bytes) = std::fs::read(&path) else {
                continue;
            };
            match ContractInterface::from_bytes(&bytes) {
                Ok(abi) => {
                    log::debug!("resolved {} from {}", name, path.display());
                    return Some(abi);
                }
                Err(e) => log::warn!("ignoring malformed ABI {}: {}", path.display(), e),
            }
        }
        None
    }
}

/// Compiler type used for a VM-level ABI type
fn type_of(vm: VmType) -> TypeId {
    match vm {
        VmType::None => TypeId::NONE,
        VmType::Number | VmType::Enum => TypeId::NUMBER,
        VmType::String => TypeId::STRING,
        VmType::Bool => TypeId::BOOL,
        VmType::Bytes => TypeId::BYTES,
        VmType::Timestamp => TypeId::TIMESTAMP,
        VmType::Object => TypeId::ADDRESS,
        VmType::Struct => TypeId::ANY,
    }
}

/// Build a contract-call library from an interface. The library and the
/// target contract are named after the last segment of `qualified`.
pub fn library_from_interface(qualified: &str, abi: &ContractInterface) -> LibraryDeclaration {
    let name = qualified.rsplit('.').next().unwrap_or(qualified);
    let mut lib = LibraryDeclaration::new(name);
    for method in &abi.methods {
        let params: Vec<(&str, TypeId)> = method
            .parameters
            .iter()
            .map(|p| (p.name.as_str(), type_of(p.ty)))
            .collect();
        lib.add_method(
            &method.name,
            MethodImplementation::ContractCall,
            type_of(method.return_type),
            &params,
        )
        .with_alias(&method.name)
        .targeting(name);
    }
    lib
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::module::abi::{ContractMethod, ContractParameter};

    fn interface() -> ContractInterface {
        ContractInterface {
            methods: vec![ContractMethod {
                name: "getOwner".to_string(),
                return_type: VmType::Object,
                offset: 12,
                parameters: vec![ContractParameter {
                    name: "id".to_string(),
                    ty: VmType::Number,
                }],
            }],
            events: Vec::new(),
        }
    }

    #[test]
    fn test_library_from_interface() {
        let lib = library_from_interface("games.Arena", &interface());
        assert_eq!(lib.name, "Arena");
        let method = lib.find_method("getOwner").unwrap();
        assert_eq!(method.return_type, TypeId::ADDRESS);
        assert_eq!(method.alias, "getOwner");
        assert_eq!(method.contract.as_deref(), Some("Arena"));
        assert_eq!(method.parameters[0].ty, TypeId::NUMBER);
    }

    #[test]
    fn test_fs_resolver_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = interface().to_bytes().unwrap();
        std::fs::write(dir.path().join("games.Arena.abi.json"), bytes).unwrap();
        std::fs::write(dir.path().join("broken.abi.json"), b"not json").unwrap();

        let resolver = FsAbiResolver::new(vec![dir.path().to_path_buf()]);
        assert!(resolver.resolve("games.Arena").is_some());
        assert!(resolver.resolve("broken").is_none());
        assert!(resolver.resolve("missing").is_none());
    }
}
