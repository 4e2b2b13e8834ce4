//! Contract interface (ABI) descriptors
//!
//! The interface lists every public entry point of a compiled module with
//! its script offset and VM-level signature, plus the declared events.

use crate::error::{CompileResult, CompilerError};
use crate::types::VmType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: VmType,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractMethod {
    pub name: String,
    #[serde(rename = "returnType")]
    pub return_type: VmType,
    /// Byte offset of the entry point in the script
    pub offset: u32,
    pub parameters: Vec<ContractParameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractEvent {
    pub name: String,
    pub value: u8,
    #[serde(rename = "returnType")]
    pub return_type: VmType,
    /// Hex encoded description payload
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractInterface {
    pub methods: Vec<ContractMethod>,
    #[serde(default)]
    pub events: Vec<ContractEvent>,
}

impl ContractInterface {
    pub fn find_method(&self, name: &str) -> Option<&ContractMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn find_event(&self, name: &str) -> Option<&ContractEvent> {
        self.events.iter().find(|e| e.name == name)
    }

    /// Serialized `.abi` payload
    pub fn to_bytes(&self) -> CompileResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|e| CompilerError::internal(0, e.to_string()))
    }

    pub fn to_json(&self) -> CompileResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| CompilerError::internal(0, e.to_string()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
