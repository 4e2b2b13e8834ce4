//! Compiler settings (tomb.toml)
//!
//! Settings are plain data; every field has a default so an empty file is a
//! valid configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading compiler settings
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Compiler settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompilerConfig {
    /// Directories searched for `<name>.abi.json` files on `import`
    #[serde(default)]
    pub library_paths: Vec<PathBuf>,

    /// Where the generated assembly is dumped when the assembler rejects it
    #[serde(default = "default_failed_asm_path")]
    pub failed_asm_path: Option<PathBuf>,

    /// Interleave `// Line N:` source comments into the assembly
    #[serde(default = "default_annotate_source")]
    pub annotate_source: bool,
}

fn default_failed_asm_path() -> Option<PathBuf> {
    Some(std::env::temp_dir().join("tomb_failed.asm"))
}

fn default_annotate_source() -> bool {
    true
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            library_paths: Vec::new(),
            failed_asm_path: default_failed_asm_path(),
            annotate_source: default_annotate_source(),
        }
    }
}

impl CompilerConfig {
    /// Load settings from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: CompilerConfig = toml::from_str(content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = CompilerConfig::from_toml_str("").unwrap();
        assert_eq!(config, CompilerConfig::default());
        assert!(config.annotate_source);
        assert!(config
            .failed_asm_path
            .unwrap()
            .ends_with("tomb_failed.asm"));
    }

    #[test]
    fn test_parse_fields() {
        let toml = r#"
library_paths = ["abi", "vendor/abi"]
annotate_source = false
"#;
        let config = CompilerConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.library_paths.len(), 2);
        assert_eq!(config.library_paths[1], PathBuf::from("vendor/abi"));
        assert!(!config.annotate_source);
    }

    #[test]
    fn test_invalid_toml() {
        let result = CompilerConfig::from_toml_str("annotate_source = \"yes\"");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
