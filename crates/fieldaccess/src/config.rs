//! Accessor configuration
//!
//! Read from the `[accessor]` table of a TOML file:
//!
//! ```toml
//! [accessor]
//! implementation_suffix = "FieldAccess"
//! relocation_prefix = "fieldaccess."
//! ```

use std::path::Path;

use fieldaccess_model::RESERVED_NAMESPACE;
use serde::Deserialize;

use crate::error::ConfigError;

/// Naming rules for generated implementations
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AccessorConfig {
    /// Appended to the qualified class name
    pub implementation_suffix: String,
    /// Prepended when the class lives in the reserved namespace
    pub relocation_prefix: String,
}

impl Default for AccessorConfig {
    fn default() -> Self {
        Self {
            implementation_suffix: "FieldAccess".to_string(),
            relocation_prefix: "fieldaccess.".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    accessor: AccessorConfig,
}

impl AccessorConfig {
    /// Parse from TOML text; a missing `[accessor]` table yields the defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(text)?;
        Ok(file.accessor)
    }

    /// Read and parse a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Derive the implementation name for a qualified class name
    pub fn implementation_name(&self, qualified: &str) -> String {
        let name = format!("{}{}", qualified, self.implementation_suffix);
        if name.starts_with(RESERVED_NAMESPACE) {
            format!("{}{}", self.relocation_prefix, name)
        } else {
            name
        }
    }
}
