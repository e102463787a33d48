//! # Config Loader
//!
//! Blueprint loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON hierarchy blueprints
//! - Validate structure (ids, parent links, cycles, event starts)
//! - Produce a `HierarchyBlueprint`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let blueprint = ConfigLoader::load_from_path(Path::new("hierarchy.toml")).unwrap();
//! println!("Nodes: {}", blueprint.nodes.len());
//! ```

mod parser;
mod validator;

pub use contracts::HierarchyBlueprint;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;
use tracing::debug;

/// Configuration loader
///
/// Provides static methods to load blueprints from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load blueprint from file path
    ///
    /// Automatically detects format from file extension (.toml / .json).
    ///
    /// # Errors
    /// - File read failure
    /// - Unsupported format
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_path(path: &Path) -> Result<HierarchyBlueprint, ContractError> {
        let format = Self::detect_format(path)?;
        let content = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), ?format, bytes = content.len(), "Blueprint file read");
        Self::load_from_str(&content, format)
    }

    /// Load blueprint from string
    ///
    /// # Errors
    /// - Parse failure
    /// - Validation failure
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<HierarchyBlueprint, ContractError> {
        let blueprint = parser::parse(content, format)?;
        validator::validate(&blueprint)?;
        Ok(blueprint)
    }

    /// Validate an already constructed blueprint
    pub fn validate(blueprint: &HierarchyBlueprint) -> Result<(), ContractError> {
        validator::validate(blueprint)
    }

    /// Serialize blueprint to TOML string
    pub fn to_toml(blueprint: &HierarchyBlueprint) -> Result<String, ContractError> {
        parser::serialize(blueprint, ConfigFormat::Toml)
    }

    /// Serialize blueprint to JSON string
    pub fn to_json(blueprint: &HierarchyBlueprint) -> Result<String, ContractError> {
        parser::serialize(blueprint, ConfigFormat::Json)
    }

    /// Infer configuration format from file extension
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ContractError::config_parse("cannot determine file format from extension")
        })?;

        ConfigFormat::from_extension(ext).ok_or_else(|| {
            ContractError::config_parse(format!("unsupported config format: .{ext}"))
        })
    }
}
