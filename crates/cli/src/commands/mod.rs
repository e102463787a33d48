//! Command implementations.

mod info;
mod run;
mod validate;

pub use info::run_info;
pub use run::run_replay;
pub use validate::run_validate;

use std::path::Path;

use contracts::HierarchyBlueprint;

use crate::error::{CliError, Result};

/// Load a blueprint, reporting a missing file separately from parse errors
pub(crate) fn load_blueprint(path: &Path) -> Result<HierarchyBlueprint> {
    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()));
    }
    Ok(config_loader::ConfigLoader::load_from_path(path)?)
}
