// Command handlers module
pub mod classify;
pub mod refresh;
pub mod rotation;
pub mod run;
pub mod version;

use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::core::Config;

// Re-exports for cleaner imports
pub use classify::execute as classify;
pub use refresh::execute as refresh;
pub use rotation::execute as rotation;
pub use run::execute as run;
pub use version::execute as version;

/// Load the config named by the global `--config` flag, or the default one
pub fn load_config(matches: &clap::ArgMatches) -> Result<Config> {
    match matches.get_one::<PathBuf>("config") {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => {
            let path = Config::get_config_path()?;
            Config::load_from(&path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
    }
}
