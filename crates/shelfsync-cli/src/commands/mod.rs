pub mod config;
pub mod sync;

use color_eyre::eyre::eyre;
use shelfsync_config::{Config, PathManager};
use std::path::PathBuf;

/// Resolve the config path (flag wins over the user config directory) and
/// load the file, with environment overrides already applied.
pub fn load_config(path: Option<PathBuf>) -> color_eyre::Result<Config> {
    let path = match path {
        Some(path) => path,
        None => PathManager::new()
            .map_err(|e| eyre!("{e}"))?
            .config_file(),
    };
    Config::load(&path).map_err(|e| eyre!("{e:#}"))
}
