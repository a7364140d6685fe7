use color_eyre::eyre::eyre;
use std::path::PathBuf;

use super::load_config;

pub fn run_show(config_path: Option<PathBuf>, full: bool) -> color_eyre::Result<()> {
    let mut config = load_config(config_path)?;

    if !full {
        if config.catalog.session_cookie.is_some() {
            config.catalog.session_cookie = Some("********".to_string());
        }
        config.tracker.access_token = "********".to_string();
    }

    let rendered = toml::to_string_pretty(&config).map_err(|e| eyre!("{e}"))?;
    print!("{rendered}");
    Ok(())
}
