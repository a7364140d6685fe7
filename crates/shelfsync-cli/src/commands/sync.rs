use color_eyre::eyre::eyre;
use shelfsync_clients::{CatalogHttpClient, TrackerHttpClient};
use shelfsync_config::SyncMode;
use shelfsync_core::Syncer;
use std::path::PathBuf;
use tracing::warn;

use super::load_config;

pub fn run_sync(
    config_path: Option<PathBuf>,
    lists: bool,
    watchlist: bool,
    ratings: bool,
    history: bool,
    mode: Option<String>,
) -> color_eyre::Result<()> {
    let mut config = load_config(config_path)?;

    // Domain flags narrow the run to exactly the named domains; with none
    // given, the configured selection applies.
    if lists || watchlist || ratings || history {
        config.sync.lists = lists;
        config.sync.watchlist = watchlist;
        config.sync.ratings = ratings;
        config.sync.history = history;
    }
    if let Some(mode) = mode {
        config.sync.mode = mode.parse::<SyncMode>().map_err(|e| eyre!("{e}"))?;
    }

    let authless = !config.catalog.credentials_present();
    if authless {
        warn!("no catalog credentials configured, ratings and watchlist will be skipped");
    }

    let catalog = CatalogHttpClient::new(&config.catalog)?;
    let tracker = TrackerHttpClient::new(&config.tracker)?;
    let mut syncer = Syncer::new(
        Box::new(catalog),
        Box::new(tracker),
        config.sync,
        &config.catalog.lists,
        authless,
    );
    syncer.sync().map_err(|e| eyre!("{e:#}"))
}
