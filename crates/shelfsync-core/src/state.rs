use shelfsync_config::SyncOptions;
use shelfsync_models::{CatalogItem, CatalogList, TrackerItem, TrackerList};
use std::collections::HashMap;

/// In-memory snapshot of both services' data for a single run.
///
/// Populated exactly once during hydration and owned exclusively by that run's
/// `Syncer`; nothing mutates it afterwards. List maps are keyed by the
/// catalog-native list id on both sides, rating maps by the catalog item id.
#[derive(Debug, Default)]
pub struct UserState {
    pub catalog_lists: HashMap<String, CatalogList>,
    pub catalog_ratings: HashMap<String, CatalogItem>,
    pub tracker_lists: HashMap<String, TrackerList>,
    pub tracker_ratings: HashMap<String, TrackerItem>,
}

impl UserState {
    /// Seed the list maps with the configured list ids. Domains excluded by
    /// configuration stay empty, and empty means "nothing to do", never an
    /// error.
    pub fn for_run(conf: &SyncOptions, list_ids: &[String]) -> Self {
        let mut state = Self::default();
        if conf.lists || conf.watchlist {
            for list_id in list_ids {
                state
                    .catalog_lists
                    .insert(list_id.clone(), CatalogList::with_id(list_id.clone()));
            }
        }
        state
    }
}
