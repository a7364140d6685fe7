use shelfsync_models::{
    CatalogItem, CatalogList, HistoryEntry, IdMeta, MediaType, TrackerItem, TrackerList,
};

use crate::error::ClientError;

/// Outcome of fetching one corresponding list from the tracker.
///
/// A missing list is recognised control flow rather than an error: the
/// orchestrator reacts by creating the list, or by logging the intent in
/// dry-run mode. Transport and auth failures use the `Result` error channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ListFetch {
    Found(TrackerList),
    NotFound { slug: String },
}

/// Operations the source-of-truth catalog service must expose. Exports are
/// triggered first so the service regenerates its authoritative data, then
/// fetched.
pub trait CatalogClient {
    fn ratings_export(&self) -> Result<(), ClientError>;
    fn lists_export(&self, list_ids: &[String]) -> Result<(), ClientError>;
    fn watchlist_export(&self) -> Result<(), ClientError>;
    fn ratings(&self) -> Result<Vec<CatalogItem>, ClientError>;
    fn lists(&self, list_ids: &[String]) -> Result<Vec<CatalogList>, ClientError>;
    fn watchlist(&self) -> Result<CatalogList, ClientError>;
}

/// Operations the mirror tracking service must expose. Named lists are
/// addressed by slug; the watchlist has its own endpoints and is never
/// slug-addressed.
pub trait TrackerClient {
    fn lists(&self, metas: &[IdMeta]) -> Result<Vec<ListFetch>, ClientError>;
    fn create_list(&self, slug: &str, name: &str) -> Result<(), ClientError>;
    fn watchlist(&self) -> Result<TrackerList, ClientError>;
    fn ratings(&self) -> Result<Vec<TrackerItem>, ClientError>;
    fn watchlist_items_add(&self, items: &[TrackerItem]) -> Result<(), ClientError>;
    fn watchlist_items_remove(&self, items: &[TrackerItem]) -> Result<(), ClientError>;
    fn list_items_add(&self, slug: &str, items: &[TrackerItem]) -> Result<(), ClientError>;
    fn list_items_remove(&self, slug: &str, items: &[TrackerItem]) -> Result<(), ClientError>;
    fn ratings_add(&self, items: &[TrackerItem]) -> Result<(), ClientError>;
    fn ratings_remove(&self, items: &[TrackerItem]) -> Result<(), ClientError>;
    fn history(&self, media_type: MediaType, item_id: &str)
        -> Result<Vec<HistoryEntry>, ClientError>;
    fn history_add(&self, items: &[TrackerItem]) -> Result<(), ClientError>;
    fn history_remove(&self, items: &[TrackerItem]) -> Result<(), ClientError>;
}
