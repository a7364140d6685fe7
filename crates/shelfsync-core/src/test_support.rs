//! In-memory client doubles for orchestrator and history tests.

use std::cell::RefCell;
use std::collections::HashMap;

use chrono::Utc;

use shelfsync_clients::{CatalogClient, ClientError, ListFetch, TrackerClient};
use shelfsync_models::{
    CatalogItem, CatalogList, HistoryEntry, IdMeta, MediaType, TrackerItem, TrackerList,
    WATCHLIST_ID,
};

pub(crate) fn catalog_item(id: &str) -> CatalogItem {
    CatalogItem {
        id: id.to_string(),
        media_type: MediaType::Movie,
        rating: None,
        rated_at: None,
    }
}

pub(crate) fn rated_item(id: &str, rating: u8) -> CatalogItem {
    CatalogItem {
        rating: Some(rating),
        ..catalog_item(id)
    }
}

pub(crate) fn tracker_item(id: &str) -> TrackerItem {
    TrackerItem::from(&catalog_item(id))
}

pub(crate) fn history_entry(id: u64) -> HistoryEntry {
    HistoryEntry {
        id,
        watched_at: Utc::now(),
        media_type: MediaType::Movie,
    }
}

/// Canned catalog responses. Reads never fail; exports are no-ops.
#[derive(Default)]
pub(crate) struct MockCatalog {
    pub lists: Vec<CatalogList>,
    pub watchlist: Option<CatalogList>,
    pub ratings: Vec<CatalogItem>,
}

impl CatalogClient for MockCatalog {
    fn ratings_export(&self) -> Result<(), ClientError> {
        Ok(())
    }

    fn lists_export(&self, _list_ids: &[String]) -> Result<(), ClientError> {
        Ok(())
    }

    fn watchlist_export(&self) -> Result<(), ClientError> {
        Ok(())
    }

    fn ratings(&self) -> Result<Vec<CatalogItem>, ClientError> {
        Ok(self.ratings.clone())
    }

    fn lists(&self, _list_ids: &[String]) -> Result<Vec<CatalogList>, ClientError> {
        Ok(self.lists.clone())
    }

    fn watchlist(&self) -> Result<CatalogList, ClientError> {
        Ok(self.watchlist.clone().unwrap_or_else(|| CatalogList {
            list_id: WATCHLIST_ID.to_string(),
            name: "Watchlist".to_string(),
            is_watchlist: true,
            items: Vec::new(),
        }))
    }
}

/// Everything the syncer asked the tracker to mutate, in call order per
/// endpoint. Fetch counters cover the reads the authless path must skip.
#[derive(Default)]
pub(crate) struct Calls {
    pub created_lists: Vec<(String, String)>,
    pub watchlist_added: Vec<Vec<TrackerItem>>,
    pub watchlist_removed: Vec<Vec<TrackerItem>>,
    pub list_added: Vec<(String, Vec<TrackerItem>)>,
    pub list_removed: Vec<(String, Vec<TrackerItem>)>,
    pub ratings_added: Vec<TrackerItem>,
    pub ratings_removed: Vec<TrackerItem>,
    pub history_added: Vec<TrackerItem>,
    pub history_removed: Vec<TrackerItem>,
    pub history_lookups: Vec<String>,
    pub ratings_fetches: usize,
    pub watchlist_fetches: usize,
}

impl Calls {
    pub fn mutation_count(&self) -> usize {
        self.created_lists.len()
            + self.watchlist_added.iter().map(Vec::len).sum::<usize>()
            + self.watchlist_removed.iter().map(Vec::len).sum::<usize>()
            + self.list_added.iter().map(|(_, i)| i.len()).sum::<usize>()
            + self.list_removed.iter().map(|(_, i)| i.len()).sum::<usize>()
            + self.ratings_added.len()
            + self.ratings_removed.len()
            + self.history_added.len()
            + self.history_removed.len()
    }
}

/// Tracker double backed by plain maps, recording every call it receives.
#[derive(Default)]
pub(crate) struct MockTracker {
    /// Existing tracker lists, keyed by slug.
    pub known_lists: HashMap<String, TrackerList>,
    pub watchlist_items: Vec<TrackerItem>,
    pub rating_items: Vec<TrackerItem>,
    /// Existing history entries, keyed by catalog item id.
    pub history_entries: HashMap<String, Vec<HistoryEntry>>,
    pub fail_lists: bool,
    pub calls: RefCell<Calls>,
}

impl TrackerClient for MockTracker {
    fn lists(&self, metas: &[IdMeta]) -> Result<Vec<ListFetch>, ClientError> {
        if self.fail_lists {
            return Err(ClientError::UnexpectedStatus {
                operation: "fetching tracker lists",
                target: "lists".to_string(),
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            });
        }
        Ok(metas
            .iter()
            .map(|meta| match self.known_lists.get(&meta.slug) {
                Some(list) => {
                    let mut list = list.clone();
                    list.list_id = meta.list_id.clone();
                    ListFetch::Found(list)
                }
                None => ListFetch::NotFound {
                    slug: meta.slug.clone(),
                },
            })
            .collect())
    }

    fn create_list(&self, slug: &str, name: &str) -> Result<(), ClientError> {
        self.calls
            .borrow_mut()
            .created_lists
            .push((slug.to_string(), name.to_string()));
        Ok(())
    }

    fn watchlist(&self) -> Result<TrackerList, ClientError> {
        self.calls.borrow_mut().watchlist_fetches += 1;
        Ok(TrackerList {
            list_id: WATCHLIST_ID.to_string(),
            slug: None,
            is_watchlist: true,
            items: self.watchlist_items.clone(),
        })
    }

    fn ratings(&self) -> Result<Vec<TrackerItem>, ClientError> {
        self.calls.borrow_mut().ratings_fetches += 1;
        Ok(self.rating_items.clone())
    }

    fn watchlist_items_add(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.calls.borrow_mut().watchlist_added.push(items.to_vec());
        Ok(())
    }

    fn watchlist_items_remove(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.calls
            .borrow_mut()
            .watchlist_removed
            .push(items.to_vec());
        Ok(())
    }

    fn list_items_add(&self, slug: &str, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.calls
            .borrow_mut()
            .list_added
            .push((slug.to_string(), items.to_vec()));
        Ok(())
    }

    fn list_items_remove(&self, slug: &str, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.calls
            .borrow_mut()
            .list_removed
            .push((slug.to_string(), items.to_vec()));
        Ok(())
    }

    fn ratings_add(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.calls.borrow_mut().ratings_added.extend_from_slice(items);
        Ok(())
    }

    fn ratings_remove(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.calls
            .borrow_mut()
            .ratings_removed
            .extend_from_slice(items);
        Ok(())
    }

    fn history(
        &self,
        _media_type: MediaType,
        item_id: &str,
    ) -> Result<Vec<HistoryEntry>, ClientError> {
        self.calls
            .borrow_mut()
            .history_lookups
            .push(item_id.to_string());
        Ok(self
            .history_entries
            .get(item_id)
            .cloned()
            .unwrap_or_default())
    }

    fn history_add(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.calls.borrow_mut().history_added.extend_from_slice(items);
        Ok(())
    }

    fn history_remove(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.calls
            .borrow_mut()
            .history_removed
            .extend_from_slice(items);
        Ok(())
    }
}
