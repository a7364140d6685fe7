// Diff computation for reconciling tracker state against catalog state.

use shelfsync_models::{CatalogItem, CatalogList, TrackerItem, TrackerList};
use std::collections::{HashMap, HashSet};

/// Corrective actions for one domain: items to add to the tracker (present on
/// the catalog, absent on the tracker) and items to remove from it (present on
/// the tracker, absent on the catalog). Items in both are no-ops and appear in
/// neither set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListDiff {
    pub add: Vec<TrackerItem>,
    pub remove: Vec<TrackerItem>,
}

impl ListDiff {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

/// Diff one catalog list against its tracker counterpart. A tracker list that
/// does not exist yet (just created, or never fetched) diffs as empty.
///
/// Comparison is by identity key only. Tracker items the catalog cannot
/// address (no catalog id) are left out of the remove set; membership diffing
/// has no identity to compare them under.
pub fn list_diff(catalog: &CatalogList, tracker: Option<&TrackerList>) -> ListDiff {
    let tracker_items: &[TrackerItem] = tracker.map(|l| l.items.as_slice()).unwrap_or(&[]);
    let tracker_keys: HashSet<&str> = tracker_items.iter().filter_map(|i| i.item_id()).collect();
    let catalog_keys: HashSet<&str> = catalog.items.iter().map(|i| i.id.as_str()).collect();

    let add = catalog
        .items
        .iter()
        .filter(|item| !tracker_keys.contains(item.id.as_str()))
        .map(TrackerItem::from)
        .collect();
    let remove = tracker_items
        .iter()
        .filter(|item| {
            item.item_id()
                .map_or(false, |id| !catalog_keys.contains(id))
        })
        .cloned()
        .collect();
    ListDiff { add, remove }
}

/// Diff the two rating maps, keyed by catalog item id on both sides. Payload
/// differences for the same key (a changed rating value) are not surfaced;
/// this is membership diffing only.
///
/// Output is sorted by identity key so logs enumerate stably.
pub fn items_difference(
    catalog: &HashMap<String, CatalogItem>,
    tracker: &HashMap<String, TrackerItem>,
) -> ListDiff {
    let mut add: Vec<TrackerItem> = catalog
        .iter()
        .filter(|(id, _)| !tracker.contains_key(*id))
        .map(|(_, item)| TrackerItem::from(item))
        .collect();
    let mut remove: Vec<TrackerItem> = tracker
        .iter()
        .filter(|(id, _)| !catalog.contains_key(*id))
        .map(|(_, item)| item.clone())
        .collect();
    add.sort_by(|a, b| a.ids.catalog.cmp(&b.ids.catalog));
    remove.sort_by(|a, b| a.ids.catalog.cmp(&b.ids.catalog));
    ListDiff { add, remove }
}
