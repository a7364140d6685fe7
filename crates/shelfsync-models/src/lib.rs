pub mod catalog;
pub mod history;
pub mod media;
pub mod slug;
pub mod tracker;

pub use catalog::{CatalogItem, CatalogList, WATCHLIST_ID};
pub use history::HistoryEntry;
pub use media::MediaType;
pub use slug::infer_list_slug;
pub use tracker::{IdMeta, ItemIds, TrackerItem, TrackerList};
