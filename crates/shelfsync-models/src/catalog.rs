use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::media::MediaType;

/// List identifier the catalog assigns to the user's watchlist. The watchlist
/// is a distinguished singleton: it is never slug-addressed on the tracker and
/// never subject to list creation.
pub const WATCHLIST_ID: &str = "watchlist";

/// A single trackable work as the catalog exports it. Immutable once read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    /// Catalog-native identifier, shared with the tracker's `ids.catalog`.
    pub id: String,
    pub media_type: MediaType,
    /// 1-10 integer; present only in ratings exports.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CatalogList {
    /// Catalog-native list identifier.
    pub list_id: String,
    /// Human-readable name, the input to slug derivation.
    pub name: String,
    pub is_watchlist: bool,
    pub items: Vec<CatalogItem>,
}

impl CatalogList {
    /// Placeholder for a configured list before hydration fills it in.
    pub fn with_id(list_id: impl Into<String>) -> Self {
        Self {
            list_id: list_id.into(),
            ..Self::default()
        }
    }
}
