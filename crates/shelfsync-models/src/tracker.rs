use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::media::MediaType;
use crate::slug::infer_list_slug;

/// Identifiers the tracker knows an item by. The catalog id is the shared key
/// the diff engine and history lookups operate on; the rest are tracker-native.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ItemIds {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrackerItem {
    pub media_type: MediaType,
    pub ids: ItemIds,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rated_at: Option<DateTime<Utc>>,
}

impl TrackerItem {
    /// The identity key this item participates in diffs and history lookups
    /// under. `None` means the tracker returned an item shape we cannot map
    /// back to the catalog; callers must treat that as an error, not skip it.
    pub fn item_id(&self) -> Option<&str> {
        self.ids.catalog.as_deref()
    }
}

impl From<&CatalogItem> for TrackerItem {
    fn from(item: &CatalogItem) -> Self {
        Self {
            media_type: item.media_type,
            ids: ItemIds {
                catalog: Some(item.id.clone()),
                ..ItemIds::default()
            },
            rating: item.rating,
            rated_at: item.rated_at,
        }
    }
}

/// Correspondence between a catalog list and its tracker-side address. The two
/// services share no list-identifier space; the tracker is addressed by a slug
/// derived from the catalog list's name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IdMeta {
    /// Catalog-native list identifier.
    pub list_id: String,
    pub slug: String,
    pub name: String,
}

impl IdMeta {
    pub fn for_list(list_id: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            list_id: list_id.into(),
            slug: infer_list_slug(&name),
            name,
        }
    }

    /// Recover the original list name for a slug the tracker reported back,
    /// e.g. inside a not-found signal.
    pub fn name_for_slug<'a>(metas: &'a [IdMeta], slug: &str) -> Option<&'a str> {
        metas
            .iter()
            .find(|meta| meta.slug == slug)
            .map(|meta| meta.name.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TrackerList {
    /// Catalog list this tracker list corresponds to.
    pub list_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    pub is_watchlist: bool,
    pub items: Vec<TrackerItem>,
}
