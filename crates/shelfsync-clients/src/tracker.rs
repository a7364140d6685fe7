use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use shelfsync_config::TrackerConfig;
use shelfsync_models::{
    HistoryEntry, IdMeta, ItemIds, MediaType, TrackerItem, TrackerList, WATCHLIST_ID,
};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::debug;
use urlencoding::encode;

use crate::error::ClientError;
use crate::traits::{ListFetch, TrackerClient};

/// Blocking HTTP client for the tracker's JSON API. Authenticates with a
/// bearer token plus an application client id on every request.
pub struct TrackerHttpClient {
    http: Client,
    base_url: String,
    client_id: String,
    access_token: String,
    username: String,
}

impl TrackerHttpClient {
    pub fn new(conf: &TrackerConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(ClientError::transport("tracker client init"))?;
        Ok(Self {
            http,
            base_url: conf.base_url.trim_end_matches('/').to_string(),
            client_id: conf.client_id.clone(),
            access_token: conf.access_token.clone(),
            username: conf.username.clone(),
        })
    }

    fn request(
        &self,
        operation: &'static str,
        builder: reqwest::blocking::RequestBuilder,
    ) -> Result<Response, ClientError> {
        builder
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", self.access_token))
            .header("X-Api-Key", &self.client_id)
            .send()
            .map_err(ClientError::transport(operation))
    }

    fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        operation: &'static str,
        path: &str,
    ) -> Result<T, ClientError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self.request(operation, self.http.get(&url))?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                operation,
                target: path.to_string(),
                status: response.status(),
            });
        }
        response.json().map_err(ClientError::transport(operation))
    }

    fn post_json(
        &self,
        operation: &'static str,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<(), ClientError> {
        let url = format!("{}/{path}", self.base_url);
        let response = self.request(operation, self.http.post(&url).json(body))?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                operation,
                target: path.to_string(),
                status: response.status(),
            });
        }
        Ok(())
    }
}

impl TrackerClient for TrackerHttpClient {
    fn lists(&self, metas: &[IdMeta]) -> Result<Vec<ListFetch>, ClientError> {
        let operation = "tracker lists fetch";
        let mut fetches = Vec::with_capacity(metas.len());
        for meta in metas {
            let path = format!("users/{}/lists/{}/items", self.username, encode(&meta.slug));
            let url = format!("{}/{path}", self.base_url);
            let response = self.request(operation, self.http.get(&url))?;
            if response.status() == StatusCode::NOT_FOUND {
                debug!(slug = %meta.slug, "tracker list not found");
                fetches.push(ListFetch::NotFound {
                    slug: meta.slug.clone(),
                });
                continue;
            }
            if !response.status().is_success() {
                return Err(ClientError::UnexpectedStatus {
                    operation,
                    target: meta.slug.clone(),
                    status: response.status(),
                });
            }
            let entries: Vec<EntryDto> =
                response.json().map_err(ClientError::transport(operation))?;
            fetches.push(ListFetch::Found(TrackerList {
                list_id: meta.list_id.clone(),
                slug: Some(meta.slug.clone()),
                is_watchlist: false,
                items: entries.into_iter().map(TrackerItem::from).collect(),
            }));
        }
        Ok(fetches)
    }

    fn create_list(&self, slug: &str, name: &str) -> Result<(), ClientError> {
        self.post_json(
            "tracker list create",
            &format!("users/{}/lists", self.username),
            &json!({ "name": name, "slug": slug }),
        )
    }

    fn watchlist(&self) -> Result<TrackerList, ClientError> {
        let entries: Vec<EntryDto> = self.get_json("tracker watchlist fetch", "sync/watchlist")?;
        Ok(TrackerList {
            list_id: WATCHLIST_ID.to_string(),
            slug: None,
            is_watchlist: true,
            items: entries.into_iter().map(TrackerItem::from).collect(),
        })
    }

    fn ratings(&self) -> Result<Vec<TrackerItem>, ClientError> {
        let entries: Vec<EntryDto> = self.get_json("tracker ratings fetch", "sync/ratings")?;
        Ok(entries.into_iter().map(TrackerItem::from).collect())
    }

    fn watchlist_items_add(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.post_json("tracker watchlist add", "sync/watchlist", &sync_payload(items))
    }

    fn watchlist_items_remove(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.post_json(
            "tracker watchlist remove",
            "sync/watchlist/remove",
            &sync_payload(items),
        )
    }

    fn list_items_add(&self, slug: &str, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.post_json(
            "tracker list items add",
            &format!("users/{}/lists/{}/items", self.username, encode(slug)),
            &sync_payload(items),
        )
    }

    fn list_items_remove(&self, slug: &str, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.post_json(
            "tracker list items remove",
            &format!("users/{}/lists/{}/items/remove", self.username, encode(slug)),
            &sync_payload(items),
        )
    }

    fn ratings_add(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.post_json("tracker ratings add", "sync/ratings", &sync_payload(items))
    }

    fn ratings_remove(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.post_json("tracker ratings remove", "sync/ratings/remove", &sync_payload(items))
    }

    fn history(
        &self,
        media_type: MediaType,
        item_id: &str,
    ) -> Result<Vec<HistoryEntry>, ClientError> {
        let entries: Vec<HistoryDto> = self.get_json(
            "tracker history fetch",
            &format!("sync/history/{}/{}", media_type.plural(), encode(item_id)),
        )?;
        Ok(entries.into_iter().map(HistoryEntry::from).collect())
    }

    fn history_add(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.post_json("tracker history add", "sync/history", &sync_payload(items))
    }

    fn history_remove(&self, items: &[TrackerItem]) -> Result<(), ClientError> {
        self.post_json("tracker history remove", "sync/history/remove", &sync_payload(items))
    }
}

#[derive(Debug, Deserialize)]
struct EntryDto {
    #[serde(rename = "type")]
    media_type: MediaType,
    ids: ItemIds,
    #[serde(default)]
    rating: Option<u8>,
    #[serde(default)]
    rated_at: Option<DateTime<Utc>>,
}

impl From<EntryDto> for TrackerItem {
    fn from(entry: EntryDto) -> Self {
        Self {
            media_type: entry.media_type,
            ids: entry.ids,
            rating: entry.rating,
            rated_at: entry.rated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HistoryDto {
    id: u64,
    watched_at: DateTime<Utc>,
    #[serde(rename = "type")]
    media_type: MediaType,
}

impl From<HistoryDto> for HistoryEntry {
    fn from(entry: HistoryDto) -> Self {
        Self {
            id: entry.id,
            watched_at: entry.watched_at,
            media_type: entry.media_type,
        }
    }
}

/// Group items by media type into the tracker's batch mutation payload shape:
/// `{"movies": [...], "shows": [...], ...}`. Ratings and timestamps ride along
/// when present so the same payload serves watchlist, rating and history
/// mutations.
fn sync_payload(items: &[TrackerItem]) -> serde_json::Value {
    let mut groups: BTreeMap<&'static str, Vec<serde_json::Value>> = BTreeMap::new();
    for item in items {
        let mut entry = json!({ "ids": item.ids });
        if let Some(rating) = item.rating {
            entry["rating"] = rating.into();
        }
        if let Some(rated_at) = item.rated_at {
            entry["rated_at"] = json!(rated_at);
        }
        groups.entry(item.media_type.plural()).or_default().push(entry);
    }
    serde_json::Value::Object(
        groups
            .into_iter()
            .map(|(kind, entries)| (kind.to_string(), serde_json::Value::Array(entries)))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(catalog_id: &str, media_type: MediaType, rating: Option<u8>) -> TrackerItem {
        TrackerItem {
            media_type,
            ids: ItemIds {
                catalog: Some(catalog_id.to_string()),
                ..ItemIds::default()
            },
            rating,
            rated_at: None,
        }
    }

    #[test]
    fn test_sync_payload_groups_by_media_type() {
        let items = vec![
            item("tt1", MediaType::Movie, None),
            item("tt2", MediaType::Show, None),
            item("tt3", MediaType::Movie, None),
        ];
        let payload = sync_payload(&items);
        assert_eq!(payload["movies"].as_array().unwrap().len(), 2);
        assert_eq!(payload["shows"].as_array().unwrap().len(), 1);
        assert_eq!(payload["movies"][0]["ids"]["catalog"], "tt1");
    }

    #[test]
    fn test_sync_payload_carries_rating_when_present() {
        let payload = sync_payload(&[item("tt1", MediaType::Movie, Some(9))]);
        assert_eq!(payload["movies"][0]["rating"], 9);
        assert!(payload["movies"][0].get("rated_at").is_none());
    }

    #[test]
    fn test_entry_dto_round_trip() {
        let raw = r#"{"type":"movie","ids":{"catalog":"tt42","tracker":7},"rating":8}"#;
        let entry: EntryDto = serde_json::from_str(raw).unwrap();
        let item = TrackerItem::from(entry);
        assert_eq!(item.item_id(), Some("tt42"));
        assert_eq!(item.ids.tracker, Some(7));
        assert_eq!(item.rating, Some(8));
        assert_eq!(item.media_type, MediaType::Movie);
    }
}
