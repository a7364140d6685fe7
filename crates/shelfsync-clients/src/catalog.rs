use chrono::{NaiveDate, Utc};
use csv::Reader;
use reqwest::blocking::{Client, Response};
use shelfsync_config::{CatalogAuth, CatalogConfig};
use shelfsync_models::{CatalogItem, CatalogList, MediaType, WATCHLIST_ID};
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

use crate::error::ClientError;
use crate::traits::CatalogClient;

/// Blocking HTTP client for the catalog service. The catalog serves user data
/// as CSV exports which have to be regenerated server-side before fetching;
/// export triggering and export fetching are separate operations.
pub struct CatalogHttpClient {
    http: Client,
    base_url: String,
    user_id: String,
    session_cookie: Option<String>,
}

impl CatalogHttpClient {
    pub fn new(conf: &CatalogConfig) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(ClientError::transport("catalog client init"))?;
        let session_cookie = match conf.auth {
            CatalogAuth::Cookies => conf.session_cookie.clone(),
            CatalogAuth::None => None,
        };
        Ok(Self {
            http,
            base_url: conf.base_url.trim_end_matches('/').to_string(),
            user_id: conf.user_id.clone(),
            session_cookie,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/users/{}/{path}", self.base_url, self.user_id)
    }

    fn send(
        &self,
        operation: &'static str,
        request: reqwest::blocking::RequestBuilder,
        target: &str,
    ) -> Result<Response, ClientError> {
        let request = match &self.session_cookie {
            Some(cookie) => request.header(reqwest::header::COOKIE, cookie.clone()),
            None => request,
        };
        let response = request.send().map_err(ClientError::transport(operation))?;
        if !response.status().is_success() {
            return Err(ClientError::UnexpectedStatus {
                operation,
                target: target.to_string(),
                status: response.status(),
            });
        }
        Ok(response)
    }

    fn require_cookie(&self, operation: &'static str) -> Result<(), ClientError> {
        if self.session_cookie.is_none() {
            return Err(ClientError::MissingCredentials { operation });
        }
        Ok(())
    }

    fn trigger_export(&self, operation: &'static str, path: &str) -> Result<(), ClientError> {
        debug!(export = path, "triggering catalog export");
        self.send(operation, self.http.post(self.url(path)), path)?;
        Ok(())
    }

    fn fetch_csv(&self, operation: &'static str, path: &str) -> Result<String, ClientError> {
        let response = self.send(operation, self.http.get(self.url(path)), path)?;
        response.text().map_err(ClientError::transport(operation))
    }
}

impl CatalogClient for CatalogHttpClient {
    fn ratings_export(&self) -> Result<(), ClientError> {
        self.require_cookie("ratings export")?;
        self.trigger_export("ratings export", "exports/ratings")
    }

    fn lists_export(&self, list_ids: &[String]) -> Result<(), ClientError> {
        for list_id in list_ids {
            self.trigger_export("lists export", &format!("exports/lists/{list_id}"))?;
        }
        Ok(())
    }

    fn watchlist_export(&self) -> Result<(), ClientError> {
        self.require_cookie("watchlist export")?;
        self.trigger_export("watchlist export", "exports/watchlist")
    }

    fn ratings(&self) -> Result<Vec<CatalogItem>, ClientError> {
        self.require_cookie("ratings fetch")?;
        let data = self.fetch_csv("ratings fetch", "exports/ratings")?;
        parse_ratings_csv("ratings", &data)
    }

    fn lists(&self, list_ids: &[String]) -> Result<Vec<CatalogList>, ClientError> {
        let mut lists = Vec::with_capacity(list_ids.len());
        for list_id in list_ids {
            let meta: ListMetaDto = self
                .send(
                    "list metadata fetch",
                    self.http.get(self.url(&format!("lists/{list_id}"))),
                    list_id,
                )?
                .json()
                .map_err(ClientError::transport("list metadata fetch"))?;
            let data = self.fetch_csv("list fetch", &format!("exports/lists/{list_id}"))?;
            let items = parse_list_csv(list_id, &data)?;
            debug!(list_id = %list_id, name = %meta.name, count = items.len(), "fetched catalog list");
            lists.push(CatalogList {
                list_id: list_id.clone(),
                name: meta.name,
                is_watchlist: false,
                items,
            });
        }
        Ok(lists)
    }

    fn watchlist(&self) -> Result<CatalogList, ClientError> {
        self.require_cookie("watchlist fetch")?;
        let data = self.fetch_csv("watchlist fetch", "exports/watchlist")?;
        let items = parse_list_csv(WATCHLIST_ID, &data)?;
        Ok(CatalogList {
            list_id: WATCHLIST_ID.to_string(),
            name: "Watchlist".to_string(),
            is_watchlist: true,
            items,
        })
    }
}

#[derive(Debug, serde::Deserialize)]
struct ListMetaDto {
    #[allow(dead_code)]
    id: String,
    name: String,
}

fn header_index(
    target: &str,
    headers: &csv::StringRecord,
    required: &[&str],
) -> Result<HashMap<String, usize>, ClientError> {
    let map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_string(), i))
        .collect();
    for col in required {
        if !map.contains_key(*col) {
            return Err(ClientError::ExportShape {
                target: target.to_string(),
                message: format!("missing required column {col}"),
            });
        }
    }
    Ok(map)
}

fn parse_export_date(target: &str, raw: &str) -> Result<chrono::DateTime<Utc>, ClientError> {
    // Exports carry dates only, no time of day.
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|dt| dt.and_local_timezone(Utc).earliest())
        .ok_or_else(|| ClientError::ExportShape {
            target: target.to_string(),
            message: format!("unparseable date '{raw}'"),
        })
}

/// Parse a ratings export. Columns: `Const`, `Your Rating`, `Date Rated`,
/// `Title Type`. Rows with an empty id are malformed and rejected.
pub fn parse_ratings_csv(target: &str, data: &str) -> Result<Vec<CatalogItem>, ClientError> {
    let mut reader = Reader::from_reader(data.as_bytes());
    let headers = reader
        .headers()
        .map_err(|source| ClientError::Export {
            target: target.to_string(),
            source,
        })?
        .clone();
    let index = header_index(target, &headers, &["Const", "Your Rating", "Date Rated", "Title Type"])?;

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ClientError::Export {
            target: target.to_string(),
            source,
        })?;
        let id = record.get(index["Const"]).unwrap_or("").to_string();
        if id.is_empty() {
            return Err(ClientError::ExportShape {
                target: target.to_string(),
                message: "row with empty item id".to_string(),
            });
        }
        let rating = record
            .get(index["Your Rating"])
            .unwrap_or("")
            .parse::<u8>()
            .map_err(|_| ClientError::ExportShape {
                target: target.to_string(),
                message: format!("unparseable rating for {id}"),
            })?;
        if !(1..=10).contains(&rating) {
            return Err(ClientError::ExportShape {
                target: target.to_string(),
                message: format!("rating {rating} out of range for {id}"),
            });
        }
        let rated_at = parse_export_date(target, record.get(index["Date Rated"]).unwrap_or(""))?;
        let title_type = record.get(index["Title Type"]).unwrap_or("");
        items.push(CatalogItem {
            id,
            media_type: MediaType::from_title_type(title_type),
            rating: Some(rating),
            rated_at: Some(rated_at),
        });
    }
    Ok(items)
}

/// Parse a list or watchlist export. Columns: `Const`, `Title Type`.
pub fn parse_list_csv(target: &str, data: &str) -> Result<Vec<CatalogItem>, ClientError> {
    let mut reader = Reader::from_reader(data.as_bytes());
    let headers = reader
        .headers()
        .map_err(|source| ClientError::Export {
            target: target.to_string(),
            source,
        })?
        .clone();
    let index = header_index(target, &headers, &["Const", "Title Type"])?;

    let mut items = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ClientError::Export {
            target: target.to_string(),
            source,
        })?;
        let id = record.get(index["Const"]).unwrap_or("").to_string();
        if id.is_empty() {
            return Err(ClientError::ExportShape {
                target: target.to_string(),
                message: "row with empty item id".to_string(),
            });
        }
        let title_type = record.get(index["Title Type"]).unwrap_or("");
        items.push(CatalogItem {
            id,
            media_type: MediaType::from_title_type(title_type),
            rating: None,
            rated_at: None,
        });
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ratings_csv() {
        let data = "Const,Your Rating,Date Rated,Title Type\n\
                    tt0000001,8,2024-03-01,movie\n\
                    tt0000002,10,2024-03-02,tvSeries\n";
        let items = parse_ratings_csv("ratings", data).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "tt0000001");
        assert_eq!(items[0].rating, Some(8));
        assert_eq!(items[0].media_type, MediaType::Movie);
        assert_eq!(items[1].media_type, MediaType::Show);
        assert!(items[1].rated_at.is_some());
    }

    #[test]
    fn test_parse_ratings_csv_rejects_missing_column() {
        let data = "Const,Title Type\ntt0000001,movie\n";
        let err = parse_ratings_csv("ratings", data).unwrap_err();
        assert!(matches!(err, ClientError::ExportShape { .. }));
    }

    #[test]
    fn test_parse_ratings_csv_rejects_empty_id() {
        let data = "Const,Your Rating,Date Rated,Title Type\n,8,2024-03-01,movie\n";
        let err = parse_ratings_csv("ratings", data).unwrap_err();
        assert!(matches!(err, ClientError::ExportShape { .. }));
    }

    #[test]
    fn test_parse_list_csv() {
        let data = "Const,Title Type\ntt0000003,tvEpisode\ntt0000004,short\n";
        let items = parse_list_csv("ls001", data).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].media_type, MediaType::Episode);
        assert_eq!(items[1].media_type, MediaType::Movie);
        assert_eq!(items[1].rating, None);
    }

    #[test]
    fn test_parse_list_csv_empty_export() {
        let data = "Const,Title Type\n";
        let items = parse_list_csv("ls001", data).unwrap();
        assert!(items.is_empty());
    }
}
