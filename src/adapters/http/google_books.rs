use crate::domain::{BookMetadata, Isbn};
use crate::ports::metadata_lookup::{MetadataLookup, MetadataLookupResult};
use async_trait::async_trait;
use reqwest::{Client, header::HeaderMap};
use serde_json::Value;

use super::{HttpClientSettings, get_json_with_retry};

/// Google Books APIの既定のエンドポイント
pub const DEFAULT_VOLUMES_URL: &str = "https://www.googleapis.com/books/v1/volumes";

/// Google Books APIによるMetadataLookupの実装
pub struct GoogleBooksMetadataLookup {
    client: Client,
    volumes_url: String,
    settings: HttpClientSettings,
}

impl GoogleBooksMetadataLookup {
    pub fn new(
        volumes_url: impl Into<String>,
        settings: HttpClientSettings,
    ) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: settings.build_client()?,
            volumes_url: volumes_url.into(),
            settings,
        })
    }
}

#[async_trait]
impl MetadataLookup for GoogleBooksMetadataLookup {
    async fn lookup(&self, isbn: &Isbn) -> MetadataLookupResult {
        let url = format!("{}?q=isbn:{}", self.volumes_url, isbn);

        match get_json_with_retry(&self.client, &url, HeaderMap::new(), &self.settings).await {
            Ok(body) => parse_volumes_response(&body),
            Err(e) => MetadataLookupResult::Unreachable(e.to_string()),
        }
    }
}

/// volumes APIの応答を解釈する
///
/// - `items[0].volumeInfo` があれば Found（欠けている項目は None）
/// - なければ `totalItems == 0` のとき NotFound
/// - それ以外は解釈できない応答として Unreachable
pub fn parse_volumes_response(body: &Value) -> MetadataLookupResult {
    if let Some(info) = body.pointer("/items/0/volumeInfo").and_then(Value::as_object) {
        let authors = info.get("authors").and_then(Value::as_array).map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect::<Vec<_>>()
        });
        let text = |key: &str| info.get(key).and_then(Value::as_str).map(str::to_string);

        return MetadataLookupResult::Found(BookMetadata {
            authors,
            publisher: text("publisher"),
            published_date: text("publishedDate"),
        });
    }

    match body.get("totalItems").and_then(Value::as_i64) {
        Some(0) => MetadataLookupResult::NotFound,
        _ => MetadataLookupResult::Unreachable(
            "unexpected response from the book metadata service".to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_found_with_all_fields() {
        let body = json!({
            "totalItems": 1,
            "items": [{
                "volumeInfo": {
                    "authors": ["Neil Gaiman", "Terry Pratchett"],
                    "publisher": "William Morrow",
                    "publishedDate": "2006-11-28"
                }
            }]
        });

        let expected = BookMetadata {
            authors: Some(vec!["Neil Gaiman".to_string(), "Terry Pratchett".to_string()]),
            publisher: Some("William Morrow".to_string()),
            published_date: Some("2006-11-28".to_string()),
        };
        assert_eq!(parse_volumes_response(&body), MetadataLookupResult::Found(expected));
    }

    #[test]
    fn test_found_with_missing_fields() {
        let body = json!({ "totalItems": 1, "items": [{ "volumeInfo": { "title": "x" } }] });

        assert_eq!(
            parse_volumes_response(&body),
            MetadataLookupResult::Found(BookMetadata::default())
        );
    }

    #[test]
    fn test_zero_items_is_not_found() {
        let body = json!({ "kind": "books#volumes", "totalItems": 0 });
        assert_eq!(parse_volumes_response(&body), MetadataLookupResult::NotFound);
    }

    #[test]
    fn test_unexpected_shape_is_unreachable() {
        let body = json!({ "error": { "code": 403 } });
        assert!(matches!(
            parse_volumes_response(&body),
            MetadataLookupResult::Unreachable(_)
        ));
    }
}
