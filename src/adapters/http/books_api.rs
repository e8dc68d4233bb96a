use crate::domain::{BookId, Isbn, loan::BookRef};
use crate::ports::book_catalog::{BookCatalog, Result};
use async_trait::async_trait;
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue},
};
use serde_json::Value;

use super::{HttpClientSettings, get_json_with_retry};

/// 内部ルックアップで共有シークレットを渡すヘッダー名（`API-KEY`、大文字小文字は区別されない）
pub const API_KEY_HEADER: &str = "api-key";

/// 書籍サービスの内部ルックアップ（GET /books/isbn/{isbn}）を呼ぶBookCatalogの実装
pub struct HttpBookCatalog {
    client: Client,
    base_url: String,
    api_key: String,
    settings: HttpClientSettings,
}

impl HttpBookCatalog {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        settings: HttpClientSettings,
    ) -> std::result::Result<Self, reqwest::Error> {
        Ok(Self {
            client: settings.build_client()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            settings,
        })
    }
}

#[async_trait]
impl BookCatalog for HttpBookCatalog {
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<BookRef>> {
        let url = format!("{}/books/isbn/{}", self.base_url, isbn);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(&self.api_key)?);

        let body = get_json_with_retry(&self.client, &url, headers, &self.settings).await?;
        parse_lookup_response(&body)
    }
}

/// 内部ルックアップの応答を解釈する
///
/// `{}` や id のない応答は該当なし。id があるのにUUIDでない場合はエラー。
pub fn parse_lookup_response(body: &Value) -> Result<Option<BookRef>> {
    let Some(id) = body.get("id").and_then(Value::as_str) else {
        return Ok(None);
    };

    let id = BookId::parse(id).ok_or_else(|| format!("books service returned invalid id: {id}"))?;
    let title = body
        .get("title")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Ok(Some(BookRef { id, title }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_object_means_not_found() {
        assert_eq!(parse_lookup_response(&json!({})).unwrap(), None);
    }

    #[test]
    fn test_resolves_id_and_title() {
        let id = BookId::new();
        let body = json!({ "id": id.to_string(), "title": "Dune" });

        let book = parse_lookup_response(&body).unwrap().unwrap();

        assert_eq!(book.id, id);
        assert_eq!(book.title, "Dune");
    }

    #[test]
    fn test_malformed_id_is_an_error() {
        let body = json!({ "id": "not-a-uuid", "title": "Dune" });
        assert!(parse_lookup_response(&body).is_err());
    }
}
