//! 外部HTTPサービスのクライアントアダプタ
//!
//! 書誌メタデータプロバイダ（Google Books）と、貸出サービスから見た書籍サービスの
//! 内部ルックアップエンドポイント。どちらも冪等なGETのみを発行し、
//! タイムアウトと小さなリトライ予算の下で呼び出す。

pub mod books_api;
pub mod google_books;

pub use books_api::HttpBookCatalog;
pub use google_books::GoogleBooksMetadataLookup;

use reqwest::{Client, StatusCode, header::HeaderMap};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// リトライ時の基本待機時間（試行回数に比例して伸ばす）
const RETRY_BACKOFF: Duration = Duration::from_millis(200);

/// HTTPクライアントの設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpClientSettings {
    pub timeout: Duration,
    pub max_retries: u32,
}

impl Default for HttpClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            max_retries: 2,
        }
    }
}

impl HttpClientSettings {
    /// タイムアウト付きのreqwestクライアントを作成
    pub fn build_client(&self) -> Result<Client, reqwest::Error> {
        Client::builder().timeout(self.timeout).build()
    }
}

/// GETリクエストの失敗
#[derive(Debug, Error)]
pub enum FetchError {
    /// 接続できない、またはタイムアウト
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// 成功以外のステータス
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: StatusCode },

    /// 応答がJSONとして解釈できない
    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// JSONを返すGETをリトライ付きで実行する
///
/// 通信エラー、429、5xxの場合は `max_retries` 回まで線形バックオフで再試行する。
/// それ以外の失敗ステータスは即座に返す。
async fn get_json_with_retry(
    client: &Client,
    url: &str,
    headers: HeaderMap,
    settings: &HttpClientSettings,
) -> Result<Value, FetchError> {
    let mut attempt: u32 = 0;

    loop {
        let response = client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .headers(headers.clone())
            .send()
            .await;

        let retry_left = attempt < settings.max_retries;

        match response {
            Err(source) => {
                tracing::warn!(url, attempt = attempt + 1, error = %source, "http transport error");
                if !retry_left {
                    return Err(FetchError::Transport {
                        url: url.to_string(),
                        source,
                    });
                }
            }
            Ok(response) if response.status().is_success() => {
                tracing::debug!(url, status = %response.status(), "http request succeeded");
                return response.json::<Value>().await.map_err(|source| FetchError::Decode {
                    url: url.to_string(),
                    source,
                });
            }
            Ok(response) => {
                let status = response.status();
                tracing::warn!(url, attempt = attempt + 1, %status, "http request failed");
                let retryable =
                    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error();
                if !(retryable && retry_left) {
                    return Err(FetchError::Status {
                        url: url.to_string(),
                        status,
                    });
                }
            }
        }

        attempt += 1;
        tokio::time::sleep(RETRY_BACKOFF * attempt).await;
    }
}
