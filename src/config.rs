//! 環境変数からの設定読み込み
//!
//! `.env` ファイルがあれば先に読み込み（dotenvy）、`config::Environment` を
//! 設定構造体にデシリアライズする。変数名は小文字化されたフィールド名と対応する
//! （`DATABASE_URL` → `database_url`）。空の値は未設定として既定値になる。

use crate::adapters::http::{HttpClientSettings, google_books::DEFAULT_VOLUMES_URL};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

/// 内部ルックアップの共有シークレットの既定値
pub const DEFAULT_API_KEY: &str = "loans-service-api-key";

const DEFAULT_BOOKS_PORT: u16 = 5001;
const DEFAULT_LOANS_PORT: u16 = 5002;
const DEFAULT_BOOKS_DATABASE_URL: &str = "postgres://localhost/library_books";
const DEFAULT_LOANS_DATABASE_URL: &str = "postgres://localhost/library_loans";
const DEFAULT_BOOKS_SERVICE_URL: &str = "http://localhost:5001";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// 設定エラー
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load settings: {0}")]
    Load(#[from] config::ConfigError),
}

/// ストアの実装
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

/// 書籍サービスの設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BooksSettings {
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: String,
    pub database_max_connections: u32,
    /// 内部ルックアップで期待する共有シークレット
    pub books_api_key: String,
    pub metadata_api_url: String,
    pub http_timeout_secs: u64,
    pub http_max_retries: u32,
}

impl Default for BooksSettings {
    fn default() -> Self {
        let http = HttpClientSettings::default();
        Self {
            port: DEFAULT_BOOKS_PORT,
            storage: StorageBackend::default(),
            database_url: DEFAULT_BOOKS_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            books_api_key: DEFAULT_API_KEY.to_string(),
            metadata_api_url: DEFAULT_VOLUMES_URL.to_string(),
            http_timeout_secs: http.timeout.as_secs(),
            http_max_retries: http.max_retries,
        }
    }
}

impl BooksSettings {
    /// `.env` と環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        load(environment())
    }

    pub fn http(&self) -> HttpClientSettings {
        http_settings(self.http_timeout_secs, self.http_max_retries)
    }
}

/// 貸出サービスの設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoansSettings {
    pub port: u16,
    pub storage: StorageBackend,
    pub database_url: String,
    pub database_max_connections: u32,
    /// 書籍サービスのベースURL
    pub books_service_url: String,
    /// 内部ルックアップで提示する共有シークレット
    pub books_service_api_key: String,
    pub http_timeout_secs: u64,
    pub http_max_retries: u32,
}

impl Default for LoansSettings {
    fn default() -> Self {
        let http = HttpClientSettings::default();
        Self {
            port: DEFAULT_LOANS_PORT,
            storage: StorageBackend::default(),
            database_url: DEFAULT_LOANS_DATABASE_URL.to_string(),
            database_max_connections: DEFAULT_MAX_CONNECTIONS,
            books_service_url: DEFAULT_BOOKS_SERVICE_URL.to_string(),
            books_service_api_key: DEFAULT_API_KEY.to_string(),
            http_timeout_secs: http.timeout.as_secs(),
            http_max_retries: http.max_retries,
        }
    }
}

impl LoansSettings {
    /// `.env` と環境変数から読み込む
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        load(environment())
    }

    pub fn http(&self) -> HttpClientSettings {
        http_settings(self.http_timeout_secs, self.http_max_retries)
    }
}

/// 環境変数ソース（接頭辞なし、数値は型に合わせて解釈）
fn environment() -> config::Environment {
    config::Environment::default()
        .try_parsing(true)
        .ignore_empty(true)
}

fn load<T: for<'de> Deserialize<'de>>(source: config::Environment) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(source)
        .build()?
        .try_deserialize()?;
    Ok(settings)
}

fn http_settings(timeout_secs: u64, max_retries: u32) -> HttpClientSettings {
    HttpClientSettings {
        timeout: Duration::from_secs(timeout_secs),
        max_retries,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(pairs: &[(&str, &str)]) -> config::Environment {
        let vars: config::Map<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn test_books_defaults() {
        let settings: BooksSettings = load(source(&[])).unwrap();

        assert_eq!(settings, BooksSettings::default());
        assert_eq!(settings.port, 5001);
        assert_eq!(settings.storage, StorageBackend::Postgres);
        assert_eq!(settings.database_url, DEFAULT_BOOKS_DATABASE_URL);
        assert_eq!(settings.database_max_connections, 5);
        assert_eq!(settings.books_api_key, DEFAULT_API_KEY);
        assert_eq!(settings.metadata_api_url, DEFAULT_VOLUMES_URL);
        assert_eq!(settings.http(), HttpClientSettings::default());
    }

    #[test]
    fn test_loans_overrides() {
        let settings: LoansSettings = load(source(&[
            ("PORT", "8080"),
            ("STORAGE", "memory"),
            ("BOOKS_SERVICE_URL", "http://books:5001"),
            ("BOOKS_SERVICE_API_KEY", "secret"),
            ("HTTP_TIMEOUT_SECS", "1"),
            ("HTTP_MAX_RETRIES", "0"),
        ]))
        .unwrap();

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.storage, StorageBackend::Memory);
        assert_eq!(settings.books_service_url, "http://books:5001");
        assert_eq!(settings.books_service_api_key, "secret");
        assert_eq!(settings.http().timeout, Duration::from_secs(1));
        assert_eq!(settings.http().max_retries, 0);
        assert_eq!(settings.database_url, DEFAULT_LOANS_DATABASE_URL);
    }

    #[test]
    fn test_empty_value_falls_back_to_default() {
        let settings: BooksSettings = load(source(&[("DATABASE_URL", "")])).unwrap();
        assert_eq!(settings.database_url, DEFAULT_BOOKS_DATABASE_URL);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        assert!(load::<BooksSettings>(source(&[("PORT", "not-a-port")])).is_err());
    }

    #[test]
    fn test_unknown_storage_is_an_error() {
        assert!(load::<LoansSettings>(source(&[("STORAGE", "mongo")])).is_err());
    }
}
