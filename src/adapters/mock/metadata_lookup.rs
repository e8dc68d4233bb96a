use crate::domain::{BookMetadata, Isbn};
use crate::ports::metadata_lookup::{MetadataLookup as MetadataLookupTrait, MetadataLookupResult};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// MetadataLookupのモック実装
///
/// ISBNごとの応答を登録できる。未登録のISBNには既定の応答を返す。
/// 既定は空のメタデータでFound（全項目 "missing" になる）。
pub struct MetadataLookup {
    responses: Mutex<HashMap<Isbn, MetadataLookupResult>>,
    fallback: MetadataLookupResult,
    calls: Mutex<Vec<Isbn>>,
}

impl MetadataLookup {
    pub fn new() -> Self {
        Self::with_fallback(MetadataLookupResult::Found(BookMetadata::default()))
    }

    /// 未登録のISBNに返す応答を指定して作成
    pub fn with_fallback(fallback: MetadataLookupResult) -> Self {
        Self {
            responses: Mutex::new(HashMap::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// テスト用にISBNの応答を登録
    pub fn respond_with(&self, isbn: Isbn, result: MetadataLookupResult) {
        self.responses.lock().unwrap().insert(isbn, result);
    }

    /// 呼び出されたISBNの履歴
    pub fn calls(&self) -> Vec<Isbn> {
        self.calls.lock().unwrap().clone()
    }
}

impl Default for MetadataLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MetadataLookupTrait for MetadataLookup {
    async fn lookup(&self, isbn: &Isbn) -> MetadataLookupResult {
        self.calls.lock().unwrap().push(isbn.clone());
        self.responses
            .lock()
            .unwrap()
            .get(isbn)
            .cloned()
            .unwrap_or_else(|| self.fallback.clone())
    }
}
