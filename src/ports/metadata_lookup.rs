use crate::domain::{BookMetadata, Isbn};
use async_trait::async_trait;

/// 書誌メタデータ検索の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataLookupResult {
    Found(BookMetadata),
    /// プロバイダは応答したが該当なし
    NotFound,
    /// プロバイダに到達できない、または応答が解釈できない
    Unreachable(String),
}

/// 書誌メタデータ検索ポート
///
/// 書籍登録時に1回だけ呼ばれ、著者・出版社・出版日を補完する。
#[async_trait]
pub trait MetadataLookup: Send + Sync {
    async fn lookup(&self, isbn: &Isbn) -> MetadataLookupResult;
}
