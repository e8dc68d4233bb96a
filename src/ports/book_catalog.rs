use crate::domain::{Isbn, loan::BookRef};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書籍カタログポート
///
/// 貸出コンテキストと書籍コンテキストの境界を維持する。
/// 貸出コンテキストはISBNから書籍IDとタイトルだけを解決する。
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// ISBNで書籍を解決する。存在しなければNone。
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<BookRef>>;
}
