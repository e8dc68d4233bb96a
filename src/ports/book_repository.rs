use crate::domain::{Book, BookId, Isbn};
use async_trait::async_trait;

pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// 書き込み結果
///
/// ISBNの一意性はストア側で強制される。競合した書き込みは
/// エラーではなく `DuplicateIsbn` として返る。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookWrite {
    Written,
    DuplicateIsbn,
    /// 更新対象の書籍が存在しない（削除と競合した）
    NotFound,
}

/// 書籍ストアポート
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// IDで書籍を取得する
    async fn find_by_id(&self, id: BookId) -> Result<Option<Book>>;

    /// ISBNで書籍を取得する
    ///
    /// 重複登録の事前チェックと、貸出サービス向け内部ルックアップで使用される。
    async fn find_by_isbn(&self, isbn: &Isbn) -> Result<Option<Book>>;

    /// 全書籍を登録順に取得する
    async fn list(&self) -> Result<Vec<Book>>;

    /// 書籍を挿入する
    async fn insert(&self, book: &Book) -> Result<BookWrite>;

    /// 書籍を全項目で置き換える。対象がなければ `BookWrite::NotFound`。
    async fn update(&self, book: &Book) -> Result<BookWrite>;

    /// 書籍を削除する。削除した場合はtrue。
    async fn delete(&self, id: BookId) -> Result<bool>;
}
