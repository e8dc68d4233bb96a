use crate::domain::validation::ValidationErrors;
use thiserror::Error;

/// 書籍・評価アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum BookApplicationError {
    /// 入力値の検証エラー（違反はすべてまとめて報告）
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// 書籍が見つからない
    #[error("No book found with ID={0}")]
    BookNotFound(String),

    /// 評価が見つからない
    #[error("ID={0} not found")]
    RatingNotFound(String),

    /// 同じISBNの書籍が既に存在する
    #[error("There already exists a book with the provided ISBN number")]
    DuplicateIsbn,

    /// 書誌メタデータのプロバイダに該当がない
    #[error("No items returned from the book metadata service for the given ISBN number")]
    MetadataNotFound,

    /// 書誌メタデータのプロバイダに到達できない
    #[error("Unable to connect to the book metadata service: {0}")]
    MetadataUnreachable(String),

    /// 書籍ストアのエラー
    #[error("Error accessing the books database: {0}")]
    BookStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 評価ストアのエラー
    #[error("Error accessing the ratings database: {0}")]
    RatingStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, BookApplicationError>;
