use crate::domain::validation::ValidationErrors;
use thiserror::Error;

/// 貸出管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum LoanApplicationError {
    /// 入力値の検証エラー（違反はすべてまとめて報告）
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// 貸出が見つからない
    #[error("No loan found with ID={0}")]
    LoanNotFound(String),

    /// ISBNに対応する書籍がカタログに存在しない
    #[error("The book with the provided ISBN wasn't found")]
    BookNotFound,

    /// 同じISBNの貸出が既に存在する
    #[error("There already exists a loan for the book with the provided ISBN")]
    BookAlreadyOnLoan,

    /// 貸出上限（2冊）に達している
    #[error("Member already has 2 or more books on loan")]
    LoanLimitExceeded,

    /// 書籍サービスのエラー
    #[error("Error fetching book data from the books service: {0}")]
    BookServiceError(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 貸出ストアのエラー
    #[error("Error accessing the loans database: {0}")]
    LoanStoreError(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, LoanApplicationError>;
