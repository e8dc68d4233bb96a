mod books;
mod loans;
mod ratings;

pub use books::{create_book, delete_book, get_book, list_books, lookup_book_by_isbn, update_book};
pub use loans::{create_loan, delete_loan, get_loan, list_loans};
pub use ratings::{add_rating_value, get_rating, list_ratings, top_rated};

use crate::application::{book, loan};

// ============================================================================
// State
// ============================================================================

/// 書籍サービスのハンドラー間で共有される状態
#[derive(Clone)]
pub struct BooksState {
    pub service_deps: book::ServiceDependencies,
    /// 内部ルックアップで期待する共有シークレット
    pub api_key: String,
}

/// 貸出サービスのハンドラー間で共有される状態
#[derive(Clone)]
pub struct LoansState {
    pub service_deps: loan::ServiceDependencies,
}
