//! インメモリのストアアダプタ
//!
//! `STORAGE=memory` での起動と、データベースを使わないテストで使用する。
//! 1つのストアにつき1つのロックを持ち、チェックと書き込みを同じロックの中で行う。

pub mod book_repository;
pub mod loan_repository;
pub mod rating_repository;

pub use book_repository::BookRepository as InMemoryBookRepository;
pub use loan_repository::LoanRepository as InMemoryLoanRepository;
pub use rating_repository::RatingRepository as InMemoryRatingRepository;

use std::sync::{Mutex, MutexGuard};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// ロックを取得する。ポイズニングはストアエラーとして返す。
fn lock<'a, T>(mutex: &'a Mutex<T>, store: &str) -> Result<MutexGuard<'a, T>, BoxError> {
    mutex
        .lock()
        .map_err(|_| format!("{store} store lock poisoned").into())
}
