pub mod book_repository;
pub mod loan_repository;
pub mod rating_repository;

// パブリックに型を再エクスポート
pub use book_repository::BookRepository as PostgresBookRepository;
pub use loan_repository::LoanRepository as PostgresLoanRepository;
pub use rating_repository::RatingRepository as PostgresRatingRepository;

/// 一意制約違反かどうか
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// 行の値が不正な場合のエラー
fn invalid_data(message: impl Into<String>) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message.into(),
    ))
}
