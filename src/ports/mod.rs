pub mod book_catalog;
pub mod book_repository;
pub mod loan_repository;
pub mod metadata_lookup;
pub mod rating_repository;

// 各ポートの `Result` 別名はモジュール経由で参照する
pub use book_catalog::BookCatalog;
pub use book_repository::{BookRepository, BookWrite};
pub use loan_repository::LoanRepository;
pub use metadata_lookup::{MetadataLookup, MetadataLookupResult};
pub use rating_repository::RatingRepository;
