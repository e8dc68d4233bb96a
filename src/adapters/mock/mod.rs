pub mod book_catalog;
pub mod metadata_lookup;

pub use book_catalog::BookCatalog;
pub use metadata_lookup::MetadataLookup;
