mod book_service;
mod errors;
mod rating_service;

pub use book_service::{
    ServiceDependencies, create_book, delete_book, get_book, list_books, lookup_by_isbn,
    update_book,
};
pub use errors::{BookApplicationError, Result};
pub use rating_service::{add_rating_value, get_rating, list_ratings, top_rated};
