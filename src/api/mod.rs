pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod types;

pub use error::ApiError;
pub use handlers::{BooksState, LoansState};
pub use router::{create_books_router, create_loans_router};
pub use types::*;
