use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::auth::require_api_key;
use super::handlers::{
    BooksState, LoansState, add_rating_value, create_book, create_loan, delete_book, delete_loan,
    get_book, get_loan, get_rating, list_books, list_loans, list_ratings, lookup_book_by_isbn,
    top_rated, update_book,
};

/// 書籍サービスのルーターを作成
///
/// エンドポイント:
/// - GET/POST /books
/// - GET/PUT/DELETE /books/:id
/// - GET /books/isbn/:isbn (API-KEYヘッダー必須)
/// - GET /ratings, GET /ratings/:id, POST /ratings/:id/values
/// - GET /top
pub fn create_books_router(state: Arc<BooksState>) -> Router {
    let internal = Router::new()
        .route("/books/isbn/:isbn", get(lookup_book_by_isbn))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_api_key));

    Router::new()
        // Health check endpoint
        .route("/health", get(health_check))
        .route("/books", get(list_books).post(create_book))
        .route("/books/:id", get(get_book).put(update_book).delete(delete_book))
        .merge(internal)
        .route("/ratings", get(list_ratings))
        .route("/ratings/:id", get(get_rating))
        .route("/ratings/:id/values", post(add_rating_value))
        .route("/top", get(top_rated))
        // Add tracing middleware
        .layer(TraceLayer::new_for_http())
        // Add application state
        .with_state(state)
}

/// 貸出サービスのルーターを作成
///
/// エンドポイント:
/// - GET/POST /loans
/// - GET/DELETE /loans/:id
pub fn create_loans_router(state: Arc<LoansState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/loans", get(list_loans).post(create_loan))
        .route("/loans/:id", get(get_loan).delete(delete_loan))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
