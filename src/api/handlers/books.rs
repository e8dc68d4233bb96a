use crate::application::book::{
    create_book as execute_create_book, delete_book as execute_delete_book,
    get_book as execute_get_book, list_books as execute_list_books,
    lookup_by_isbn as execute_lookup_by_isbn, update_book as execute_update_book,
};
use crate::domain::validation::{validate_book_query, validate_create_book, validate_update_book};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::BooksState;
use crate::api::{
    error::ApiError,
    extract::JsonObject,
    types::{BookCreatedResponse, BookLookupResponse, BookResponse, SuccessResponse},
};

/// GET /books - 条件に一致する書籍の一覧
///
/// 同じパラメータの複数指定はOR、異なるパラメータはAND。
/// 許可されていないパラメータ名があれば422。
pub async fn list_books(
    State(state): State<Arc<BooksState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let criteria = validate_book_query(&params)?;

    let books = execute_list_books(&state.service_deps, &criteria).await?;

    Ok(Json(books.into_iter().map(BookResponse::from).collect()))
}

/// POST /books - 書籍を登録
///
/// 強制されるビジネスルール:
/// - title / ISBN / genre が揃っていて形式が正しいこと
/// - ISBNが既存の書籍と重複しないこと
/// - 書誌メタデータが取得できること
pub async fn create_book(
    State(state): State<Arc<BooksState>>,
    JsonObject(payload): JsonObject,
) -> Result<(StatusCode, Json<BookCreatedResponse>), ApiError> {
    let cmd = validate_create_book(&payload)?;

    let book_id = execute_create_book(&state.service_deps, cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookCreatedResponse {
            book_id: book_id.value(),
        }),
    ))
}

/// GET /books/:id
pub async fn get_book(
    State(state): State<Arc<BooksState>>,
    Path(id): Path<String>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = execute_get_book(&state.service_deps, &id).await?;
    Ok(Json(BookResponse::from(book)))
}

/// PUT /books/:id - 書籍を全項目で置き換える
///
/// 6項目すべてが必須。タイトルが変わった場合は評価のタイトルも同期される。
pub async fn update_book(
    State(state): State<Arc<BooksState>>,
    Path(id): Path<String>,
    JsonObject(payload): JsonObject,
) -> Result<Json<SuccessResponse>, ApiError> {
    let cmd = validate_update_book(&payload)?;

    execute_update_book(&state.service_deps, &id, cmd).await?;

    Ok(Json(SuccessResponse::new(format!(
        "Book with ID={} has been successfully updated",
        id
    ))))
}

/// DELETE /books/:id - 書籍と対になる評価を削除
pub async fn delete_book(
    State(state): State<Arc<BooksState>>,
    Path(id): Path<String>,
) -> Result<Json<SuccessResponse>, ApiError> {
    execute_delete_book(&state.service_deps, &id).await?;

    Ok(Json(SuccessResponse::new(format!(
        "Book with ID={} has been successfully deleted",
        id
    ))))
}

/// GET /books/isbn/:isbn - 貸出サービス向けの内部ルックアップ
///
/// 共有シークレットの確認はミドルウェアで行う。該当なしは `{}`。
pub async fn lookup_book_by_isbn(
    State(state): State<Arc<BooksState>>,
    Path(isbn): Path<String>,
) -> Result<Json<BookLookupResponse>, ApiError> {
    let book = execute_lookup_by_isbn(&state.service_deps, &isbn).await?;

    let response = book
        .map(|book| BookLookupResponse {
            title: Some(book.title),
            id: Some(book.id.value()),
        })
        .unwrap_or_default();

    Ok(Json(response))
}
