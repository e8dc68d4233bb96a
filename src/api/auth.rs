use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::{error::ApiError, handlers::BooksState};
use crate::adapters::http::books_api::API_KEY_HEADER;

/// 内部ルックアップの共有シークレットを確認するミドルウェア
///
/// `API-KEY` ヘッダーが設定値と一致しなければ403。鍵のローテーションや
/// 呼び出し元ごとの鍵はない。
pub async fn require_api_key(
    State(state): State<Arc<BooksState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let presented = request
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    if presented != Some(state.api_key.as_str()) {
        tracing::warn!(path = %request.uri().path(), "rejected internal lookup: invalid API key");
        return Err(ApiError::Forbidden);
    }

    Ok(next.run(request).await)
}
