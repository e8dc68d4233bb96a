use crate::application::{book::BookApplicationError, loan::LoanApplicationError};
use crate::domain::validation::ValidationErrors;
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーと、リクエストの受理段階のエラーをまとめ、
/// HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    Book(BookApplicationError),
    Loan(LoanApplicationError),
    /// ボディやクエリの検証エラー
    Validation(ValidationErrors),
    /// Content-TypeがJSONでない
    UnsupportedMediaType,
    /// ボディがJSONとして解釈できない
    MalformedBody(String),
    /// 内部ルックアップの共有シークレットが一致しない
    Forbidden,
}

impl From<BookApplicationError> for ApiError {
    fn from(err: BookApplicationError) -> Self {
        ApiError::Book(err)
    }
}

impl From<LoanApplicationError> for ApiError {
    fn from(err: LoanApplicationError) -> Self {
        ApiError::Loan(err)
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        ApiError::Validation(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::MissingJsonContentType(_) => ApiError::UnsupportedMediaType,
            other => ApiError::MalformedBody(other.body_text()),
        }
    }
}

fn book_status(err: &BookApplicationError) -> StatusCode {
    match err {
        // 404 Not Found - リクエストされたリソースが存在しない
        BookApplicationError::BookNotFound(_) | BookApplicationError::RatingNotFound(_) => {
            StatusCode::NOT_FOUND
        }

        // 422 Unprocessable Entity - 検証エラー・ビジネスルール違反
        BookApplicationError::Validation(_) | BookApplicationError::DuplicateIsbn => {
            StatusCode::UNPROCESSABLE_ENTITY
        }

        // 400 Bad Request - メタデータプロバイダに該当なし
        BookApplicationError::MetadataNotFound => StatusCode::BAD_REQUEST,

        // 500 Internal Server Error - ストア・外部サービスの障害
        BookApplicationError::MetadataUnreachable(_)
        | BookApplicationError::BookStoreError(_)
        | BookApplicationError::RatingStoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn loan_status(err: &LoanApplicationError) -> StatusCode {
    match err {
        LoanApplicationError::LoanNotFound(_) => StatusCode::NOT_FOUND,

        LoanApplicationError::Validation(_)
        | LoanApplicationError::BookNotFound
        | LoanApplicationError::BookAlreadyOnLoan
        | LoanApplicationError::LoanLimitExceeded => StatusCode::UNPROCESSABLE_ENTITY,

        LoanApplicationError::BookServiceError(_) | LoanApplicationError::LoanStoreError(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Book(ref e) => (book_status(e), e.to_string()),
            ApiError::Loan(ref e) => (loan_status(e), e.to_string()),
            ApiError::Validation(ref e) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ApiError::UnsupportedMediaType => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Unsupported media type. Only JSON data is supported.".to_string(),
            ),
            ApiError::MalformedBody(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Forbidden: Invalid API key".to_string(),
            ),
        };

        // ストアや外部サービスの障害は原因ごとクライアントに返し、ログにも残す
        if status.is_server_error() {
            tracing::error!(%status, error = %message, "request failed");
        }

        (status, Json(ErrorResponse::new(message))).into_response()
    }
}
