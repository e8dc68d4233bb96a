use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Book, Rating, loan::Loan, ranking::TopRatedBook};

// ============================================================================
// 書籍
// ============================================================================

/// 書籍レスポンス（GET /books と GET /books/{id}）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookResponse {
    pub id: Uuid,
    pub title: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub genre: String,
    pub authors: String,
    pub publisher: String,
    #[serde(rename = "publishedDate")]
    pub published_date: String,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            id: book.id.value(),
            title: book.title,
            isbn: book.isbn.into(),
            genre: book.genre.as_str().to_string(),
            authors: book.authors,
            publisher: book.publisher,
            published_date: book.published_date,
        }
    }
}

/// 書籍作成レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookCreatedResponse {
    #[serde(rename = "bookID")]
    pub book_id: Uuid,
}

/// 内部ルックアップのレスポンス
///
/// 該当なしの場合は `{}`。
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookLookupResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
}

// ============================================================================
// 評価
// ============================================================================

/// 評価レスポンス（GET /ratings と GET /ratings/{id}）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingResponse {
    pub id: Uuid,
    pub title: String,
    pub values: Vec<u8>,
    pub average: f64,
}

impl From<Rating> for RatingResponse {
    fn from(rating: Rating) -> Self {
        Self {
            id: rating.id.value(),
            title: rating.title,
            values: rating.values,
            average: rating.average,
        }
    }
}

/// 評価値追加のレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AverageResponse {
    pub average: f64,
}

/// 評価上位のレスポンス（GET /top）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRatedResponse {
    pub id: Uuid,
    pub title: String,
    pub average: f64,
}

impl From<TopRatedBook> for TopRatedResponse {
    fn from(top: TopRatedBook) -> Self {
        Self {
            id: top.id.value(),
            title: top.title,
            average: top.average,
        }
    }
}

// ============================================================================
// 貸出
// ============================================================================

/// 貸出レスポンス（GET /loans と GET /loans/{id}）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanResponse {
    #[serde(rename = "loanID")]
    pub loan_id: Uuid,
    #[serde(rename = "memberName")]
    pub member_name: String,
    #[serde(rename = "ISBN")]
    pub isbn: String,
    #[serde(rename = "loanDate")]
    pub loan_date: String,
    pub title: String,
    #[serde(rename = "bookID")]
    pub book_id: Uuid,
}

impl From<Loan> for LoanResponse {
    fn from(loan: Loan) -> Self {
        Self {
            loan_id: loan.id.value(),
            member_name: loan.member_name,
            isbn: loan.isbn.into(),
            loan_date: loan
                .loan_date
                .format(crate::domain::loan::LOAN_DATE_FORMAT)
                .to_string(),
            title: loan.title,
            book_id: loan.book_id.value(),
        }
    }
}

/// 貸出作成レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanCreatedResponse {
    #[serde(rename = "loanID")]
    pub loan_id: Uuid,
}

// ============================================================================
// 共通
// ============================================================================

/// 更新・削除の成功レスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: message.into(),
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
