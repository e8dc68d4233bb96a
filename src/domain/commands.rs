use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Genre, Isbn, RatingValue};

/// コマンド：書籍を登録する
///
/// authors / publisher / publishedDate は外部メタデータから補完される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateBook {
    pub title: String,
    pub isbn: Isbn,
    pub genre: Genre,
}

/// コマンド：書籍を全項目で置き換える（PUT）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateBook {
    pub title: String,
    pub isbn: Isbn,
    pub genre: Genre,
    pub authors: String,
    pub publisher: String,
    pub published_date: String,
}

/// コマンド：評価値を追加する
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRatingValue {
    pub value: RatingValue,
}

/// コマンド：書籍を貸し出す
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateLoan {
    pub member_name: String,
    pub isbn: Isbn,
    pub loan_date: NaiveDate,
}
