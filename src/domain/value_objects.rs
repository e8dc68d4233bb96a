use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

/// 書籍ID - カタログの集約ID
///
/// 評価（Rating）も同じ値をIDとして使う（1:1の対応を構築時に保証する）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(Uuid);

impl BookId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }

    /// パスパラメータからのパース
    ///
    /// UUIDとして解釈できない文字列は「存在しないID」と同じ扱いになるため、
    /// 呼び出し側はNoneを404にマッピングする。
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl Default for BookId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// 貸出ID - 貸出管理コンテキストの集約ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LoanId(Uuid);

impl LoanId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn value(&self) -> Uuid {
        self.0
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(Self)
    }
}

impl Default for LoanId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// ISBNエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IsbnError {
    /// 13桁の数字ではない
    #[error("ISBN must be a string of 13 digits")]
    InvalidFormat,
}

/// ISBN
///
/// 不変条件：ASCII数字ちょうど13桁。
/// 型システムでこの制約を強制し、不正な値を作成できないようにする。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Isbn(String);

impl Isbn {
    pub const LENGTH: usize = 13;

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 文字列がISBNの形式を満たすか
    pub fn is_valid(raw: &str) -> bool {
        raw.len() == Self::LENGTH && raw.bytes().all(|b| b.is_ascii_digit())
    }
}

impl TryFrom<String> for Isbn {
    type Error = IsbnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if !Self::is_valid(&value) {
            return Err(IsbnError::InvalidFormat);
        }
        Ok(Self(value))
    }
}

impl FromStr for Isbn {
    type Err = IsbnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl From<Isbn> for String {
    fn from(isbn: Isbn) -> Self {
        isbn.0
    }
}

impl fmt::Display for Isbn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// ジャンル
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Genre {
    Fiction,
    Children,
    Biography,
    Science,
    ScienceFiction,
    Fantasy,
    Other,
}

impl Genre {
    pub const ALL: [Genre; 7] = [
        Genre::Fiction,
        Genre::Children,
        Genre::Biography,
        Genre::Science,
        Genre::ScienceFiction,
        Genre::Fantasy,
        Genre::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "Fiction",
            Genre::Children => "Children",
            Genre::Biography => "Biography",
            Genre::Science => "Science",
            Genre::ScienceFiction => "Science Fiction",
            Genre::Fantasy => "Fantasy",
            Genre::Other => "Other",
        }
    }
}

impl FromStr for Genre {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Genre::ALL
            .into_iter()
            .find(|genre| genre.as_str() == s)
            .ok_or_else(|| format!("Invalid genre: {}", s))
    }
}

impl TryFrom<String> for Genre {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Genre> for String {
    fn from(genre: Genre) -> Self {
        genre.as_str().to_string()
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_isbn_accepts_thirteen_digits() {
        let isbn: Isbn = "9780134685991".parse().unwrap();
        assert_eq!(isbn.as_str(), "9780134685991");
    }

    #[test]
    fn test_isbn_rejects_wrong_length_and_non_digits() {
        assert_eq!("978013468599".parse::<Isbn>(), Err(IsbnError::InvalidFormat));
        assert_eq!("97801346859911".parse::<Isbn>(), Err(IsbnError::InvalidFormat));
        assert_eq!("978013468599X".parse::<Isbn>(), Err(IsbnError::InvalidFormat));
        // 全角や他の文字体系の数字は受け付けない
        assert!(!Isbn::is_valid("٩٧٨٠١٣٤٦٨٥٩٩١"));
    }

    #[test]
    fn test_isbn_error_is_boxable_with_message() {
        let err: Box<dyn std::error::Error + Send + Sync> =
            Box::new("123".parse::<Isbn>().unwrap_err());
        assert_eq!(err.to_string(), "ISBN must be a string of 13 digits");
    }

    #[test]
    fn test_genre_round_trips_display_names() {
        for genre in Genre::ALL {
            assert_eq!(genre.as_str().parse::<Genre>(), Ok(genre));
        }
        assert_eq!(
            "Science Fiction".parse::<Genre>(),
            Ok(Genre::ScienceFiction)
        );
        assert!("science".parse::<Genre>().is_err());
    }

    #[test]
    fn test_book_id_parse_rejects_garbage() {
        assert!(BookId::parse("not-a-uuid").is_none());
        let id = BookId::new();
        assert_eq!(BookId::parse(&id.to_string()), Some(id));
    }

    #[test]
    fn test_loan_id_creation() {
        let id1 = LoanId::new();
        let id2 = LoanId::new();
        assert_ne!(id1, id2);
    }
}
