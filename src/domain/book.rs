use serde::{Deserialize, Serialize};

use super::{
    BookId, Genre, Isbn, RatingValueError,
    commands::{CreateBook, UpdateBook},
    query::Filterable,
};

/// メタデータが取得できなかった項目に入るプレースホルダ
pub const MISSING: &str = "missing";

/// ランキング対象となる最小の評価件数
pub const MIN_VALUES_FOR_RANKING: usize = 3;

// ============================================================================
// 書籍
// ============================================================================

/// Book集約
///
/// authors / publisher / published_date は登録時に外部メタデータから
/// 補完され、以後はPUTによる全項目置換でのみ変更される。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub isbn: Isbn,
    pub genre: Genre,
    pub authors: String,
    pub publisher: String,
    pub published_date: String,
}

impl Filterable for Book {
    fn field_value(&self, field: &str) -> Option<String> {
        match field {
            "id" => Some(self.id.to_string()),
            "title" => Some(self.title.clone()),
            "ISBN" => Some(self.isbn.to_string()),
            "genre" => Some(self.genre.to_string()),
            "authors" => Some(self.authors.clone()),
            "publisher" => Some(self.publisher.clone()),
            "publishedDate" => Some(self.published_date.clone()),
            _ => None,
        }
    }
}

/// 外部メタデータ（書誌情報プロバイダの応答）
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookMetadata {
    pub authors: Option<Vec<String>>,
    pub publisher: Option<String>,
    pub published_date: Option<String>,
}

/// 著者リストを人間向けの文字列に結合する
///
/// ["A", "B", "C"] → "A and B and C"。空リストは "missing" として扱う。
pub fn join_authors(authors: &[String]) -> String {
    if authors.is_empty() {
        return MISSING.to_string();
    }
    authors.join(" and ")
}

/// 純粋関数：書籍を登録する
///
/// ビジネスルール：
/// - IDは新規に採番する
/// - 取得できなかったメタデータ項目は "missing"
/// - 評価は同じIDで values=[]、average=0 として対になる
///
/// 副作用なし。新しいBookと対になるRatingを返す。
pub fn register_book(cmd: CreateBook, metadata: BookMetadata) -> (Book, Rating) {
    let book = Book {
        id: BookId::new(),
        title: cmd.title,
        isbn: cmd.isbn,
        genre: cmd.genre,
        authors: metadata
            .authors
            .as_deref()
            .map(join_authors)
            .unwrap_or_else(|| MISSING.to_string()),
        publisher: metadata.publisher.unwrap_or_else(|| MISSING.to_string()),
        published_date: metadata
            .published_date
            .unwrap_or_else(|| MISSING.to_string()),
    };
    let rating = Rating::for_book(&book);

    (book, rating)
}

/// 純粋関数：書籍を全項目で置き換える
///
/// IDだけは不変。タイトルが変わったかどうかを合わせて返す。
pub fn replace_book(existing: &Book, cmd: UpdateBook) -> (Book, bool) {
    let title_changed = existing.title != cmd.title;
    let book = Book {
        id: existing.id,
        title: cmd.title,
        isbn: cmd.isbn,
        genre: cmd.genre,
        authors: cmd.authors,
        publisher: cmd.publisher,
        published_date: cmd.published_date,
    };

    (book, title_changed)
}

// ============================================================================
// 評価
// ============================================================================

/// 評価値
///
/// 不変条件：1〜5の整数。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct RatingValue(u8);

impl RatingValue {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for RatingValue {
    type Error = RatingValueError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(RatingValueError::OutOfRange(value));
        }
        Ok(Self(value as u8))
    }
}

impl From<RatingValue> for i64 {
    fn from(value: RatingValue) -> Self {
        i64::from(value.0)
    }
}

/// Rating集約
///
/// idは対応するBookと同じ値。titleはBook.titleの非正規化コピーで、
/// 書籍更新時に同期される。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: BookId,
    pub title: String,
    pub values: Vec<u8>,
    pub average: f64,
}

impl Rating {
    /// 新規書籍に対応する空の評価
    pub fn for_book(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            values: Vec::new(),
            average: 0.0,
        }
    }

    /// 評価値を追加し、平均を再計算した新しいRatingを返す
    pub fn with_value(mut self, value: RatingValue) -> Self {
        self.values.push(value.value());
        self.average = average_of(&self.values);
        self
    }

    /// タイトルを書籍に合わせる
    pub fn retitled(self, title: &str) -> Self {
        Self {
            title: title.to_string(),
            ..self
        }
    }

    pub fn is_rankable(&self) -> bool {
        self.values.len() >= MIN_VALUES_FOR_RANKING
    }
}

/// 算術平均を小数第2位で丸める。空なら0。
pub fn average_of(values: &[u8]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let sum: u32 = values.iter().map(|v| u32::from(*v)).sum();
    let mean = f64::from(sum) / values.len() as f64;
    (mean * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_cmd() -> CreateBook {
        CreateBook {
            title: "Clean Code".to_string(),
            isbn: "9780132350884".parse().unwrap(),
            genre: Genre::Science,
        }
    }

    #[test]
    fn test_join_authors() {
        assert_eq!(join_authors(&["A".to_string()]), "A");
        assert_eq!(
            join_authors(&["A".to_string(), "B".to_string(), "C".to_string()]),
            "A and B and C"
        );
        assert_eq!(join_authors(&[]), MISSING);
    }

    #[test]
    fn test_register_book_pairs_rating_with_same_id() {
        let metadata = BookMetadata {
            authors: Some(vec!["Robert C. Martin".to_string()]),
            publisher: Some("Pearson".to_string()),
            published_date: Some("2008-08-01".to_string()),
        };

        let (book, rating) = register_book(create_cmd(), metadata);

        assert_eq!(rating.id, book.id);
        assert_eq!(rating.title, book.title);
        assert!(rating.values.is_empty());
        assert_eq!(rating.average, 0.0);
        assert_eq!(book.authors, "Robert C. Martin");
        assert_eq!(book.publisher, "Pearson");
        assert_eq!(book.published_date, "2008-08-01");
    }

    #[test]
    fn test_register_book_fills_missing_metadata() {
        let (book, _) = register_book(create_cmd(), BookMetadata::default());

        assert_eq!(book.authors, MISSING);
        assert_eq!(book.publisher, MISSING);
        assert_eq!(book.published_date, MISSING);
    }

    #[test]
    fn test_replace_book_keeps_id_and_reports_title_change() {
        let (book, _) = register_book(create_cmd(), BookMetadata::default());
        let cmd = UpdateBook {
            title: "Clean Code (2nd)".to_string(),
            isbn: book.isbn.clone(),
            genre: Genre::Other,
            authors: "Robert C. Martin".to_string(),
            publisher: "Pearson".to_string(),
            published_date: "2008".to_string(),
        };

        let (updated, title_changed) = replace_book(&book, cmd);

        assert_eq!(updated.id, book.id);
        assert_eq!(updated.genre, Genre::Other);
        assert!(title_changed);
    }

    #[test]
    fn test_rating_average_is_rounded_to_two_decimals() {
        let (book, rating) = register_book(create_cmd(), BookMetadata::default());
        assert_eq!(rating.id, book.id);

        let rating = [4i64, 5, 5]
            .into_iter()
            .map(|v| RatingValue::try_from(v).unwrap())
            .fold(rating, Rating::with_value);

        assert_eq!(rating.values, vec![4, 5, 5]);
        assert_eq!(rating.average, 4.67);
    }

    #[test]
    fn test_rating_value_range() {
        assert!(RatingValue::try_from(1i64).is_ok());
        assert!(RatingValue::try_from(5i64).is_ok());
        assert_eq!(
            RatingValue::try_from(6i64),
            Err(RatingValueError::OutOfRange(6))
        );
        assert_eq!(
            RatingValue::try_from(0i64),
            Err(RatingValueError::OutOfRange(0))
        );
    }

    #[test]
    fn test_rating_value_error_message() {
        let err = RatingValue::try_from(9i64).unwrap_err();
        assert_eq!(err.to_string(), "rating value 9 is outside 1..=5");
    }

    #[test]
    fn test_average_of_empty_is_zero() {
        assert_eq!(average_of(&[]), 0.0);
        assert_eq!(average_of(&[3]), 3.0);
        assert_eq!(average_of(&[1, 2]), 1.5);
    }
}
