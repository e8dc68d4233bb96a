//! Declarative per-field validation for request payloads and list-query parameters.
//!
//! Every violation in a request is collected and reported together, joined with `"; "`.
//! Rules are plain data tables; evaluation is a pure function of the input and the table.

use chrono::NaiveDate;
use regex::Regex;
use serde_json::{Map, Value};
use std::sync::LazyLock;
use thiserror::Error;

use super::{
    Genre, Isbn, MISSING, RatingValue,
    commands::{AddRatingValue, CreateBook, CreateLoan, UpdateBook},
    loan::LOAN_DATE_FORMAT,
    query::FilterCriteria,
};

static YEAR_OR_FULL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}(-[0-9]{2}-[0-9]{2})?$").expect("valid regex"));

static FULL_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid regex"));

/// `YYYY` または `YYYY-MM-DD`
pub fn is_year_or_full_date(value: &str) -> bool {
    YEAR_OR_FULL_DATE.is_match(value)
}

/// `YYYY-MM-DD`
pub fn is_full_date(value: &str) -> bool {
    FULL_DATE.is_match(value)
}

/// 検証エラー
///
/// 1リクエスト分の違反をまとめて保持する。表示時は "; " で結合される。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join("; "))]
pub struct ValidationErrors(pub Vec<String>);

impl ValidationErrors {
    pub fn single(message: impl Into<String>) -> Self {
        Self(vec![message.into()])
    }

    pub fn violations(&self) -> &[String] {
        &self.0
    }
}

// ============================================================================
// ルール定義
// ============================================================================

/// 値に対する規則の種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// 空でない文字列
    NonEmptyString,
    /// 13桁の数字文字列
    Isbn,
    /// 列挙されたジャンルのいずれか
    Genre,
    /// `YYYY` または `YYYY-MM-DD`
    PublishedDate,
    /// `YYYY-MM-DD` かつ暦上有効な日付
    LoanDate,
    /// 範囲内の整数（bool・小数は不可）
    IntegerInRange { min: i64, max: i64 },
}

impl RuleKind {
    /// 文字列値（クエリパラメータ、あるいはJSON文字列）に対する判定
    pub fn accepts_str(&self, value: &str) -> bool {
        match self {
            RuleKind::NonEmptyString => !value.is_empty(),
            RuleKind::Isbn => Isbn::is_valid(value),
            RuleKind::Genre => value.parse::<Genre>().is_ok(),
            RuleKind::PublishedDate => is_year_or_full_date(value),
            RuleKind::LoanDate => {
                is_full_date(value) && NaiveDate::parse_from_str(value, LOAN_DATE_FORMAT).is_ok()
            }
            RuleKind::IntegerInRange { min, max } => value
                .parse::<i64>()
                .is_ok_and(|n| (*min..=*max).contains(&n)),
        }
    }

    /// JSON値に対する判定（型チェックを含む）
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (RuleKind::IntegerInRange { min, max }, Value::Number(n)) => {
                n.as_i64().is_some_and(|n| (*min..=*max).contains(&n))
            }
            (RuleKind::IntegerInRange { .. }, _) => false,
            (_, Value::String(s)) => self.accepts_str(s),
            _ => false,
        }
    }
}

/// ペイロードの1項目に対する規則
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    /// 同じ項目として受け付ける別名
    pub aliases: &'static [&'static str],
    pub kind: RuleKind,
    pub message: &'static str,
}

impl FieldRule {
    fn lookup<'a>(&self, payload: &'a Map<String, Value>) -> Option<&'a Value> {
        std::iter::once(self.field)
            .chain(self.aliases.iter().copied())
            .find_map(|name| payload.get(name))
            .filter(|value| !value.is_null())
    }

    fn text(&self, payload: &Map<String, Value>) -> Result<String, ValidationErrors> {
        self.lookup(payload)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ValidationErrors::single(self.message))
    }
}

/// クエリパラメータ1種類に対する規則
#[derive(Debug, Clone, Copy)]
pub struct QueryRule {
    /// このルールが適用されるパラメータ名（別名を含む）
    pub params: &'static [&'static str],
    pub kind: RuleKind,
    /// リテラル "missing" を許容するか
    pub allow_missing: bool,
    pub message: &'static str,
}

const GENRE_MESSAGE: &str = "'genre' must be one of 'Fiction', 'Children', 'Biography', 'Science', \
'Science Fiction', 'Fantasy', or 'Other'";

const TITLE_RULE: FieldRule = FieldRule {
    field: "title",
    aliases: &[],
    kind: RuleKind::NonEmptyString,
    message: "'title' must be a non-empty string",
};

const ISBN_RULE: FieldRule = FieldRule {
    field: "ISBN",
    aliases: &["isbn"],
    kind: RuleKind::Isbn,
    message: "'ISBN' must be a string of 13 digits",
};

const GENRE_RULE: FieldRule = FieldRule {
    field: "genre",
    aliases: &[],
    kind: RuleKind::Genre,
    message: GENRE_MESSAGE,
};

const AUTHORS_RULE: FieldRule = FieldRule {
    field: "authors",
    aliases: &[],
    kind: RuleKind::NonEmptyString,
    message: "'authors' must be a non-empty string",
};

const PUBLISHER_RULE: FieldRule = FieldRule {
    field: "publisher",
    aliases: &[],
    kind: RuleKind::NonEmptyString,
    message: "'publisher' must be a non-empty string",
};

const PUBLISHED_DATE_RULE: FieldRule = FieldRule {
    field: "publishedDate",
    aliases: &[],
    kind: RuleKind::PublishedDate,
    message: "'publishedDate' must be a string of format YYYY or YYYY-MM-DD",
};

const RATING_VALUE_RULE: FieldRule = FieldRule {
    field: "value",
    aliases: &[],
    kind: RuleKind::IntegerInRange {
        min: RatingValue::MIN,
        max: RatingValue::MAX,
    },
    message: "Invalid rating value. Must be an integer between 1 and 5.",
};

const MEMBER_NAME_RULE: FieldRule = FieldRule {
    field: "memberName",
    aliases: &[],
    kind: RuleKind::NonEmptyString,
    message: "'memberName' must be a non-empty string",
};

const LOAN_DATE_RULE: FieldRule = FieldRule {
    field: "loanDate",
    aliases: &[],
    kind: RuleKind::LoanDate,
    message: "'loanDate' must be a valid date of format YYYY-MM-DD",
};

/// POST /books
pub const CREATE_BOOK_RULES: [FieldRule; 3] = [TITLE_RULE, ISBN_RULE, GENRE_RULE];

/// PUT /books/{id} - 全6項目が必須
pub const UPDATE_BOOK_RULES: [FieldRule; 6] = [
    TITLE_RULE,
    AUTHORS_RULE,
    ISBN_RULE,
    PUBLISHER_RULE,
    PUBLISHED_DATE_RULE,
    GENRE_RULE,
];

/// POST /ratings/{id}/values
pub const RATING_VALUE_RULES: [FieldRule; 1] = [RATING_VALUE_RULE];

/// POST /loans
pub const CREATE_LOAN_RULES: [FieldRule; 3] = [MEMBER_NAME_RULE, ISBN_RULE, LOAN_DATE_RULE];

/// GET /books
pub const BOOK_QUERY_RULES: [QueryRule; 7] = [
    QueryRule {
        params: &["id", "ID"],
        kind: RuleKind::NonEmptyString,
        allow_missing: false,
        message: "'ID' must be a non-empty string",
    },
    QueryRule {
        params: &["title"],
        kind: RuleKind::NonEmptyString,
        allow_missing: true,
        message: "'title' must have a value (including 'missing')",
    },
    QueryRule {
        params: &["authors"],
        kind: RuleKind::NonEmptyString,
        allow_missing: true,
        message: "'authors' must have a value (including 'missing')",
    },
    QueryRule {
        params: &["isbn", "ISBN"],
        kind: RuleKind::Isbn,
        allow_missing: true,
        message: "'ISBN' must be 13 digits or 'missing'",
    },
    QueryRule {
        params: &["genre"],
        kind: RuleKind::Genre,
        allow_missing: true,
        message: "'genre' must be either 'missing' or one of Fiction, Children, Biography, \
Science, Science Fiction, Fantasy, Other",
    },
    QueryRule {
        params: &["publisher"],
        kind: RuleKind::NonEmptyString,
        allow_missing: true,
        message: "'publisher' must have a value (including 'missing')",
    },
    QueryRule {
        params: &["publishedDate"],
        kind: RuleKind::PublishedDate,
        allow_missing: true,
        message: "'publishedDate' must be of format YYYY or YYYY-MM-DD, or 'missing'",
    },
];

/// GET /loans
pub const LOAN_QUERY_RULES: [QueryRule; 5] = [
    QueryRule {
        params: &["memberName"],
        kind: RuleKind::NonEmptyString,
        allow_missing: false,
        message: "'memberName' must be a non-empty string",
    },
    QueryRule {
        params: &["isbn", "ISBN"],
        kind: RuleKind::Isbn,
        allow_missing: false,
        message: "'ISBN' must be 13 digits",
    },
    QueryRule {
        params: &["title"],
        kind: RuleKind::NonEmptyString,
        allow_missing: false,
        message: "'title' must be a non-empty string",
    },
    QueryRule {
        params: &["loanID"],
        kind: RuleKind::NonEmptyString,
        allow_missing: false,
        message: "'loanID' must be a non-empty string",
    },
    QueryRule {
        params: &["loanDate"],
        kind: RuleKind::LoanDate,
        allow_missing: false,
        message: "'loanDate' must be of format YYYY-MM-DD",
    },
];

// ============================================================================
// 評価
// ============================================================================

/// ペイロードを規則表で検証し、違反をすべて返す
///
/// 欠落している項目は "'<field>' is required"、値が不正な項目は規則のメッセージ。
pub fn validate(payload: &Map<String, Value>, rules: &[FieldRule]) -> Vec<String> {
    rules
        .iter()
        .filter_map(|rule| match rule.lookup(payload) {
            None => Some(format!("'{}' is required", rule.field)),
            Some(value) if !rule.kind.accepts(value) => Some(rule.message.to_string()),
            Some(_) => None,
        })
        .collect()
}

/// クエリパラメータを規則表で検証し、違反をすべて返す
///
/// 許可リスト外のパラメータ名があれば、値の検証より前にそれだけを報告する。
pub fn validate_query(params: &[(String, String)], rules: &[QueryRule]) -> Vec<String> {
    let mut unknown: Vec<&str> = Vec::new();
    for (name, _) in params {
        let known = rules.iter().any(|rule| rule.params.contains(&name.as_str()));
        if !known && !unknown.contains(&name.as_str()) {
            unknown.push(name);
        }
    }

    if !unknown.is_empty() {
        let allowed: Vec<&str> = rules.iter().flat_map(|rule| rule.params.iter().copied()).collect();
        return vec![format!(
            "Invalid query parameters: {}. Parameters allowed - {}",
            unknown.join(", "),
            allowed.join(", ")
        )];
    }

    rules
        .iter()
        .filter(|rule| {
            params
                .iter()
                .filter(|(name, _)| rule.params.contains(&name.as_str()))
                .any(|(_, value)| {
                    let missing_ok = rule.allow_missing && value == MISSING;
                    !missing_ok && !rule.kind.accepts_str(value)
                })
        })
        .map(|rule| rule.message.to_string())
        .collect()
}

fn ensure_valid(payload: &Map<String, Value>, rules: &[FieldRule]) -> Result<(), ValidationErrors> {
    let violations = validate(payload, rules);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

fn ensure_valid_query(
    params: &[(String, String)],
    rules: &[QueryRule],
) -> Result<(), ValidationErrors> {
    let violations = validate_query(params, rules);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(violations))
    }
}

fn isbn_of(payload: &Map<String, Value>) -> Result<Isbn, ValidationErrors> {
    ISBN_RULE
        .text(payload)?
        .parse()
        .map_err(|_| ValidationErrors::single(ISBN_RULE.message))
}

fn genre_of(payload: &Map<String, Value>) -> Result<Genre, ValidationErrors> {
    GENRE_RULE
        .text(payload)?
        .parse()
        .map_err(|_| ValidationErrors::single(GENRE_RULE.message))
}

// ============================================================================
// 型付きコマンドへの変換
// ============================================================================

/// POST /books のペイロードを検証してコマンドに変換する
pub fn validate_create_book(payload: &Map<String, Value>) -> Result<CreateBook, ValidationErrors> {
    ensure_valid(payload, &CREATE_BOOK_RULES)?;

    Ok(CreateBook {
        title: TITLE_RULE.text(payload)?,
        isbn: isbn_of(payload)?,
        genre: genre_of(payload)?,
    })
}

/// PUT /books/{id} のペイロードを検証してコマンドに変換する
///
/// 部分更新は受け付けない。欠落項目があれば値の検証より前にまとめて報告する。
pub fn validate_update_book(payload: &Map<String, Value>) -> Result<UpdateBook, ValidationErrors> {
    let missing: Vec<&str> = UPDATE_BOOK_RULES
        .iter()
        .filter(|rule| rule.lookup(payload).is_none())
        .map(|rule| rule.field)
        .collect();
    if !missing.is_empty() {
        return Err(ValidationErrors::single(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )));
    }

    ensure_valid(payload, &UPDATE_BOOK_RULES)?;

    Ok(UpdateBook {
        title: TITLE_RULE.text(payload)?,
        isbn: isbn_of(payload)?,
        genre: genre_of(payload)?,
        authors: AUTHORS_RULE.text(payload)?,
        publisher: PUBLISHER_RULE.text(payload)?,
        published_date: PUBLISHED_DATE_RULE.text(payload)?,
    })
}

/// POST /ratings/{id}/values
pub fn validate_rating_value(
    payload: &Map<String, Value>,
) -> Result<AddRatingValue, ValidationErrors> {
    ensure_valid(payload, &RATING_VALUE_RULES)?;

    let value = RATING_VALUE_RULE
        .lookup(payload)
        .and_then(Value::as_i64)
        .and_then(|n| RatingValue::try_from(n).ok())
        .ok_or_else(|| ValidationErrors::single(RATING_VALUE_RULE.message))?;

    Ok(AddRatingValue { value })
}

/// POST /loans
pub fn validate_create_loan(payload: &Map<String, Value>) -> Result<CreateLoan, ValidationErrors> {
    ensure_valid(payload, &CREATE_LOAN_RULES)?;

    let loan_date = NaiveDate::parse_from_str(&LOAN_DATE_RULE.text(payload)?, LOAN_DATE_FORMAT)
        .map_err(|_| ValidationErrors::single(LOAN_DATE_RULE.message))?;

    Ok(CreateLoan {
        member_name: MEMBER_NAME_RULE.text(payload)?,
        isbn: isbn_of(payload)?,
        loan_date,
    })
}

/// GET /books のクエリを検証してフィルタ条件に変換する
pub fn validate_book_query(params: &[(String, String)]) -> Result<FilterCriteria, ValidationErrors> {
    ensure_valid_query(params, &BOOK_QUERY_RULES)?;
    Ok(FilterCriteria::from_pairs(params))
}

/// GET /loans のクエリを検証してフィルタ条件に変換する
pub fn validate_loan_query(params: &[(String, String)]) -> Result<FilterCriteria, ValidationErrors> {
    ensure_valid_query(params, &LOAN_QUERY_RULES)?;
    Ok(FilterCriteria::from_pairs(params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected a JSON object"),
        }
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_create_book_valid_with_isbn_alias() {
        let payload = object(json!({
            "title": "Dune",
            "isbn": "9780441013593",
            "genre": "Science Fiction",
        }));

        let cmd = validate_create_book(&payload).unwrap();

        assert_eq!(cmd.title, "Dune");
        assert_eq!(cmd.isbn.as_str(), "9780441013593");
        assert_eq!(cmd.genre, Genre::ScienceFiction);
    }

    #[test]
    fn test_create_book_collects_all_violations() {
        let payload = object(json!({
            "title": 42,
            "ISBN": "123",
            "genre": "Poetry",
        }));

        let err = validate_create_book(&payload).unwrap_err();

        assert_eq!(err.violations().len(), 3);
        assert_eq!(
            err.to_string(),
            format!(
                "'title' must be a non-empty string; 'ISBN' must be a string of 13 digits; {}",
                GENRE_MESSAGE
            )
        );
    }

    #[test]
    fn test_create_book_reports_missing_fields() {
        let err = validate_create_book(&object(json!({ "title": "Dune" }))).unwrap_err();

        assert_eq!(
            err.violations(),
            ["'ISBN' is required", "'genre' is required"]
        );
    }

    #[test]
    fn test_creation_payload_does_not_accept_missing_literal() {
        let payload = object(json!({
            "title": "Dune",
            "ISBN": "missing",
            "genre": "missing",
        }));

        let err = validate_create_book(&payload).unwrap_err();
        assert_eq!(err.violations().len(), 2);
    }

    #[test]
    fn test_update_book_requires_all_six_fields() {
        let payload = object(json!({
            "title": "Dune",
            "ISBN": "9780441013593",
            "genre": "Fiction",
        }));

        let err = validate_update_book(&payload).unwrap_err();

        assert_eq!(
            err.to_string(),
            "Missing required fields: authors, publisher, publishedDate"
        );
    }

    #[test]
    fn test_update_book_validates_formats() {
        let payload = object(json!({
            "title": "Dune",
            "ISBN": "9780441013593",
            "genre": "Fiction",
            "authors": "",
            "publisher": "Chilton",
            "publishedDate": "1965-8",
        }));

        let err = validate_update_book(&payload).unwrap_err();

        assert_eq!(
            err.violations(),
            [
                "'authors' must be a non-empty string",
                "'publishedDate' must be a string of format YYYY or YYYY-MM-DD",
            ]
        );
    }

    #[test]
    fn test_update_book_accepts_year_only_date() {
        let payload = object(json!({
            "title": "Dune",
            "ISBN": "9780441013593",
            "genre": "Fiction",
            "authors": "Frank Herbert",
            "publisher": "Chilton",
            "publishedDate": "1965",
        }));

        let cmd = validate_update_book(&payload).unwrap();
        assert_eq!(cmd.published_date, "1965");
    }

    #[test]
    fn test_rating_value_rules() {
        assert!(validate_rating_value(&object(json!({ "value": 5 }))).is_ok());
        assert!(validate_rating_value(&object(json!({ "value": 6 }))).is_err());
        assert!(validate_rating_value(&object(json!({ "value": 0 }))).is_err());
        assert!(validate_rating_value(&object(json!({ "value": 4.5 }))).is_err());
        assert!(validate_rating_value(&object(json!({ "value": true }))).is_err());
        assert!(validate_rating_value(&object(json!({ "value": "3" }))).is_err());

        let err = validate_rating_value(&object(json!({}))).unwrap_err();
        assert_eq!(err.to_string(), "'value' is required");
    }

    #[test]
    fn test_create_loan_rejects_impossible_date() {
        let payload = object(json!({
            "memberName": "alice",
            "ISBN": "9780441013593",
            "loanDate": "2024-02-30",
        }));

        let err = validate_create_loan(&payload).unwrap_err();
        assert_eq!(
            err.violations(),
            ["'loanDate' must be a valid date of format YYYY-MM-DD"]
        );
    }

    #[test]
    fn test_create_loan_valid() {
        let payload = object(json!({
            "memberName": "alice",
            "isbn": "9780441013593",
            "loanDate": "2024-02-29",
        }));

        let cmd = validate_create_loan(&payload).unwrap();
        assert_eq!(cmd.member_name, "alice");
        assert_eq!(cmd.loan_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[test]
    fn test_query_rejects_unknown_parameters_first() {
        let params = pairs(&[("isbn", "bad"), ("color", "red"), ("size", "xl")]);

        let violations = validate_query(&params, &BOOK_QUERY_RULES);

        assert_eq!(violations.len(), 1);
        assert!(violations[0].starts_with("Invalid query parameters: color, size."));
    }

    #[test]
    fn test_query_allows_missing_literal_for_books() {
        let params = pairs(&[
            ("isbn", "missing"),
            ("genre", "missing"),
            ("publishedDate", "missing"),
            ("authors", "missing"),
        ]);

        assert!(validate_query(&params, &BOOK_QUERY_RULES).is_empty());
    }

    #[test]
    fn test_query_collects_value_violations() {
        let params = pairs(&[
            ("ISBN", "12345"),
            ("genre", "Poetry"),
            ("publishedDate", "14-03-2014"),
            ("title", ""),
        ]);

        let violations = validate_query(&params, &BOOK_QUERY_RULES);

        assert_eq!(violations.len(), 4);
        assert_eq!(violations[0], "'title' must have a value (including 'missing')");
    }

    #[test]
    fn test_loan_query_does_not_relax_missing() {
        let params = pairs(&[("isbn", "missing")]);

        let err = validate_loan_query(&params).unwrap_err();
        assert_eq!(err.to_string(), "'ISBN' must be 13 digits");
    }

    #[test]
    fn test_date_formats() {
        assert!(is_year_or_full_date("2014"));
        assert!(is_year_or_full_date("2014-03-01"));
        assert!(!is_year_or_full_date("2014-03"));
        assert!(is_full_date("2014-03-01"));
        assert!(!is_full_date("2014"));
    }
}
