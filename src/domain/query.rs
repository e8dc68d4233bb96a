use std::collections::BTreeMap;

use super::validation::is_full_date;

/// フィルタ可能なレコード
///
/// `field` は正規化済みの項目名（`ISBN`, `id`, `publishedDate` など）。
/// 値はレスポンスに現れる文字列表現で返す。
pub trait Filterable {
    fn field_value(&self, field: &str) -> Option<String>;
}

/// 項目名の別名を正規の名前に寄せる
///
/// 大文字小文字違いの同じ論理項目を1つのキーにまとめる。
pub fn canonical_field(name: &str) -> &str {
    match name {
        "isbn" => "ISBN",
        "ID" => "id",
        other => other,
    }
}

/// publishedDate の一致判定
///
/// 完全一致、または保存値が `YYYY-MM-DD` でクエリがその年4桁の場合に一致する。
pub fn published_date_matches(stored: &str, query: &str) -> bool {
    if stored == query {
        return true;
    }
    query.len() == 4 && is_full_date(stored) && stored.starts_with(query)
}

/// 1レコードが1項目・1値に一致するか
pub fn matches_field<T: Filterable>(record: &T, field: &str, value: &str) -> bool {
    let field = canonical_field(field);
    match record.field_value(field) {
        Some(stored) if field == "publishedDate" => published_date_matches(&stored, value),
        Some(stored) => stored == value,
        None => false,
    }
}

/// 1項目・1値でレコードを絞り込む
pub fn filter<T: Filterable>(records: Vec<T>, field: &str, value: &str) -> Vec<T> {
    records
        .into_iter()
        .filter(|record| matches_field(record, field, value))
        .collect()
}

/// フィルタ条件
///
/// 同じ項目の複数値はOR、異なる項目はAND。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    fields: BTreeMap<String, Vec<String>>,
}

impl FilterCriteria {
    /// クエリのペア列から条件を組み立てる（別名はここで正規化される）
    pub fn from_pairs(pairs: &[(String, String)]) -> Self {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in pairs {
            let values = fields.entry(canonical_field(name).to_string()).or_default();
            if !values.contains(value) {
                values.push(value.clone());
            }
        }
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// 指定項目の値（正規名で引く）
    pub fn values(&self, field: &str) -> Option<&[String]> {
        self.fields.get(canonical_field(field)).map(Vec::as_slice)
    }

    /// 条件に一致するレコードだけを残す
    ///
    /// 項目ごとに述語を畳み込む。すべてAND結合なので順序は結果に影響しない。
    pub fn apply<T: Filterable>(&self, records: Vec<T>) -> Vec<T> {
        self.fields.iter().fold(records, |remaining, (field, values)| {
            remaining
                .into_iter()
                .filter(|record| {
                    values
                        .iter()
                        .any(|value| matches_field(record, field, value))
                })
                .collect()
        })
    }
}
