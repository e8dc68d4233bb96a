use serde::{Deserialize, Serialize};

use super::{BookId, Rating};

/// 上位として扱うスコア帯（異なる平均値）の数
pub const TOP_TIERS: usize = 3;

/// 上位評価の1件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopRatedBook {
    pub id: BookId,
    pub title: String,
    pub average: f64,
}

/// 純粋関数：評価上位の書籍を求める
///
/// ビジネスルール：
/// - 評価件数が3件未満のものは対象外
/// - 対象の中で異なる平均値を大きい順に3つまで選ぶ（スコア帯）
/// - いずれかの帯に属する評価をすべて、平均の降順で返す
///
/// 「上位3」は件数ではなくスコア帯を指すため、同点があれば結果は3件を超える。
/// 同じ平均値の中では入力順を保つ。
pub fn top_rated(ratings: &[Rating]) -> Vec<TopRatedBook> {
    let mut qualifying: Vec<&Rating> = ratings.iter().filter(|r| r.is_rankable()).collect();
    if qualifying.is_empty() {
        return Vec::new();
    }

    let mut tiers: Vec<f64> = qualifying.iter().map(|r| r.average).collect();
    tiers.sort_by(|a, b| b.total_cmp(a));
    tiers.dedup();
    tiers.truncate(TOP_TIERS);

    qualifying.retain(|r| tiers.contains(&r.average));
    qualifying.sort_by(|a, b| b.average.total_cmp(&a.average));

    qualifying
        .into_iter()
        .map(|r| TopRatedBook {
            id: r.id,
            title: r.title.clone(),
            average: r.average,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::average_of;

    fn rating(title: &str, values: &[u8]) -> Rating {
        Rating {
            id: BookId::new(),
            title: title.to_string(),
            values: values.to_vec(),
            average: average_of(values),
        }
    }

    fn titles(top: &[TopRatedBook]) -> Vec<&str> {
        top.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn test_ties_expand_result_and_short_ratings_are_excluded() {
        let ratings = vec![
            rating("A", &[4, 4, 4]),
            rating("B", &[3, 4, 5]),
            rating("C", &[3, 3, 3]),
            rating("D", &[5, 5]),
        ];

        let top = top_rated(&ratings);

        assert_eq!(titles(&top), vec!["A", "B", "C"]);
        assert_eq!(top[0].average, 4.0);
        assert_eq!(top[2].average, 3.0);
    }

    #[test]
    fn test_only_three_distinct_tiers_are_kept() {
        let ratings = vec![
            rating("low", &[1, 1, 1]),
            rating("five", &[5, 5, 5]),
            rating("four", &[4, 4, 4]),
            rating("three", &[3, 3, 3]),
            rating("five-again", &[5, 5, 5, 5]),
        ];

        let top = top_rated(&ratings);

        assert_eq!(titles(&top), vec!["five", "five-again", "four", "three"]);
    }

    #[test]
    fn test_empty_when_nothing_qualifies() {
        let ratings = vec![rating("A", &[5, 5]), rating("B", &[])];
        assert!(top_rated(&ratings).is_empty());
        assert!(top_rated(&[]).is_empty());
    }

    #[test]
    fn test_fewer_than_three_tiers() {
        let ratings = vec![rating("A", &[2, 2, 2]), rating("B", &[2, 2, 2])];
        assert_eq!(titles(&top_rated(&ratings)), vec!["A", "B"]);
    }
}
