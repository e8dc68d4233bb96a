use thiserror::Error;

/// 評価値のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RatingValueError {
    /// 1〜5の範囲外
    #[error("rating value {0} is outside 1..=5")]
    OutOfRange(i64),
}
