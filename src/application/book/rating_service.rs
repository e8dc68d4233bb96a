use crate::domain::{
    BookId, Rating,
    commands::AddRatingValue,
    ranking::{self, TopRatedBook},
};

use super::book_service::ServiceDependencies;
use super::errors::{BookApplicationError, Result};

/// IDで評価を取得する
pub async fn get_rating(deps: &ServiceDependencies, id: &str) -> Result<Rating> {
    let rating_id =
        BookId::parse(id).ok_or_else(|| BookApplicationError::RatingNotFound(id.to_string()))?;

    deps.rating_repository
        .find_by_id(rating_id)
        .await
        .map_err(BookApplicationError::RatingStoreError)?
        .ok_or_else(|| BookApplicationError::RatingNotFound(id.to_string()))
}

/// 全評価を取得する
pub async fn list_ratings(deps: &ServiceDependencies) -> Result<Vec<Rating>> {
    deps.rating_repository
        .list()
        .await
        .map_err(BookApplicationError::RatingStoreError)
}

/// 評価値を追加する
///
/// 値を末尾に追加し、平均を再計算する。追加はストア側で原子的に行われるため、
/// 同じ評価への並行する追加も失われない。書籍側には何も反映しない。
///
/// # 戻り値
/// 更新後の平均値
pub async fn add_rating_value(
    deps: &ServiceDependencies,
    id: &str,
    cmd: AddRatingValue,
) -> Result<f64> {
    let rating_id =
        BookId::parse(id).ok_or_else(|| BookApplicationError::RatingNotFound(id.to_string()))?;

    let rating = deps
        .rating_repository
        .append_value(rating_id, cmd.value)
        .await
        .map_err(BookApplicationError::RatingStoreError)?
        .ok_or_else(|| BookApplicationError::RatingNotFound(id.to_string()))?;

    tracing::debug!(rating_id = %rating.id, average = rating.average, "rating value added");
    Ok(rating.average)
}

/// 評価上位の書籍を取得する
pub async fn top_rated(deps: &ServiceDependencies) -> Result<Vec<TopRatedBook>> {
    let ratings = list_ratings(deps).await?;
    Ok(ranking::top_rated(&ratings))
}
