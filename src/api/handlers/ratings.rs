use crate::application::book::{
    add_rating_value as execute_add_rating_value, get_rating as execute_get_rating,
    list_ratings as execute_list_ratings, top_rated as execute_top_rated,
};
use crate::domain::validation::validate_rating_value;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;

use super::BooksState;
use crate::api::{
    error::ApiError,
    extract::JsonObject,
    types::{AverageResponse, RatingResponse, TopRatedResponse},
};

/// GET /ratings
pub async fn list_ratings(
    State(state): State<Arc<BooksState>>,
) -> Result<Json<Vec<RatingResponse>>, ApiError> {
    let ratings = execute_list_ratings(&state.service_deps).await?;
    Ok(Json(ratings.into_iter().map(RatingResponse::from).collect()))
}

/// GET /ratings/:id
pub async fn get_rating(
    State(state): State<Arc<BooksState>>,
    Path(id): Path<String>,
) -> Result<Json<RatingResponse>, ApiError> {
    let rating = execute_get_rating(&state.service_deps, &id).await?;
    Ok(Json(RatingResponse::from(rating)))
}

/// POST /ratings/:id/values - 評価値を追加して新しい平均を返す
pub async fn add_rating_value(
    State(state): State<Arc<BooksState>>,
    Path(id): Path<String>,
    JsonObject(payload): JsonObject,
) -> Result<(StatusCode, Json<AverageResponse>), ApiError> {
    let cmd = validate_rating_value(&payload)?;

    let average = execute_add_rating_value(&state.service_deps, &id, cmd).await?;

    Ok((StatusCode::CREATED, Json(AverageResponse { average })))
}

/// GET /top - 評価上位のスコア帯に属する書籍
pub async fn top_rated(
    State(state): State<Arc<BooksState>>,
) -> Result<Json<Vec<TopRatedResponse>>, ApiError> {
    let top = execute_top_rated(&state.service_deps).await?;
    Ok(Json(top.into_iter().map(TopRatedResponse::from).collect()))
}
