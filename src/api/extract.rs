use crate::domain::validation::ValidationErrors;
use axum::{
    Json, async_trait,
    extract::{FromRequest, Request},
};
use serde_json::{Map, Value};

use super::error::ApiError;

/// JSONオブジェクトのリクエストボディ
///
/// フィールドごとの検証は規則表で行うため、型付きの構造体ではなく
/// 生のオブジェクトとして受け取る。Content-TypeがJSONでなければ415。
#[derive(Debug, Clone)]
pub struct JsonObject(pub Map<String, Value>);

#[async_trait]
impl<S> FromRequest<S> for JsonObject
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(req, state).await?;

        match body {
            Value::Object(map) => Ok(JsonObject(map)),
            _ => Err(ApiError::Validation(ValidationErrors::single(
                "Request body must be a JSON object",
            ))),
        }
    }
}
