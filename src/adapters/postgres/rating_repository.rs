use crate::domain::{BookId, Rating, RatingValue};
use crate::ports::rating_repository::{RatingRepository as RatingRepositoryTrait, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::invalid_data;

/// PostgreSQLの行データをRatingに変換する
///
/// 評価値はINTEGER[]で保存されている。1〜5の範囲外の値は不正データとして扱う。
fn map_row_to_rating(row: &PgRow) -> Result<Rating> {
    let stored: Vec<i32> = row.get("rating_values");
    let values = stored
        .into_iter()
        .map(|v| {
            u8::try_from(v)
                .ok()
                .filter(|v| (1..=5).contains(v))
                .ok_or_else(|| invalid_data(format!("rating value out of range: {}", v)))
        })
        .collect::<Result<Vec<u8>>>()?;

    Ok(Rating {
        id: BookId::from_uuid(row.get("id")),
        title: row.get("title"),
        values,
        average: row.get("average"),
    })
}

fn to_column(values: &[u8]) -> Vec<i32> {
    values.iter().map(|v| i32::from(*v)).collect()
}

/// RatingRepositoryのPostgreSQL実装
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    /// PostgreSQLコネクションプールから新しいRatingRepositoryを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepositoryTrait for RatingRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Rating>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, rating_values, average
            FROM ratings
            WHERE id = $1
            "#,
        )
        .bind(id.value())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(map_row_to_rating).transpose()
    }

    async fn list(&self) -> Result<Vec<Rating>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, rating_values, average
            FROM ratings
            ORDER BY seq ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(map_row_to_rating).collect()
    }

    async fn insert(&self, rating: &Rating) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO ratings (id, title, rating_values, average)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(rating.id.value())
        .bind(&rating.title)
        .bind(to_column(&rating.values))
        .bind(rating.average)
        .execute(&self.pool)
        .await?;

        tracing::debug!(rating_id = %rating.id, "rating row inserted");
        Ok(())
    }

    async fn retitle(&self, id: BookId, title: &str) -> Result<bool> {
        let result = sqlx::query("UPDATE ratings SET title = $2 WHERE id = $1")
            .bind(id.value())
            .bind(title)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// 行ロック（FOR UPDATE）を取ってから値を追加する
    ///
    /// 同じ評価への並行する追加はロックの解放まで待たされる。
    async fn append_value(&self, id: BookId, value: RatingValue) -> Result<Option<Rating>> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query(
            r#"
            SELECT id, title, rating_values, average
            FROM ratings
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.value())
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let rating = map_row_to_rating(&row)?.with_value(value);

        sqlx::query(
            r#"
            UPDATE ratings
            SET rating_values = $2,
                average = $3
            WHERE id = $1
            "#,
        )
        .bind(rating.id.value())
        .bind(to_column(&rating.values))
        .bind(rating.average)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(rating_id = %rating.id, count = rating.values.len(), "rating value appended");
        Ok(Some(rating))
    }

    async fn delete(&self, id: BookId) -> Result<bool> {
        let result = sqlx::query("DELETE FROM ratings WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
