use crate::domain::{BookId, Rating, RatingValue};
use crate::ports::rating_repository::{RatingRepository as RatingRepositoryTrait, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::lock;

/// RatingRepositoryのインメモリ実装
#[derive(Default)]
pub struct RatingRepository {
    ratings: Mutex<Vec<Rating>>,
}

impl RatingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RatingRepositoryTrait for RatingRepository {
    async fn find_by_id(&self, id: BookId) -> Result<Option<Rating>> {
        let ratings = lock(&self.ratings, "ratings")?;
        Ok(ratings.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Rating>> {
        Ok(lock(&self.ratings, "ratings")?.clone())
    }

    async fn insert(&self, rating: &Rating) -> Result<()> {
        let mut ratings = lock(&self.ratings, "ratings")?;
        if ratings.iter().any(|r| r.id == rating.id) {
            return Err(format!("rating {} already exists", rating.id).into());
        }
        ratings.push(rating.clone());
        Ok(())
    }

    async fn retitle(&self, id: BookId, title: &str) -> Result<bool> {
        let mut ratings = lock(&self.ratings, "ratings")?;
        match ratings.iter_mut().find(|r| r.id == id) {
            Some(existing) => {
                existing.title = title.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn append_value(&self, id: BookId, value: RatingValue) -> Result<Option<Rating>> {
        let mut ratings = lock(&self.ratings, "ratings")?;
        let Some(existing) = ratings.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        *existing = existing.clone().with_value(value);
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: BookId) -> Result<bool> {
        let mut ratings = lock(&self.ratings, "ratings")?;
        let before = ratings.len();
        ratings.retain(|r| r.id != id);
        Ok(ratings.len() != before)
    }
}
