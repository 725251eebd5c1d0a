//! Rating domain logic.

use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::{now_millis, Rating};
use crate::store::{RatingStore, UserStore};

/// Rating failures. The domain variants are recoverable outcomes the routes
/// map to 400; internal failures bubble to the adapter's generic 500.
#[derive(Debug, Error)]
pub enum RatingError {
    /// No rating with the given id.
    #[error("rating not found")]
    NotFound,

    /// The authenticated user does not exist (e.g. deleted after login).
    #[error("user not found")]
    UserNotFound,

    /// The rating belongs to a different user.
    #[error("forbidden")]
    Forbidden,

    /// Unexpected failure from a collaborator.
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

/// CRUD over ratings with ownership checks.
pub struct RatingService {
    ratings: Arc<dyn RatingStore>,
    users: Arc<dyn UserStore>,
}

impl RatingService {
    /// Creates the service over its stores.
    #[must_use]
    pub fn new(ratings: Arc<dyn RatingStore>, users: Arc<dyn UserStore>) -> Self {
        Self { ratings, users }
    }

    /// Lists all ratings.
    pub async fn find(&self) -> Result<Vec<Rating>, RatingError> {
        Ok(self.ratings.find().await?)
    }

    /// Returns one rating by id.
    pub async fn find_by_id(&self, id: &str) -> Result<Rating, RatingError> {
        self.ratings
            .find_by_id(id)
            .await?
            .ok_or(RatingError::NotFound)
    }

    /// Creates a rating owned by the given user.
    pub async fn create(
        &self,
        user_id: &str,
        rating: f64,
        comment: &str,
    ) -> Result<(), RatingError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(RatingError::UserNotFound);
        }

        let now = now_millis();
        self.ratings
            .create(Rating {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.to_string(),
                rating,
                comment: comment.to_string(),
                created_at: now,
                updated_at: now,
            })
            .await?;

        Ok(())
    }

    /// Updates a rating, but only for its owner. The creation timestamp is
    /// preserved.
    pub async fn update_by_id_and_user_id(
        &self,
        id: &str,
        user_id: &str,
        rating: f64,
        comment: &str,
    ) -> Result<(), RatingError> {
        let existing = self
            .ratings
            .find_by_id(id)
            .await?
            .ok_or(RatingError::NotFound)?;

        if existing.user_id != user_id {
            return Err(RatingError::Forbidden);
        }

        self.ratings
            .update(Rating {
                id: existing.id,
                user_id: existing.user_id,
                rating,
                comment: comment.to_string(),
                created_at: existing.created_at,
                updated_at: now_millis(),
            })
            .await?;

        Ok(())
    }

    /// Deletes a rating, but only for its owner.
    pub async fn delete_by_id_and_user_id(
        &self,
        id: &str,
        user_id: &str,
    ) -> Result<(), RatingError> {
        let existing = self
            .ratings
            .find_by_id(id)
            .await?
            .ok_or(RatingError::NotFound)?;

        if existing.user_id != user_id {
            return Err(RatingError::Forbidden);
        }

        self.ratings.delete_by_id(id).await?;
        Ok(())
    }
}
