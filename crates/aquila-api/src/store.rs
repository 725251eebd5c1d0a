//! Persistence interfaces and in-memory implementations.
//!
//! The services depend only on the [`UserStore`] and [`RatingStore`] traits;
//! the in-memory implementations back local development and tests.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{Rating, User};

/// User lookup.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Finds a user by login name.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Finds a user by identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
}

/// Rating persistence.
#[async_trait]
pub trait RatingStore: Send + Sync {
    /// Lists all ratings.
    async fn find(&self) -> Result<Vec<Rating>>;

    /// Finds a rating by identifier.
    async fn find_by_id(&self, id: &str) -> Result<Option<Rating>>;

    /// Stores a new rating.
    async fn create(&self, rating: Rating) -> Result<()>;

    /// Replaces an existing rating by its identifier.
    async fn update(&self, rating: Rating) -> Result<()>;

    /// Removes a rating by identifier.
    async fn delete_by_id(&self, id: &str) -> Result<()>;
}

/// In-memory user store.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a user, keyed by id.
    pub async fn insert(&self, user: User) {
        self.users.write().await.insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|user| user.username == username).cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }
}

/// In-memory rating store.
#[derive(Debug, Default)]
pub struct InMemoryRatingStore {
    ratings: RwLock<HashMap<String, Rating>>,
}

impl InMemoryRatingStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a rating directly, bypassing the service. Test seeding.
    pub async fn insert(&self, rating: Rating) {
        self.ratings.write().await.insert(rating.id.clone(), rating);
    }
}

#[async_trait]
impl RatingStore for InMemoryRatingStore {
    async fn find(&self) -> Result<Vec<Rating>> {
        let ratings = self.ratings.read().await;
        let mut all: Vec<Rating> = ratings.values().cloned().collect();
        all.sort_by_key(|rating| rating.created_at);
        Ok(all)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Rating>> {
        Ok(self.ratings.read().await.get(id).cloned())
    }

    async fn create(&self, rating: Rating) -> Result<()> {
        self.ratings.write().await.insert(rating.id.clone(), rating);
        Ok(())
    }

    async fn update(&self, rating: Rating) -> Result<()> {
        self.ratings.write().await.insert(rating.id.clone(), rating);
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<()> {
        self.ratings.write().await.remove(id);
        Ok(())
    }
}
