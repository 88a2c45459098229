use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::store::{AccountStore, InteractionStore};
use crate::{
    error::{AppError, AppResult},
    models::{AccessToken, InteractionKind, RatingRecord, User, WatchlistRecord},
};

/// In-process store used when no database is configured
///
/// State is lost on restart. Uniqueness checks and inserts run under the
/// same write lock, so concurrent duplicates cannot both land.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

#[derive(Default)]
struct MemoryStoreInner {
    ratings: Vec<RatingRecord>,
    watchlist: Vec<WatchlistRecord>,
    users: HashMap<String, User>,
    tokens: HashMap<String, AccessToken>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn same_pair(user_id: &str, movie_id: &str, other_user: &str, other_movie: &str) -> bool {
    user_id == other_user && movie_id == other_movie
}

#[async_trait]
impl InteractionStore for MemoryStore {
    async fn find_rating(&self, user_id: &str, movie_id: &str) -> AppResult<Option<RatingRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .iter()
            .find(|r| same_pair(user_id, movie_id, &r.user_id, &r.movie_id))
            .cloned())
    }

    async fn insert_rating(&self, record: &RatingRecord) -> AppResult<i64> {
        let mut inner = self.inner.write().await;
        if inner
            .ratings
            .iter()
            .any(|r| same_pair(&record.user_id, &record.movie_id, &r.user_id, &r.movie_id))
        {
            return Err(AppError::DuplicateInteraction {
                kind: InteractionKind::Rating,
                user_id: record.user_id.clone(),
                movie_id: record.movie_id.clone(),
            });
        }
        inner.ratings.push(record.clone());
        Ok(inner.ratings.len() as i64)
    }

    async fn find_watchlist_entry(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> AppResult<Option<WatchlistRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .watchlist
            .iter()
            .find(|w| same_pair(user_id, movie_id, &w.user_id, &w.movie_id))
            .cloned())
    }

    async fn insert_watchlist_entry(&self, record: &WatchlistRecord) -> AppResult<i64> {
        let mut inner = self.inner.write().await;
        if inner
            .watchlist
            .iter()
            .any(|w| same_pair(&record.user_id, &record.movie_id, &w.user_id, &w.movie_id))
        {
            return Err(AppError::DuplicateInteraction {
                kind: InteractionKind::Watchlist,
                user_id: record.user_id.clone(),
                movie_id: record.movie_id.clone(),
            });
        }
        inner.watchlist.push(record.clone());
        Ok(inner.watchlist.len() as i64)
    }

    async fn high_signal_ratings(
        &self,
        user_id: &str,
        min_rating: i32,
    ) -> AppResult<Vec<RatingRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .iter()
            .filter(|r| r.user_id == user_id && r.user_rating >= min_rating)
            .cloned()
            .collect())
    }

    async fn list_ratings(&self, user_id: &str) -> AppResult<Vec<RatingRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .ratings
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_watchlist(&self, user_id: &str) -> AppResult<Vec<WatchlistRecord>> {
        let inner = self.inner.read().await;
        Ok(inner
            .watchlist
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        if inner.users.contains_key(&user.email) {
            return Err(AppError::AlreadyExists(format!(
                "User {} already registered",
                user.email
            )));
        }
        inner.users.insert(user.email.clone(), user.clone());
        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self.inner.read().await.users.get(email).cloned())
    }

    async fn insert_token(&self, token: &AccessToken) -> AppResult<()> {
        self.inner
            .write()
            .await
            .tokens
            .insert(token.token.clone(), token.clone());
        Ok(())
    }

    async fn find_token(&self, token: &str) -> AppResult<Option<AccessToken>> {
        Ok(self.inner.read().await.tokens.get(token).cloned())
    }
}
