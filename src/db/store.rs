use async_trait::async_trait;

use crate::{
    error::AppResult,
    models::{AccessToken, RatingRecord, User, WatchlistRecord},
};

/// Persistence for per-user ratings and watchlist entries
///
/// Implementations must reject a second record for the same
/// (user_id, movie_id) with `AppError::DuplicateInteraction`; that rejection
/// is the authoritative uniqueness guard, independent of any prior lookup.
/// Every listing is returned in insertion order.
#[async_trait]
pub trait InteractionStore: Send + Sync {
    async fn find_rating(&self, user_id: &str, movie_id: &str) -> AppResult<Option<RatingRecord>>;

    /// Stores a rating and returns its record id
    async fn insert_rating(&self, record: &RatingRecord) -> AppResult<i64>;

    async fn find_watchlist_entry(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> AppResult<Option<WatchlistRecord>>;

    /// Stores a watchlist entry and returns its record id
    async fn insert_watchlist_entry(&self, record: &WatchlistRecord) -> AppResult<i64>;

    /// Ratings by `user_id` with `user_rating >= min_rating`
    async fn high_signal_ratings(
        &self,
        user_id: &str,
        min_rating: i32,
    ) -> AppResult<Vec<RatingRecord>>;

    async fn list_ratings(&self, user_id: &str) -> AppResult<Vec<RatingRecord>>;

    async fn list_watchlist(&self, user_id: &str) -> AppResult<Vec<WatchlistRecord>>;
}

/// Persistence for accounts and their access tokens
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `AppError::AlreadyExists` when the e-mail is taken
    async fn create_user(&self, user: &User) -> AppResult<()>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn insert_token(&self, token: &AccessToken) -> AppResult<()>;

    async fn find_token(&self, token: &str) -> AppResult<Option<AccessToken>>;
}

pub trait Store: InteractionStore + AccountStore {}

impl<T: InteractionStore + AccountStore> Store for T {}
