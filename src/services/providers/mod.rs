//! Movie metadata provider abstraction
//!
//! The interaction guard and the recommendation engine only see this trait,
//! so the upstream service can be swapped (or mocked in tests) without
//! touching them. Raw payloads are passed through verbatim; only movie
//! details are parsed.

use crate::{
    error::ProviderResult,
    models::{MovieDetail, Payload},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieProvider: Send + Sync {
    /// Free-text movie search, returned as the provider's raw JSON
    async fn search_movies(&self, query: &str) -> ProviderResult<Payload>;

    /// Structured details for a single movie
    async fn movie_detail(&self, movie_id: &str) -> ProviderResult<MovieDetail>;

    /// Movies matching a genre id, returned as the provider's raw JSON
    async fn discover_by_genre(&self, genre_id: i64) -> ProviderResult<Payload>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
