//! Personal movie catalog service
//!
//! Proxies search and detail lookups to TMDB through a TTL response cache,
//! records per-user ratings and watchlist entries at most once per movie,
//! and recommends movies from a user's highest ratings.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
