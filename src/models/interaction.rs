use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt::Display;

use super::movie::{Genre, MovieDetail};
use crate::error::{AppError, AppResult};

/// Ratings at or above this value feed the recommendation engine
pub const HIGH_SIGNAL_THRESHOLD: i32 = 4;

/// Which per-user, per-movie interaction a record represents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractionKind {
    Rating,
    Watchlist,
}

impl Display for InteractionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InteractionKind::Rating => write!(f, "Rating"),
            InteractionKind::Watchlist => write!(f, "Watchlist entry"),
        }
    }
}

/// A user rating, guaranteed to lie in 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(i32);

impl Rating {
    pub const MIN: i64 = 1;
    pub const MAX: i64 = 5;

    pub fn new(value: i64) -> AppResult<Self> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(AppError::RatingOutOfRange(value));
        }
        Ok(Self(value as i32))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

/// A user's rating of a movie, snapshotting the movie details at rating time
///
/// At most one exists per (user_id, movie_id); never updated once stored.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RatingRecord {
    pub user_id: String,
    pub movie_id: String,
    pub title: String,
    pub release_date: Option<String>,
    pub genres: Vec<Genre>,
    pub user_rating: i32,
    pub created_at: DateTime<Utc>,
}

impl RatingRecord {
    pub fn from_detail(user_id: &str, movie_id: &str, detail: MovieDetail, rating: Rating) -> Self {
        Self {
            user_id: user_id.to_string(),
            movie_id: movie_id.to_string(),
            title: detail.title,
            release_date: detail.release_date,
            genres: detail.genres,
            user_rating: rating.get(),
            created_at: Utc::now(),
        }
    }
}

/// A movie saved to a user's watchlist
///
/// At most one exists per (user_id, movie_id).
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct WatchlistRecord {
    pub user_id: String,
    pub movie_id: String,
    pub title: String,
    pub release_date: Option<String>,
    pub genres: Vec<Genre>,
    pub poster_path: Option<String>,
    pub vote_average: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl WatchlistRecord {
    pub fn from_detail(user_id: &str, movie_id: &str, detail: MovieDetail) -> Self {
        Self {
            user_id: user_id.to_string(),
            movie_id: movie_id.to_string(),
            title: detail.title,
            release_date: detail.release_date,
            genres: detail.genres,
            poster_path: detail.poster_path,
            vote_average: detail.vote_average,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> MovieDetail {
        MovieDetail {
            id: 603,
            title: "The Matrix".to_string(),
            release_date: Some("1999-03-30".to_string()),
            genres: vec![Genre {
                id: 28,
                name: "Action".to_string(),
            }],
            poster_path: Some("/matrix.jpg".to_string()),
            vote_average: Some(8.2),
        }
    }

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(1).is_ok());
        assert!(Rating::new(5).is_ok());
        assert!(matches!(Rating::new(0), Err(AppError::RatingOutOfRange(0))));
        assert!(matches!(Rating::new(6), Err(AppError::RatingOutOfRange(6))));
        assert!(matches!(
            Rating::new(-3),
            Err(AppError::RatingOutOfRange(-3))
        ));
    }

    #[test]
    fn test_rating_record_from_detail() {
        let record = RatingRecord::from_detail("u1", "603", matrix(), Rating::new(5).unwrap());

        assert_eq!(record.user_id, "u1");
        assert_eq!(record.movie_id, "603");
        assert_eq!(record.title, "The Matrix");
        assert_eq!(record.user_rating, 5);
        assert_eq!(record.genres.len(), 1);
    }

    #[test]
    fn test_watchlist_record_from_detail() {
        let record = WatchlistRecord::from_detail("u1", "603", matrix());

        assert_eq!(record.poster_path.as_deref(), Some("/matrix.jpg"));
        assert_eq!(record.vote_average, Some(8.2));
        assert_eq!(record.release_date.as_deref(), Some("1999-03-30"));
    }

    #[test]
    fn test_interaction_kind_display() {
        assert_eq!(format!("{}", InteractionKind::Rating), "Rating");
        assert_eq!(format!("{}", InteractionKind::Watchlist), "Watchlist entry");
    }
}
