use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, types::Json, PgPool};

use super::store::{AccountStore, InteractionStore};
use crate::{
    error::{AppError, AppResult},
    models::{AccessToken, Genre, InteractionKind, RatingRecord, User, WatchlistRecord},
};

/// Creates a PostgreSQL connection pool and applies pending migrations
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

#[derive(sqlx::FromRow)]
struct RatingRow {
    user_id: String,
    movie_id: String,
    title: String,
    release_date: Option<String>,
    genres: Json<Vec<Genre>>,
    user_rating: i32,
    created_at: DateTime<Utc>,
}

impl From<RatingRow> for RatingRecord {
    fn from(row: RatingRow) -> Self {
        Self {
            user_id: row.user_id,
            movie_id: row.movie_id,
            title: row.title,
            release_date: row.release_date,
            genres: row.genres.0,
            user_rating: row.user_rating,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct WatchlistRow {
    user_id: String,
    movie_id: String,
    title: String,
    release_date: Option<String>,
    genres: Json<Vec<Genre>>,
    poster_path: Option<String>,
    vote_average: Option<f64>,
    created_at: DateTime<Utc>,
}

impl From<WatchlistRow> for WatchlistRecord {
    fn from(row: WatchlistRow) -> Self {
        Self {
            user_id: row.user_id,
            movie_id: row.movie_id,
            title: row.title,
            release_date: row.release_date,
            genres: row.genres.0,
            poster_path: row.poster_path,
            vote_average: row.vote_average,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
        }
    }
}

const RATING_COLUMNS: &str =
    "user_id, movie_id, title, release_date, genres, user_rating, created_at";
const WATCHLIST_COLUMNS: &str =
    "user_id, movie_id, title, release_date, genres, poster_path, vote_average, created_at";

/// Maps a unique-constraint violation to a domain error, passing others through
fn on_unique_violation(err: sqlx::Error, conflict: impl FnOnce() -> AppError) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => conflict(),
        _ => AppError::Database(err),
    }
}

/// PostgreSQL-backed store
///
/// `UNIQUE (user_id, movie_id)` on `ratings` and `watchlist` is what
/// ultimately prevents duplicate interactions; listings are ordered by the
/// serial id, i.e. insertion order.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InteractionStore for PostgresStore {
    async fn find_rating(&self, user_id: &str, movie_id: &str) -> AppResult<Option<RatingRecord>> {
        let row = sqlx::query_as::<_, RatingRow>(&format!(
            "SELECT {} FROM ratings WHERE user_id = $1 AND movie_id = $2",
            RATING_COLUMNS
        ))
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RatingRecord::from))
    }

    async fn insert_rating(&self, record: &RatingRecord) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO ratings (user_id, movie_id, title, release_date, genres, user_rating, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id",
        )
        .bind(&record.user_id)
        .bind(&record.movie_id)
        .bind(&record.title)
        .bind(&record.release_date)
        .bind(Json(&record.genres))
        .bind(record.user_rating)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_unique_violation(e, || AppError::DuplicateInteraction {
                kind: InteractionKind::Rating,
                user_id: record.user_id.clone(),
                movie_id: record.movie_id.clone(),
            })
        })?;

        Ok(id)
    }

    async fn find_watchlist_entry(
        &self,
        user_id: &str,
        movie_id: &str,
    ) -> AppResult<Option<WatchlistRecord>> {
        let row = sqlx::query_as::<_, WatchlistRow>(&format!(
            "SELECT {} FROM watchlist WHERE user_id = $1 AND movie_id = $2",
            WATCHLIST_COLUMNS
        ))
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(WatchlistRecord::from))
    }

    async fn insert_watchlist_entry(&self, record: &WatchlistRecord) -> AppResult<i64> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO watchlist (user_id, movie_id, title, release_date, genres, poster_path, vote_average, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id",
        )
        .bind(&record.user_id)
        .bind(&record.movie_id)
        .bind(&record.title)
        .bind(&record.release_date)
        .bind(Json(&record.genres))
        .bind(&record.poster_path)
        .bind(record.vote_average)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            on_unique_violation(e, || AppError::DuplicateInteraction {
                kind: InteractionKind::Watchlist,
                user_id: record.user_id.clone(),
                movie_id: record.movie_id.clone(),
            })
        })?;

        Ok(id)
    }

    async fn high_signal_ratings(
        &self,
        user_id: &str,
        min_rating: i32,
    ) -> AppResult<Vec<RatingRecord>> {
        let rows = sqlx::query_as::<_, RatingRow>(&format!(
            "SELECT {} FROM ratings WHERE user_id = $1 AND user_rating >= $2 ORDER BY id",
            RATING_COLUMNS
        ))
        .bind(user_id)
        .bind(min_rating)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RatingRecord::from).collect())
    }

    async fn list_ratings(&self, user_id: &str) -> AppResult<Vec<RatingRecord>> {
        let rows = sqlx::query_as::<_, RatingRow>(&format!(
            "SELECT {} FROM ratings WHERE user_id = $1 ORDER BY id",
            RATING_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RatingRecord::from).collect())
    }

    async fn list_watchlist(&self, user_id: &str) -> AppResult<Vec<WatchlistRecord>> {
        let rows = sqlx::query_as::<_, WatchlistRow>(&format!(
            "SELECT {} FROM watchlist WHERE user_id = $1 ORDER BY id",
            WATCHLIST_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(WatchlistRecord::from).collect())
    }
}

#[async_trait]
impl AccountStore for PostgresStore {
    async fn create_user(&self, user: &User) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(&user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            on_unique_violation(e, || {
                AppError::AlreadyExists(format!("User {} already registered", user.email))
            })
        })?;

        Ok(())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(User::from))
    }

    async fn insert_token(&self, token: &AccessToken) -> AppResult<()> {
        sqlx::query("INSERT INTO access_tokens (token, user_id, created_at) VALUES ($1, $2, $3)")
            .bind(&token.token)
            .bind(&token.user_id)
            .bind(token.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn find_token(&self, token: &str) -> AppResult<Option<AccessToken>> {
        let row: Option<(String, String, DateTime<Utc>)> = sqlx::query_as(
            "SELECT token, user_id, created_at FROM access_tokens WHERE token = $1",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(token, user_id, created_at)| AccessToken {
            token,
            user_id,
            created_at,
        }))
    }
}
