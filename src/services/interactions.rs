use crate::{
    db::InteractionStore,
    error::{AppError, AppResult},
    models::{InteractionKind, Rating, RatingRecord, WatchlistRecord},
    services::providers::MovieProvider,
};

/// Identity of a freshly stored rating or watchlist entry
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub id: i64,
    pub kind: InteractionKind,
    pub movie_id: String,
    pub title: String,
}

/// Movie ids are TMDB numeric ids; anything else never reaches the provider.
///
/// The id is re-rendered from its numeric value so `"0603"` and `"603"`
/// share one (user, movie) key.
fn canonical_movie_id(movie_id: &str) -> AppResult<String> {
    let movie_id = movie_id.trim();
    if movie_id.is_empty() {
        return Err(AppError::InvalidInput("Movie id is required".to_string()));
    }
    if !movie_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::InvalidInput(format!(
            "Movie id must be numeric, got {:?}",
            movie_id
        )));
    }
    movie_id
        .parse::<u64>()
        .map(|id| id.to_string())
        .map_err(|_| AppError::InvalidInput(format!("Movie id {} is out of range", movie_id)))
}

fn validate_user_id(user_id: &str) -> AppResult<()> {
    if user_id.trim().is_empty() {
        return Err(AppError::InvalidInput("User id is required".to_string()));
    }
    Ok(())
}

/// Records a user's rating of a movie, at most once per (user, movie)
///
/// The local duplicate check runs before the provider call so an
/// already-rated movie costs no upstream request. The store's own
/// uniqueness constraint still rejects a concurrent duplicate that slips
/// past the check.
pub async fn record_rating<S, P>(
    store: &S,
    provider: &P,
    user_id: &str,
    movie_id: &str,
    rating: i64,
) -> AppResult<Recorded>
where
    S: InteractionStore + ?Sized,
    P: MovieProvider + ?Sized,
{
    let rating = Rating::new(rating)?;
    validate_user_id(user_id)?;
    let movie_id = canonical_movie_id(movie_id)?;

    if store.find_rating(user_id, &movie_id).await?.is_some() {
        tracing::info!(user_id = %user_id, movie_id = %movie_id, "Movie already rated");
        return Err(AppError::DuplicateInteraction {
            kind: InteractionKind::Rating,
            user_id: user_id.to_string(),
            movie_id,
        });
    }

    let detail = provider.movie_detail(&movie_id).await?;
    let record = RatingRecord::from_detail(user_id, &movie_id, detail, rating);
    let id = store.insert_rating(&record).await?;

    tracing::info!(
        user_id = %user_id,
        movie_id = %movie_id,
        rating = record.user_rating,
        provider = provider.name(),
        "Rating recorded"
    );

    Ok(Recorded {
        id,
        kind: InteractionKind::Rating,
        movie_id: record.movie_id,
        title: record.title,
    })
}

/// Adds a movie to a user's watchlist, at most once per (user, movie)
///
/// Follows the same check, fetch, insert sequence as `record_rating`.
pub async fn record_watchlist_entry<S, P>(
    store: &S,
    provider: &P,
    user_id: &str,
    movie_id: &str,
) -> AppResult<Recorded>
where
    S: InteractionStore + ?Sized,
    P: MovieProvider + ?Sized,
{
    validate_user_id(user_id)?;
    let movie_id = canonical_movie_id(movie_id)?;

    if store.find_watchlist_entry(user_id, &movie_id).await?.is_some() {
        tracing::info!(user_id = %user_id, movie_id = %movie_id, "Movie already in watchlist");
        return Err(AppError::DuplicateInteraction {
            kind: InteractionKind::Watchlist,
            user_id: user_id.to_string(),
            movie_id,
        });
    }

    let detail = provider.movie_detail(&movie_id).await?;
    let record = WatchlistRecord::from_detail(user_id, &movie_id, detail);
    let id = store.insert_watchlist_entry(&record).await?;

    tracing::info!(
        user_id = %user_id,
        movie_id = %movie_id,
        provider = provider.name(),
        "Watchlist entry recorded"
    );

    Ok(Recorded {
        id,
        kind: InteractionKind::Watchlist,
        movie_id: record.movie_id,
        title: record.title,
    })
}
