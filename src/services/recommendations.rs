use crate::{
    db::InteractionStore,
    error::{AppError, AppResult},
    models::{Genre, Payload, HIGH_SIGNAL_THRESHOLD},
    services::providers::MovieProvider,
};

/// Outcome of a recommendation request
#[derive(Debug, Clone, PartialEq)]
pub enum Recommendation {
    /// Provider discover results for the seed rating's first genre, verbatim
    Discovered {
        seed_movie_id: String,
        genre: Genre,
        payload: Payload,
    },
    /// The user has no rating at or above the high-signal threshold
    NoSignal,
}

/// Generates a one-step content recommendation from a user's ratings
///
/// The seed is the first high-signal rating in store order (insertion
/// order) and the genre is the first listed on that rating. The provider's
/// discover payload is returned as-is: it is not filtered against movies
/// the user already rated or saved.
pub async fn recommend<S, P>(store: &S, provider: &P, user_id: &str) -> AppResult<Recommendation>
where
    S: InteractionStore + ?Sized,
    P: MovieProvider + ?Sized,
{
    let high_signal = store
        .high_signal_ratings(user_id, HIGH_SIGNAL_THRESHOLD)
        .await?;

    let Some(seed) = high_signal.into_iter().next() else {
        tracing::info!(user_id = %user_id, "No high-signal ratings, nothing to recommend");
        return Ok(Recommendation::NoSignal);
    };

    let genre = seed.genres.first().cloned().ok_or_else(|| {
        AppError::RecommendationInputMalformed(format!(
            "Rating for movie {} has no genres",
            seed.movie_id
        ))
    })?;

    let payload = provider.discover_by_genre(genre.id).await?;

    tracing::info!(
        user_id = %user_id,
        seed_movie_id = %seed.movie_id,
        genre_id = genre.id,
        genre = %genre.name,
        provider = provider.name(),
        "Recommendation generated"
    );

    Ok(Recommendation::Discovered {
        seed_movie_id: seed.movie_id,
        genre,
        payload,
    })
}
