use crate::{
    error::{AppError, AppResult},
    models::Payload,
    services::providers::MovieProvider,
};

/// Service function for movie search
///
/// Delegates to the configured MovieProvider and passes its payload through
/// untouched, keeping HTTP routing separate from provider access.
pub async fn search_movies<P>(provider: &P, query: &str) -> AppResult<Payload>
where
    P: MovieProvider + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let payload = provider.search_movies(query).await?;

    tracing::info!(
        query = %query,
        bytes = payload.len(),
        provider = provider.name(),
        "Movie search completed"
    );

    Ok(payload)
}
