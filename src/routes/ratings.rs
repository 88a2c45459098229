use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::{auth::AuthUser, request_id::RequestId},
    models::RatingRecord,
    routes::AppState,
    services::interactions,
};

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub rating: i64,
}

/// Handler for rating a movie
pub async fn rate(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
    Path(movie_id): Path<String>,
    body: Result<Json<RateRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(request) = body.map_err(|e| AppError::InvalidInput(e.body_text()))?;

    tracing::info!(
        request_id = %request_id,
        movie_id = %movie_id,
        rating = request.rating,
        "Processing rating request"
    );

    let recorded = interactions::record_rating(
        state.store.as_ref(),
        state.provider.as_ref(),
        &user.user_id,
        &movie_id,
        request.rating,
    )
    .await?;

    Ok(Json(json!({
        "message": "Rated successfully",
        "id": recorded.id,
        "movie_id": recorded.movie_id,
        "title": recorded.title,
    })))
}

/// Handler listing the caller's ratings
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Vec<RatingRecord>>> {
    let ratings = state.store.list_ratings(&user.user_id).await?;
    Ok(Json(ratings))
}
