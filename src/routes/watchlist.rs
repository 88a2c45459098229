use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use serde_json::{json, Value};

use crate::{
    error::AppResult,
    middleware::{auth::AuthUser, request_id::RequestId},
    models::WatchlistRecord,
    routes::AppState,
    services::interactions,
};

/// Handler for adding a movie to the caller's watchlist
pub async fn add(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
    Path(movie_id): Path<String>,
) -> AppResult<Json<Value>> {
    tracing::info!(
        request_id = %request_id,
        movie_id = %movie_id,
        "Processing watchlist request"
    );

    let recorded = interactions::record_watchlist_entry(
        state.store.as_ref(),
        state.provider.as_ref(),
        &user.user_id,
        &movie_id,
    )
    .await?;

    Ok(Json(json!({
        "message": "Added to watchlist",
        "id": recorded.id,
        "movie_id": recorded.movie_id,
        "title": recorded.title,
    })))
}

/// Handler listing the caller's watchlist
pub async fn list(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Json<Vec<WatchlistRecord>>> {
    let entries = state.store.list_watchlist(&user.user_id).await?;
    Ok(Json(entries))
}
