use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Response,
};
use serde::Deserialize;

use crate::{
    error::AppResult,
    routes::{raw_json, AppState},
    services::title_search,
};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    q: String,
}

/// Handler for movie search endpoint
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchQuery>,
) -> AppResult<Response> {
    let payload = title_search::search_movies(state.provider.as_ref(), &params.q).await?;
    Ok(raw_json(payload))
}
