use std::sync::Arc;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde_json::json;

use crate::{
    error::AppResult,
    middleware::{auth::AuthUser, request_id::RequestId},
    routes::{raw_json, AppState},
    services::recommendations::{self, Recommendation},
};

/// Handler for recommendations endpoint
pub async fn recommend(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Extension(user): Extension<AuthUser>,
) -> AppResult<Response> {
    let recommendation = recommendations::recommend(
        state.store.as_ref(),
        state.provider.as_ref(),
        &user.user_id,
    )
    .await?;

    let response = match recommendation {
        Recommendation::Discovered { genre, payload, .. } => {
            tracing::info!(
                request_id = %request_id,
                genre_id = genre.id,
                "Serving recommendation"
            );
            raw_json(payload)
        }
        Recommendation::NoSignal => {
            Json(json!({ "message": "Rate some movies first" })).into_response()
        }
    };

    Ok(response)
}
