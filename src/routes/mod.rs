use std::sync::Arc;

use axum::{
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    db::Store,
    middleware::{
        auth::require_auth,
        request_id::{make_span_with_request_id, request_id_middleware},
    },
    models::Payload,
    services::providers::MovieProvider,
};

pub mod accounts;
pub mod ratings;
pub mod recommendations;
pub mod titles;
pub mod watchlist;

/// Shared handles every handler needs
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub provider: Arc<dyn MovieProvider>,
}

/// Creates the application router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", api_routes(Arc::clone(&state)))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    let protected = Router::new()
        .route("/recommend", get(recommendations::recommend))
        .route("/rate/:id", post(ratings::rate))
        .route("/rated", get(ratings::list))
        .route("/watchlist", get(watchlist::list))
        .route("/watchlist/:id", post(watchlist::add))
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(accounts::register))
        .route("/login", post(accounts::login))
        .route("/movies/search", get(titles::search))
        .merge(protected)
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Serves a provider payload byte-for-byte as JSON
pub(crate) fn raw_json(payload: Payload) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], payload).into_response()
}
