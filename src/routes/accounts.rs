use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{error::AppResult, routes::AppState, services::accounts};

#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Handler for account registration
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<Value>> {
    let user_id =
        accounts::register(state.store.as_ref(), &credentials.email, &credentials.password)
            .await?;
    Ok(Json(json!({ "user_id": user_id })))
}

/// Handler for login, returning a bearer token
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> AppResult<Json<Value>> {
    let token =
        accounts::login(state.store.as_ref(), &credentials.email, &credentials.password).await?;
    Ok(Json(json!({ "token": token })))
}
