use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::models::InteractionKind;

/// Failures of a single outbound provider call
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("Provider unreachable: {0}")]
    Unreachable(String),

    #[error("Provider returned a bad response: {0}")]
    BadResponse(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Application-level errors
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(i64),

    #[error("{kind} already exists for user {user_id} and movie {movie_id}")]
    DuplicateInteraction {
        kind: InteractionKind,
        user_id: String,
        movie_id: String,
    },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Recommendation input malformed: {0}")]
    RecommendationInputMalformed(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        AppError::UpstreamUnavailable(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // Duplicates are informational, not failures.
            AppError::DuplicateInteraction { kind, .. } => {
                let message = match kind {
                    InteractionKind::Rating => "Already rated",
                    InteractionKind::Watchlist => "Already in watchlist",
                };
                return (StatusCode::CONFLICT, Json(json!({ "message": message })))
                    .into_response();
            }
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::RatingOutOfRange(_) => (
                StatusCode::BAD_REQUEST,
                "Rating must be between 1 and 5".to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            AppError::AlreadyExists(msg) => (StatusCode::CONFLICT, msg),
            AppError::RecommendationInputMalformed(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::UpstreamUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
