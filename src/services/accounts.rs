use chrono::Utc;
use uuid::Uuid;

use crate::{
    db::AccountStore,
    error::{AppError, AppResult},
    models::{AccessToken, User},
};

const INVALID_CREDENTIALS: &str = "Invalid credentials";

fn normalize_credentials<'a>(email: &'a str, password: &'a str) -> AppResult<(String, &'a str)> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput(
            "Email and password are required".to_string(),
        ));
    }
    Ok((email.to_lowercase(), password))
}

/// Registers a new account and returns its id
pub async fn register<S>(store: &S, email: &str, password: &str) -> AppResult<String>
where
    S: AccountStore + ?Sized,
{
    let (email, password) = normalize_credentials(email, password)?;

    let password = password.to_string();
    let password_hash =
        tokio::task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

    let user = User {
        id: Uuid::new_v4().to_string(),
        email,
        password_hash,
        created_at: Utc::now(),
    };
    store.create_user(&user).await?;

    tracing::info!(user_id = %user.id, "User registered");

    Ok(user.id)
}

/// Verifies credentials and issues a new opaque access token
///
/// Unknown e-mails and wrong passwords are indistinguishable to the caller.
pub async fn login<S>(store: &S, email: &str, password: &str) -> AppResult<String>
where
    S: AccountStore + ?Sized,
{
    let (email, password) = normalize_credentials(email, password)?;

    let Some(user) = store.find_user_by_email(&email).await? else {
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    };

    let password = password.to_string();
    let hash = user.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .unwrap_or(false);

    if !valid {
        tracing::info!(user_id = %user.id, "Login rejected");
        return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
    }

    let token = AccessToken {
        token: Uuid::new_v4().to_string(),
        user_id: user.id.clone(),
        created_at: Utc::now(),
    };
    store.insert_token(&token).await?;

    tracing::info!(user_id = %user.id, "User logged in");

    Ok(token.token)
}

/// Resolves a bearer token to the user id it was issued for
pub async fn authenticate<S>(store: &S, token: &str) -> AppResult<String>
where
    S: AccountStore + ?Sized,
{
    store
        .find_token(token)
        .await?
        .map(|t| t.user_id)
        .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))
}
