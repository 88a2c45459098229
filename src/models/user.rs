use chrono::{DateTime, Utc};
use serde::Serialize;

/// A registered account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// An opaque bearer token issued at login
#[derive(Debug, Clone)]
pub struct AccessToken {
    pub token: String,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
}
