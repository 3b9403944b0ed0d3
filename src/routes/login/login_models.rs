use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::models::role::Role;

// Login request and response
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
}


// Current session view
#[derive(Serialize)]
pub struct SessionResponse {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}


// Shared by logout and every error answer
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}
