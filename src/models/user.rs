use sqlx::FromRow;

// Row used to verify a login attempt
#[derive(Debug, FromRow)]
pub struct UserCredentials {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub role: String,
}
