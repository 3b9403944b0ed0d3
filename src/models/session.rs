use chrono::{DateTime, Utc};
use super::role::Role;

// One authenticated login. Handed out by value only; the store keeps the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub user_id: i64,
    pub username: String,
    pub role: Role,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}
