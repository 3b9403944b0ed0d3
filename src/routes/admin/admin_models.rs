use serde::Serialize;

#[derive(Serialize)]
pub struct SessionCountResponse {
    pub active_sessions: usize,
}

#[derive(Serialize)]
pub struct SessionResetResponse {
    pub success: bool,
    pub message: String,
    pub removed: usize,
}
