use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::info;
use crate::models::role::Role;
use crate::routes::auth::authorize;
use crate::session::SessionStore;
use super::admin_models::{SessionCountResponse, SessionResetResponse};

pub async fn session_count(
    sessions: web::Data<SessionStore>,
    req: HttpRequest,
) -> impl Responder {
    if let Err(rejection) = authorize(&req, &sessions, Role::Admin) {
        return rejection.into_response();
    }

    // sweep first so the count only covers live sessions
    sessions.purge_expired();
    HttpResponse::Ok().json(SessionCountResponse {
        active_sessions: sessions.len(),
    })
}

// Logs everyone out, the calling admin included
pub async fn session_reset(
    sessions: web::Data<SessionStore>,
    req: HttpRequest,
) -> impl Responder {
    let admin = match authorize(&req, &sessions, Role::Admin) {
        Ok(session) => session,
        Err(rejection) => return rejection.into_response(),
    };

    let removed = sessions.clear();
    info!("Admin {} reset all sessions ({} removed)", admin.username, removed);

    HttpResponse::Ok().json(SessionResetResponse {
        success: true,
        message: "All sessions have been reset successfully".into(),
        removed,
    })
}
