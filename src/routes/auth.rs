use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse};
use log::info;
use crate::models::role::Role;
use crate::models::session::Session;
use crate::session::SessionStore;
use super::login::login_models::MessageResponse;

#[derive(Debug, PartialEq, Eq)]
pub enum AuthRejection {
    NotAuthenticated,
    WrongRole { required: Role, actual: Role },
}

impl AuthRejection {
    pub fn into_response(self) -> HttpResponse {
        match self {
            AuthRejection::NotAuthenticated => HttpResponse::Unauthorized().json(MessageResponse {
                message: "Not authenticated".into(),
            }),
            AuthRejection::WrongRole { required, actual } => HttpResponse::Forbidden().json(MessageResponse {
                message: format!("Signed in as {}, {} required", actual, required),
            }),
        }
    }
}

// All Cookie headers of the request joined into one, as browsers send them.
// Non-ASCII bytes in other cookies must not hide session_id, so decode lossily.
pub fn cookie_header(req: &HttpRequest) -> Option<String> {
    let values: Vec<String> = req
        .headers()
        .get_all(header::COOKIE)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(values.join("; "))
    }
}

pub fn current_session(req: &HttpRequest, sessions: &SessionStore) -> Option<Session> {
    sessions.get_session_from_request(cookie_header(req).as_deref())
}

/// Live session of the request, provided it belongs to `required`.
pub fn authorize(req: &HttpRequest, sessions: &SessionStore, required: Role) -> Result<Session, AuthRejection> {
    let session = match current_session(req, sessions) {
        Some(session) => session,
        None => {
            info!("Unauthenticated request to {}", req.path());
            return Err(AuthRejection::NotAuthenticated);
        }
    };

    if session.role != required {
        info!(
            "User {} with role {} denied {} (requires {})",
            session.username, session.role, req.path(), required
        );
        return Err(AuthRejection::WrongRole { required, actual: session.role });
    }

    Ok(session)
}
