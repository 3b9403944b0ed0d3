use actix_web::{web, HttpResponse, HttpRequest, Responder};
use sqlx::SqlitePool;
use log::{error, info};
use bcrypt::verify;
use crate::models::role::Role;
use crate::models::user::UserCredentials;
use crate::routes::auth::{cookie_header, current_session};
use crate::session::{session_cookie, session_id_from_header, SessionStore};
use super::login_models::{
    LoginRequest, LoginResponse,
    SessionResponse, MessageResponse,
};

fn invalid_credentials() -> HttpResponse {
    HttpResponse::Unauthorized().json(MessageResponse {
        message: "Invalid credentials".into(),
    })
}

fn login_failed() -> HttpResponse {
    HttpResponse::InternalServerError().json(MessageResponse {
        message: "Unable to login".into(),
    })
}

// login logic
pub async fn login(
    pool: web::Data<SqlitePool>,
    sessions: web::Data<SessionStore>,
    req: web::Json<LoginRequest>,
) -> impl Responder {
    let LoginRequest { username, password } = req.into_inner();
    info!("Received login request for user: {}", username);

    // 1. Look the user up by name
    let result = sqlx::query_as::<_, UserCredentials>(
        "SELECT id, username, password_hash, role FROM users WHERE username = ? LIMIT 1",
    )
    .bind(&username)
    .fetch_optional(pool.get_ref())
    .await;

    let user = match result {
        Ok(Some(user)) => user,
        Ok(None) => {
            info!("Invalid username: {}", username);
            return invalid_credentials();
        }
        Err(e) => {
            error!("Failed to query user {}: {}", username, e);
            return login_failed();
        }
    };

    // 2. Check the password on the blocking pool
    let password_hash = user.password_hash.clone();
    let valid = match web::block(move || verify(password, &password_hash)).await {
        Ok(Ok(valid)) => valid,
        Ok(Err(e)) => {
            error!("Error when checking password for user {}: {}", username, e);
            return invalid_credentials();
        }
        Err(e) => {
            error!("Password check for user {} did not complete: {}", username, e);
            return login_failed();
        }
    };

    if !valid {
        info!("Invalid password for user: {}", username);
        return invalid_credentials();
    }

    let role = match user.role.parse::<Role>() {
        Ok(role) => role,
        Err(e) => {
            error!("User {} cannot log in: {}", username, e);
            return login_failed();
        }
    };

    // 3. Start a session and hand its id back as a cookie
    let session_id = sessions.create_session(user.id, role, &user.username);
    info!("User {} logged in as {}", user.username, role);

    HttpResponse::Ok()
        .cookie(session_cookie(Some(&session_id)))
        .json(LoginResponse {
            id: user.id,
            username: user.username,
            role,
        })
}

// logout always succeeds and always clears the cookie
pub async fn logout(
    sessions: web::Data<SessionStore>,
    req: HttpRequest,
) -> impl Responder {
    match session_id_from_header(cookie_header(&req).as_deref()) {
        Some(session_id) => {
            info!("Received logout request");
            sessions.delete_session(Some(&session_id));
        }
        None => info!("Logout request without a session cookie"),
    }

    HttpResponse::Ok()
        .cookie(session_cookie(None))
        .json(MessageResponse {
            message: "Logged out".into(),
        })
}

pub async fn session_info(
    sessions: web::Data<SessionStore>,
    req: HttpRequest,
) -> impl Responder {
    match current_session(&req, &sessions) {
        Some(session) => HttpResponse::Ok().json(SessionResponse {
            id: session.user_id,
            username: session.username,
            role: session.role,
            expires_at: session.expires_at,
        }),
        None => HttpResponse::Unauthorized().json(MessageResponse {
            message: "Not authenticated".into(),
        }),
    }
}
