use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder, Route};
use log::{error, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use crate::config::AppConfig;
use crate::models::role::Role;
use crate::routes::auth::authorize;
use crate::session::SessionStore;

pub const LOGIN_PAGE: &str = "index.html";

// Pages served only to a live session of the given role
pub const PROTECTED_PAGES: [(&str, Role); 3] = [
    ("student.html", Role::Student),
    ("teacher.html", Role::Teacher),
    ("admin.html", Role::Admin),
];

async fn serve_file(config: &AppConfig, relative: &Path) -> HttpResponse {
    let path = config.public_dir.join(relative);
    match tokio::fs::read(&path).await {
        Ok(contents) => HttpResponse::Ok()
            .content_type(mime_guess::from_path(&path).first_or_octet_stream())
            .body(contents),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("No public file at {}", path.display());
            HttpResponse::NotFound().finish()
        }
        Err(e) => {
            error!("Failed to read {}: {}", path.display(), e);
            HttpResponse::NotFound().finish()
        }
    }
}

/// Relative path under the public directory for a request path. Refuses
/// `.`/`..` segments, dotfiles, backslashes and drive prefixes.
pub fn public_path(request_path: &str) -> Option<PathBuf> {
    let mut path = PathBuf::new();
    for segment in request_path.split('/') {
        if segment.is_empty() {
            continue;
        }
        if segment.starts_with('.') || segment.contains(|c| matches!(c, '\\' | ':' | '\0')) {
            return None;
        }
        path.push(segment);
    }
    if path.as_os_str().is_empty() {
        None
    } else {
        Some(path)
    }
}

fn redirect_to_login() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, format!("/{}", LOGIN_PAGE)))
        .finish()
}

pub async fn index(config: web::Data<AppConfig>) -> impl Responder {
    serve_file(&config, Path::new(LOGIN_PAGE)).await
}

pub async fn protected_page(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
    page: &'static str,
    role: Role,
) -> HttpResponse {
    match authorize(&req, &sessions, role) {
        Ok(session) => {
            info!("Serving {} to {}", page, session.username);
            serve_file(&config, Path::new(page)).await
        }
        Err(_) => redirect_to_login(),
    }
}

pub fn protected(page: &'static str, role: Role) -> Route {
    web::get().to(
        move |req: HttpRequest, sessions: web::Data<SessionStore>, config: web::Data<AppConfig>| {
            protected_page(req, sessions, config, page, role)
        },
    )
}

/// Fallback for everything else under the public directory. Protected pages
/// reached through another spelling stay behind their role check.
pub async fn static_asset(
    req: HttpRequest,
    sessions: web::Data<SessionStore>,
    config: web::Data<AppConfig>,
) -> HttpResponse {
    let relative = match public_path(req.match_info().query("path")) {
        Some(relative) => relative,
        None => {
            info!("Refused public path {}", req.path());
            return HttpResponse::NotFound().finish();
        }
    };

    let protected = relative.to_str().and_then(|relative| {
        PROTECTED_PAGES
            .iter()
            .copied()
            .find(|(page, _)| relative.eq_ignore_ascii_case(page))
    });
    if let Some((page, role)) = protected {
        return protected_page(req, sessions, config, page, role).await;
    }

    serve_file(&config, &relative).await
}
