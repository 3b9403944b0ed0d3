use actix_web::web;

use super::login::login_handlers;

pub fn login_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/login", web::post().to(login_handlers::login))
        .route("/logout", web::post().to(login_handlers::logout))
        .route("/session", web::get().to(login_handlers::session_info));
}

use super::admin::admin_handlers;

pub fn admin_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/sessions", web::get().to(admin_handlers::session_count))
            .route("/sessions/reset", web::post().to(admin_handlers::session_reset))
    );
}

// A scope swallows every path under its prefix, so all of /api lives in one
pub fn api_configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(admin_configure)
            .configure(login_configure)
    );
}

use super::pages::pages_handlers;

pub fn pages_configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(pages_handlers::index))
        .route("/index.html", web::get().to(pages_handlers::index))
        .route("/health", web::get().to(super::health));
    for (page, role) in pages_handlers::PROTECTED_PAGES {
        cfg.route(&format!("/{}", page), pages_handlers::protected(page, role));
    }
    // everything else under PUBLIC_DIR, registered last
    cfg.route("/{path:.*}", web::get().to(pages_handlers::static_asset));
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    api_configure(cfg);
    pages_configure(cfg);
}
