use actix_web::{HttpResponse, Responder};
use serde_json::json;

pub mod auth;
#[allow(clippy::module_inception)]
pub mod routes;

pub mod admin {
    pub mod admin_handlers;
    pub mod admin_models;
}

pub mod login {
    pub mod login_handlers;
    pub mod login_models;
}

pub mod pages {
    pub mod pages_handlers;
}

pub async fn health() -> impl Responder {
    HttpResponse::Ok().json(json!({ "status": "ok" }))
}
