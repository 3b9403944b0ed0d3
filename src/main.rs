use actix_web::{web, App, HttpServer};
use dotenv::dotenv;
use log::{error, info, warn};
use std::io;

mod config;
mod db;
mod models;
mod routes;
mod session;

use config::{AdminSeed, AppConfig};
use models::role::Role;
use session::{spawn_sweeper, SessionStore};

fn startup_error<E>(context: &str, e: E) -> io::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    error!("{}: {}", context, e);
    io::Error::new(io::ErrorKind::Other, e)
}

async fn seed_admin(pool: &sqlx::SqlitePool, seed: &AdminSeed) -> io::Result<()> {
    if db::user_exists(pool, &seed.username)
        .await
        .map_err(|e| startup_error("Failed to look up admin user", e))?
    {
        return Ok(());
    }

    let hash = bcrypt::hash(&seed.password, bcrypt::DEFAULT_COST)
        .map_err(|e| startup_error("Failed to hash admin password", e))?;
    if db::insert_user(pool, &seed.username, &hash, Role::Admin)
        .await
        .map_err(|e| startup_error("Failed to create admin user", e))?
    {
        info!("Created admin user {}", seed.username);
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().map_err(|e| startup_error("Invalid configuration", e))?;

    let pool = db::connect(&config.database_url)
        .await
        .map_err(|e| startup_error("Failed to create pool", e))?;
    db::init_schema(&pool)
        .await
        .map_err(|e| startup_error("Failed to initialize schema", e))?;

    match &config.admin_seed {
        Some(seed) => seed_admin(&pool, seed).await?,
        None => {
            if !db::user_exists_with_role(&pool, Role::Admin)
                .await
                .map_err(|e| startup_error("Failed to look up admin users", e))?
            {
                warn!("No admin user exists; set ADMIN_USERNAME and ADMIN_PASSWORD to create one");
            }
        }
    }

    // One table shared by every worker
    let sessions = web::Data::new(SessionStore::new());
    if let Some(every) = config.sweep_interval {
        info!("Sweeping expired sessions every {:?}", every);
        spawn_sweeper(sessions.clone().into_inner(), every);
    }

    let server_address = config.server_address.clone();
    info!("Server running at http://{}", server_address);

    let pool = web::Data::new(pool);
    let config = web::Data::new(config);
    HttpServer::new(move || {
        App::new()
            .app_data(pool.clone())
            .app_data(sessions.clone())
            .app_data(config.clone())
            .configure(routes::routes::configure)
    })
    .bind(server_address)?
    .run()
    .await
}
