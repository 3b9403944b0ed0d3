use log::info;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use crate::models::role::Role;

const CREATE_USERS: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL CHECK (role IN ('student', 'teacher', 'admin'))
    )
";

pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    if let Some(parent) = database_file(database_url).and_then(Path::parent) {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
}

// Filesystem path behind a sqlite URL, None for in-memory databases
fn database_file(database_url: &str) -> Option<&Path> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))
        .unwrap_or(database_url);
    let path = rest.split('?').next().unwrap_or(rest);
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(Path::new(path))
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_USERS).execute(pool).await?;
    info!("Database schema ready");
    Ok(())
}

/// Inserts a user unless the username is taken. Returns whether a row was added.
pub async fn insert_user(
    pool: &SqlitePool,
    username: &str,
    password_hash: &str,
    role: Role,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO users (username, password_hash, role) VALUES (?, ?, ?)",
    )
    .bind(username)
    .bind(password_hash)
    .bind(role.as_str())
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn user_exists(pool: &SqlitePool, username: &str) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}

pub async fn user_exists_with_role(pool: &SqlitePool, role: Role) -> Result<bool, sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
        .bind(role.as_str())
        .fetch_one(pool)
        .await?;
    Ok(count > 0)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_file_from_url() {
        assert_eq!(database_file("sqlite://data/app.db"), Some(Path::new("data/app.db")));
        assert_eq!(database_file("sqlite:app.db?mode=rwc"), Some(Path::new("app.db")));
        assert_eq!(database_file("sqlite::memory:"), None);
        assert_eq!(database_file("data/app.db"), Some(Path::new("data/app.db")));
    }

    #[actix_web::test]
    async fn insert_user_ignores_duplicates() {
        let pool = testing::memory_pool().await;
        assert!(insert_user(&pool, "li", "hash", Role::Teacher).await.unwrap());
        assert!(!insert_user(&pool, "li", "other", Role::Admin).await.unwrap());
        assert!(user_exists(&pool, "li").await.unwrap());
        assert!(!user_exists(&pool, "wang").await.unwrap());
        assert!(user_exists_with_role(&pool, Role::Teacher).await.unwrap());
        assert!(!user_exists_with_role(&pool, Role::Admin).await.unwrap());
    }

    #[actix_web::test]
    async fn schema_rejects_unknown_roles() {
        let pool = testing::memory_pool().await;
        let result = sqlx::query("INSERT INTO users (username, password_hash, role) VALUES ('x', 'h', 'root')")
            .execute(&pool)
            .await;
        assert!(result.is_err());
    }
}
