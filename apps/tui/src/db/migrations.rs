use crate::config::init_app_config;
use color_eyre::Result;
use sqlx::{migrate::MigrateDatabase, query, sqlite::SqlitePoolOptions, Sqlite, SqlitePool};

/// Sets up the database by creating the necessary tables if they don't exist
pub async fn setup_database(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    // Key-value preference store (holds the desired gate count)
    query(
        "CREATE TABLE IF NOT EXISTS preference (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
    )
    .execute(pool)
    .await?;

    // Moon journal
    query(
        "CREATE TABLE IF NOT EXISTS journal (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            entry_date TEXT NOT NULL,
            phase TEXT NOT NULL,
            mood TEXT NOT NULL DEFAULT '',
            activities TEXT NOT NULL DEFAULT '',
            reflections TEXT NOT NULL DEFAULT '',
            goals TEXT NOT NULL DEFAULT ''
        )",
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Creates a database connection pool using the database URL from config
pub async fn create_database_pool() -> Result<SqlitePool> {
    let (database_url, _) = init_app_config()?;

    if !Sqlite::database_exists(&database_url).await.unwrap_or(false) {
        Sqlite::create_database(&database_url)
            .await
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create database: {e}"))?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(4)
        .connect(&database_url)
        .await?;

    setup_database(&pool).await?;

    Ok(pool)
}
