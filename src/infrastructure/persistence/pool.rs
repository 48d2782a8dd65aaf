//! SQLite connection pool setup and migrations.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Pool settings taken from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

/// Opens the SQLite pool, creating the database file and its directory if needed.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the directory cannot be created, or
/// the first connection fails.
pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<SqlitePool> {
    ensure_parent_dir(database_url)?;

    let options = SqliteConnectOptions::from_str(database_url)
        .with_context(|| format!("Invalid database URL '{database_url}'"))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .connect_with(options)
        .await
        .context("Failed to connect to database")?;

    Ok(pool)
}

/// Applies the embedded migrations from `./migrations`.
///
/// # Errors
///
/// Returns an error if a migration fails.
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    Ok(())
}

/// Creates the directory holding a file-backed database.
fn ensure_parent_dir(database_url: &str) -> Result<()> {
    let Some(path) = database_file_path(database_url) else {
        return Ok(());
    };

    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create database directory {}", parent.display()))?;
    }

    Ok(())
}

/// Extracts the file path from `sqlite://path?opts`; `None` for in-memory databases.
fn database_file_path(database_url: &str) -> Option<&str> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);

    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_file_path() {
        assert_eq!(
            database_file_path("sqlite://data/app.sqlite3?mode=rwc"),
            Some("data/app.sqlite3")
        );
        assert_eq!(database_file_path("sqlite:app.db"), Some("app.db"));
        assert_eq!(database_file_path("sqlite::memory:"), None);
        assert_eq!(database_file_path("postgres://localhost/db"), None);
    }
}
