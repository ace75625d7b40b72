//! Database initialization
//!
//! The store runs on exactly one SQLite connection for the life of the
//! process. The pool is capped at one connection and never reaps it, so an
//! in-memory database survives between operations.

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::config::StoreConfig;
use crate::Result;

/// Current schema version recorded in `schema_version`
pub const SCHEMA_VERSION: i64 = 1;

/// Open (creating if needed) the database file and ensure the schema exists
pub async fn init_database(db_path: &Path, config: &StoreConfig) -> Result<SqlitePool> {
    let newly_created = !db_path.exists();

    // Create parent directory if it doesn't exist
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal);

    let pool = single_connection()
        .connect_with(apply_store_options(options, config))
        .await?;

    if newly_created {
        info!("Initialized new database: {}", db_path.display());
    } else {
        info!("Opened existing database: {}", db_path.display());
    }

    create_schema(&pool).await?;
    log_policies(config);

    Ok(pool)
}

/// Open a private in-memory database with the full schema
pub async fn connect_memory(config: &StoreConfig) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?;

    let pool = single_connection()
        .connect_with(apply_store_options(options, config))
        .await?;

    create_schema(&pool).await?;

    Ok(pool)
}

fn single_connection() -> SqlitePoolOptions {
    SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
}

fn apply_store_options(
    options: SqliteConnectOptions,
    config: &StoreConfig,
) -> SqliteConnectOptions {
    // sqlx enables foreign keys by default; enforcement is a deployment choice here
    options
        .foreign_keys(config.enforce_foreign_keys)
        .busy_timeout(Duration::from_millis(config.busy_timeout_ms))
}

fn log_policies(config: &StoreConfig) {
    info!(
        "Store policies: vote_policy={:?}, foreign_keys={}, operation_timeout_ms={}",
        config.vote_policy, config.enforce_foreign_keys, config.operation_timeout_ms
    );
}

/// Create all tables (idempotent)
pub async fn create_schema(pool: &SqlitePool) -> Result<()> {
    create_schema_version_table(pool).await?;
    create_parties_table(pool).await?;
    create_candidates_table(pool).await?;
    create_votes_table(pool).await?;

    sqlx::query("INSERT OR IGNORE INTO schema_version (version) VALUES (?)")
        .bind(SCHEMA_VERSION)
        .execute(pool)
        .await?;

    Ok(())
}

async fn create_schema_version_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_parties_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS parties (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Candidates keep `party_id` when the party is deleted (no cascade)
async fn create_candidates_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS candidates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            industry_connected BOOLEAN NOT NULL,
            party_id INTEGER REFERENCES parties(id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Votes are append-only; `voter_id` is indexed but not unique
async fn create_votes_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS votes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            voter_id TEXT NOT NULL,
            candidate_id INTEGER NOT NULL REFERENCES candidates(id),
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_votes_voter_id ON votes(voter_id)")
        .execute(pool)
        .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_votes_candidate_id ON votes(candidate_id)")
        .execute(pool)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_memory_creates_tables() {
        let pool = connect_memory(&StoreConfig::default())
            .await
            .expect("Failed to create in-memory database");

        let tables: Vec<(String,)> = sqlx::query_as(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY name",
        )
        .fetch_all(&pool)
        .await
        .unwrap();

        let names: Vec<&str> = tables.iter().map(|(name,)| name.as_str()).collect();
        assert_eq!(names, vec!["candidates", "parties", "schema_version", "votes"]);
    }

    #[tokio::test]
    async fn test_create_schema_idempotent() {
        let pool = connect_memory(&StoreConfig::default()).await.unwrap();

        create_schema(&pool).await.expect("Second schema pass should succeed");

        let versions: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM schema_version")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[tokio::test]
    async fn test_foreign_keys_follow_config() {
        let relaxed = connect_memory(&StoreConfig::default()).await.unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&relaxed)
            .await
            .unwrap();
        assert_eq!(enabled, 0);

        let strict = connect_memory(&StoreConfig {
            enforce_foreign_keys: true,
            ..StoreConfig::default()
        })
        .await
        .unwrap();
        let enabled: i64 = sqlx::query_scalar("PRAGMA foreign_keys")
            .fetch_one(&strict)
            .await
            .unwrap();
        assert_eq!(enabled, 1);
    }
}
