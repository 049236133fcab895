//! SQLite-backed persistent store.

mod blocklist;
mod profiles;
mod quota;
mod runtime;

#[cfg(test)]
mod tests;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use streamlate_core::config::{shellexpand, StoreConfig};
use streamlate_core::error::StreamlateError;
use tracing::info;

pub use blocklist::ToggleOutcome;
pub use quota::QuotaSnapshot;

/// Persistent store backed by SQLite.
#[derive(Clone)]
pub struct Store {
    pub(crate) pool: SqlitePool,
}

impl Store {
    /// Create a new store, running migrations on first use.
    pub async fn new(config: &StoreConfig) -> Result<Self, StreamlateError> {
        let db_path = shellexpand(&config.db_path);
        let in_memory = db_path == ":memory:";

        // Ensure parent directory exists.
        if !in_memory {
            if let Some(parent) = std::path::Path::new(&db_path).parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StreamlateError::Store(format!("failed to create data dir: {e}"))
                })?;
            }
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))
            .map_err(|e| StreamlateError::Store(format!("invalid db path: {e}")))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal);

        // Each connection to :memory: would get its own database, so the
        // in-memory store is pinned to a single connection.
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 4 })
            .connect_with(opts)
            .await
            .map_err(|e| StreamlateError::Store(format!("failed to connect to sqlite: {e}")))?;

        Self::run_migrations(&pool).await?;

        info!("Store initialized at {db_path}");

        Ok(Self { pool })
    }

    /// Run SQL migrations, tracking which have already been applied.
    pub(crate) async fn run_migrations(pool: &SqlitePool) -> Result<(), StreamlateError> {
        sqlx::raw_sql(
            "CREATE TABLE IF NOT EXISTS _migrations (
                name TEXT PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );",
        )
        .execute(pool)
        .await
        .map_err(|e| StreamlateError::Store(format!("failed to create migrations table: {e}")))?;

        let migrations: &[(&str, &str)] =
            &[("001_init", include_str!("../migrations/001_init.sql"))];

        for (name, sql) in migrations {
            let applied: Option<(String,)> =
                sqlx::query_as("SELECT name FROM _migrations WHERE name = ?")
                    .bind(name)
                    .fetch_optional(pool)
                    .await
                    .map_err(|e| StreamlateError::Store(format!("migration check failed: {e}")))?;

            if applied.is_none() {
                sqlx::raw_sql(sql)
                    .execute(pool)
                    .await
                    .map_err(|e| StreamlateError::Store(format!("migration {name} failed: {e}")))?;
                sqlx::query("INSERT INTO _migrations (name) VALUES (?)")
                    .bind(name)
                    .execute(pool)
                    .await
                    .map_err(|e| {
                        StreamlateError::Store(format!("failed to record migration {name}: {e}"))
                    })?;
                info!("applied migration {name}");
            }
        }

        Ok(())
    }
}
