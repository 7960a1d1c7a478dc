//! SQLite-backed store: one `kv` table keyed by scope and key.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;

use super::{KeyValueStore, Scope, StoreError};

#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database file and run migrations.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        // Ensure the parent directory exists
        if let Some(parent) = db_path.parent() {
            tokio::fs::create_dir_all(parent).await.ok();
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(std::time::Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        run_migrations(&pool).await?;

        Ok(Self { pool })
    }
}

async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS kv (
            scope TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (scope, key)
        );
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[async_trait]
impl KeyValueStore for SqliteStore {
    async fn list(&self, prefix: &str, scope: Scope) -> Result<Vec<String>, StoreError> {
        // Literal, case-sensitive prefix match.
        let rows = sqlx::query(
            "SELECT key FROM kv WHERE scope = ? AND substr(key, 1, length(?)) = ? ORDER BY key",
        )
        .bind(scope.as_str())
        .bind(prefix)
        .bind(prefix)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(|row| row.get("key")).collect())
    }

    async fn get(&self, key: &str, scope: Scope) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv WHERE scope = ? AND key = ?")
            .bind(scope.as_str())
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    async fn set(&self, key: &str, value: &str, scope: Scope) -> Result<(), StoreError> {
        let now = Utc::now().to_rfc3339();
        sqlx::query(
            "INSERT INTO kv (scope, key, value, updated_at) VALUES (?, ?, ?, ?) \
             ON CONFLICT(scope, key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(scope.as_str())
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, key: &str, scope: Scope) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM kv WHERE scope = ? AND key = ?")
            .bind(scope.as_str())
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
