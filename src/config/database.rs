use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::db::Database;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://gym_tracker.db".to_string());

        let max_connections = env::var("DB_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let min_connections = env::var("DB_MIN_CONNECTIONS")
            .unwrap_or_else(|_| "1".to_string())
            .parse()
            .unwrap_or(1);

        let connect_timeout_secs = env::var("DB_CONNECT_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        let idle_timeout_secs = env::var("DB_IDLE_TIMEOUT")
            .unwrap_or_else(|_| "600".to_string())
            .parse()
            .unwrap_or(600);

        Ok(DatabaseConfig {
            database_url,
            max_connections,
            min_connections,
            connect_timeout: Duration::from_secs(connect_timeout_secs),
            idle_timeout: Duration::from_secs(idle_timeout_secs),
        })
    }

    /// Private in-memory database, used by tests.
    pub fn in_memory() -> Self {
        DatabaseConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(600),
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Open the database. A file database gets a single-connection writer
    /// pool next to a reader pool of `max_connections`; an in-memory database
    /// shares one connection for both.
    pub async fn connect(&self) -> Result<Database> {
        if self.is_in_memory() {
            return Ok(Database::single(self.create_pool().await?));
        }

        let options = self
            .connect_options()?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        // The writer opens first so it creates the file and switches it to WAL.
        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(Some(self.idle_timeout))
            .acquire_timeout(self.connect_timeout)
            .connect_with(options.clone())
            .await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(self.max_connections.max(1))
            .min_connections(self.min_connections)
            .idle_timeout(Some(self.idle_timeout))
            .acquire_timeout(self.connect_timeout)
            .connect_with(options)
            .await?;

        Ok(Database::new(reader, writer))
    }

    pub async fn create_pool(&self) -> Result<SqlitePool> {
        let options = self.connect_options()?.busy_timeout(BUSY_TIMEOUT);

        // Every connection to an in-memory database sees its own empty
        // database, so the pool must hold exactly one that never expires.
        let pool_options = if self.is_in_memory() {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(self.max_connections)
                .min_connections(self.min_connections)
                .idle_timeout(Some(self.idle_timeout))
        };

        let pool = pool_options
            .acquire_timeout(self.connect_timeout)
            .connect_with(options)
            .await?;

        Ok(pool)
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(&self.database_url)
            .with_context(|| format!("Invalid DATABASE_URL '{}'", self.database_url))?
            .create_if_missing(true)
            .foreign_keys(true);
        Ok(options)
    }
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_detection() {
        assert!(DatabaseConfig::in_memory().is_in_memory());

        let mut config = DatabaseConfig::in_memory();
        config.database_url = "sqlite://gym_tracker.db".to_string();
        assert!(!config.is_in_memory());

        config.database_url = "sqlite:file:shared?mode=memory&cache=shared".to_string();
        assert!(config.is_in_memory());
    }

    #[tokio::test]
    async fn test_in_memory_pool_enforces_foreign_keys() {
        let db = DatabaseConfig::in_memory().connect().await.unwrap();
        run_migrations(db.writer()).await.unwrap();

        let result = sqlx::query(
            "INSERT INTO training_plans (user_id, name, created_at, updated_at) \
             VALUES (999, 'Orphan', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(db.writer())
        .await;

        let err = result.unwrap_err();
        let db_err = err.as_database_error().unwrap();
        assert!(db_err.is_foreign_key_violation());
    }

    #[tokio::test]
    async fn test_file_database_uses_single_writer_in_wal_mode() {
        let dir = tempfile::tempdir().unwrap();
        let config = DatabaseConfig {
            database_url: format!("sqlite://{}", dir.path().join("gym.db").display()),
            max_connections: 4,
            ..DatabaseConfig::in_memory()
        };

        let db = config.connect().await.unwrap();
        run_migrations(db.writer()).await.unwrap();
        assert_eq!(db.writer().options().get_max_connections(), 1);
        assert_eq!(db.reader().options().get_max_connections(), 4);

        let mode: String = sqlx::query_scalar("PRAGMA journal_mode")
            .fetch_one(db.reader())
            .await
            .unwrap();
        assert_eq!(mode, "wal");

        db.close().await;
    }
}
