// Repository functions. Each takes the connection or open transaction it
// should run on, so callers decide the transaction boundary.

pub mod exercise_types;
pub mod training_blocks;
pub mod training_plans;
pub mod users;
pub mod workouts;

use sqlx::{pool::PoolConnection, Sqlite, SqlitePool, Transaction};

/// Read and write handles onto one SQLite database.
///
/// Writes go through a pool holding a single connection, so write
/// transactions queue on the pool instead of racing for SQLite's write lock.
/// A deferred transaction that reads before it writes cannot upgrade its lock
/// while another writer is active, and SQLite fails it with `SQLITE_BUSY`
/// without waiting.
#[derive(Clone, Debug)]
pub struct Database {
    reader: SqlitePool,
    writer: SqlitePool,
}

impl Database {
    pub fn new(reader: SqlitePool, writer: SqlitePool) -> Self {
        Self { reader, writer }
    }

    /// Both handles share one pool, e.g. a single-connection in-memory database.
    pub fn single(pool: SqlitePool) -> Self {
        Self {
            reader: pool.clone(),
            writer: pool,
        }
    }

    pub async fn read(&self) -> Result<PoolConnection<Sqlite>, sqlx::Error> {
        self.reader.acquire().await
    }

    /// Start a write transaction; dropping it without commit rolls back.
    pub async fn write(&self) -> Result<Transaction<'static, Sqlite>, sqlx::Error> {
        self.writer.begin().await
    }

    pub fn reader(&self) -> &SqlitePool {
        &self.reader
    }

    pub fn writer(&self) -> &SqlitePool {
        &self.writer
    }

    pub async fn close(&self) {
        self.writer.close().await;
        self.reader.close().await;
    }
}
