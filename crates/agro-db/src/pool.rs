//! # SQLite Store
//!
//! Connection pool configuration and the SQLite-backed [`KeyValueStore`].
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         SqliteStore                                     │
//! │                                                                         │
//! │  caller (sync)                                                          │
//! │       │  store.get("pos_demo_cart_v1")                                 │
//! │       ▼                                                                 │
//! │  ┌──────────────────────┐   block_on   ┌──────────────────────────┐    │
//! │  │ current-thread tokio │─────────────►│       SqlitePool         │    │
//! │  │      Runtime         │              │  ┌─────┐ ┌─────┐         │    │
//! │  └──────────────────────┘              │  │Conn1│ │Conn2│ ...     │    │
//! │                                        │  └─────┘ └─────┘         │    │
//! │                                        └────────────┬─────────────┘    │
//! │                                                     ▼                   │
//! │                                         kv_store(key, value, updated_at)│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The runtime is private, so callers stay synchronous. Do not call these
//! methods from inside another tokio runtime.
//!
//! ## WAL Mode
//! File databases run in WAL mode with NORMAL synchronous, so a crash can
//! lose at most the last write and never corrupts the file.

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::future::Future;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::store::KeyValueStore;

const IN_MEMORY_PATH: &str = ":memory:";

// =============================================================================
// Configuration
// =============================================================================

/// Database configuration.
///
/// ## Example
/// ```rust,ignore
/// let store = SqliteStore::open(DbConfig::new("/path/to/agropos.db"))?;
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Path to the SQLite database file.
    pub database_path: PathBuf,

    /// Maximum number of connections in the pool.
    /// Default: 2 (one counter, one writer at a time)
    pub max_connections: u32,

    /// Minimum number of connections to keep alive.
    /// Default: 1
    pub min_connections: u32,

    /// Connection timeout duration.
    /// Default: 30 seconds
    pub connect_timeout: Duration,

    /// Idle timeout before closing a connection. `None` keeps connections open.
    /// Default: 10 minutes
    pub idle_timeout: Option<Duration>,

    /// Whether to run migrations on open.
    /// Default: true
    pub run_migrations: bool,
}

impl DbConfig {
    /// Creates a configuration for the given file. The file (and its parent
    /// directory) is created if missing.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            database_path: path.into(),
            max_connections: 2,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Some(Duration::from_secs(600)),
            run_migrations: true,
        }
    }

    /// In-memory database (for tests and throwaway sessions).
    ///
    /// A single connection that never idles out; the data lives exactly as
    /// long as that connection.
    pub fn in_memory() -> Self {
        DbConfig {
            database_path: PathBuf::from(IN_MEMORY_PATH),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: None,
            run_migrations: true,
        }
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_path.as_os_str() == IN_MEMORY_PATH
    }
}

// =============================================================================
// SqliteStore
// =============================================================================

/// SQLite-backed key-value store.
#[derive(Debug)]
pub struct SqliteStore {
    // Dropped before the runtime that drives it
    pool: SqlitePool,
    runtime: Runtime,
}

impl SqliteStore {
    /// Opens (or creates) the database.
    ///
    /// ## What This Does
    /// 1. Starts a private current-thread runtime
    /// 2. Creates the parent directory and database file if needed
    /// 3. Configures WAL + NORMAL synchronous for file databases
    /// 4. Creates the connection pool
    /// 5. Runs migrations (if enabled)
    pub fn open(config: DbConfig) -> DbResult<Self> {
        info!(
            path = %config.database_path.display(),
            "Opening SQLite store"
        );

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let connect_options = if config.is_in_memory() {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?
        } else {
            if let Some(parent) = config.database_path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
                }
            }

            SqliteConnectOptions::new()
                .filename(&config.database_path)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .create_if_missing(true)
        };

        debug!("Connection options configured");

        let pool = runtime
            .block_on(
                SqlitePoolOptions::new()
                    .max_connections(config.max_connections)
                    .min_connections(config.min_connections)
                    .acquire_timeout(config.connect_timeout)
                    .idle_timeout(config.idle_timeout)
                    .max_lifetime(if config.is_in_memory() {
                        None
                    } else {
                        Some(Duration::from_secs(30 * 60))
                    })
                    .connect_with(connect_options),
            )
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        info!(
            max_connections = config.max_connections,
            "Database pool created"
        );

        let store = SqliteStore { pool, runtime };

        if config.run_migrations {
            store.run_migrations()?;
        }

        Ok(store)
    }

    /// Shorthand for `SqliteStore::open(DbConfig::in_memory())`.
    pub fn in_memory() -> DbResult<Self> {
        SqliteStore::open(DbConfig::in_memory())
    }

    fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Applies pending migrations.
    pub fn run_migrations(&self) -> DbResult<()> {
        info!("Running database migrations");
        self.block_on(migrations::run_migrations(&self.pool))?;

        let (total, applied) = self.migration_status()?;
        info!(total, applied, "Migrations complete");
        Ok(())
    }

    /// `(total, applied)` migration counts.
    pub fn migration_status(&self) -> DbResult<(usize, usize)> {
        self.block_on(migrations::migration_status(&self.pool))
    }

    /// Closes the pool. Later operations fail with a connection error.
    pub fn close(&self) {
        info!("Closing database connection pool");
        self.block_on(self.pool.close());
    }
}

/// Closes the pool while its runtime is still alive.
impl Drop for SqliteStore {
    fn drop(&mut self) {
        if !self.pool.is_closed() {
            self.close();
        }
    }
}

impl KeyValueStore for SqliteStore {
    fn get(&self, key: &str) -> DbResult<Option<String>> {
        let value = self.block_on(
            sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?1")
                .bind(key)
                .fetch_optional(&self.pool),
        )?;

        debug!(key = %key, found = value.is_some(), "Store read");
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> DbResult<()> {
        let updated_at = chrono::Utc::now().to_rfc3339();

        self.block_on(
            sqlx::query(
                r#"
                INSERT INTO kv_store (key, value, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(updated_at)
            .execute(&self.pool),
        )?;

        debug!(key = %key, bytes = value.len(), "Store write");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_store() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get("missing").unwrap(), None);

        let (total, applied) = store.migration_status().unwrap();
        assert_eq!(total, applied);
        assert!(total >= 1);
    }

    #[test]
    fn test_get_set_upsert() {
        let store = SqliteStore::in_memory().unwrap();
        assert_eq!(store.get("k").unwrap(), None);

        store.set("k", "{\"a\":1}").unwrap();
        store.set("k", "{\"a\":2}").unwrap();
        store.set("j", "[]").unwrap();

        assert_eq!(store.get("k").unwrap().as_deref(), Some("{\"a\":2}"));
        assert_eq!(store.get("j").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("agropos.db");

        {
            let store = SqliteStore::open(DbConfig::new(&path)).unwrap();
            store.set("pos_demo_cart_v1", "{\"m_tea\":2}").unwrap();
            store.close();
        }

        let store = SqliteStore::open(DbConfig::new(&path)).unwrap();
        assert_eq!(
            store.get("pos_demo_cart_v1").unwrap().as_deref(),
            Some("{\"m_tea\":2}")
        );
    }

    #[test]
    fn test_closed_store_errors() {
        let store = SqliteStore::in_memory().unwrap();
        store.close();
        assert!(store.set("k", "v").is_err());
        assert!(store.get("k").is_err());
    }

    #[test]
    fn test_config_defaults() {
        let config = DbConfig::new("/tmp/test.db");

        assert_eq!(config.max_connections, 2);
        assert!(config.run_migrations);
        assert!(!config.is_in_memory());
        assert!(DbConfig::in_memory().is_in_memory());
    }
}
