//! Persistent storage for the ledger.
//!
//! The store wraps a `SQLite` database holding the frozen ledger
//! parameters, the active reservations, the aggregate balances, and the
//! append-only settlement history. Each caller-facing operation is
//! persisted in a single transaction, giving the whole-call atomicity
//! the ledger's execution model assumes.

pub mod migrations;
mod operations;
mod schema;

#[cfg(test)]
pub(crate) mod test_util;

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

use crate::error::Result;

pub use operations::SettlementRow;

/// Configuration for opening the ledger store.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tollgate::StoreConfig;
///
/// let config = StoreConfig::new("/tmp/tollgate.db")
///     .with_busy_timeout(Duration::from_secs(10));
/// assert!(config.auto_create);
/// ```
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// Busy timeout for database lock contention.
    pub busy_timeout: Duration,
    /// Whether to create the database (and parent directory) if missing.
    pub auto_create: bool,
    /// Whether to open the database in read-only mode.
    pub read_only: bool,
}

impl StoreConfig {
    /// Creates a store configuration with default settings.
    ///
    /// Defaults: 5 second busy timeout, auto-create on, read-write.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: Duration::from_millis(5000),
            auto_create: true,
            read_only: false,
        }
    }

    /// Sets the busy timeout duration.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Sets whether the store is created when missing.
    #[must_use]
    pub const fn with_auto_create(mut self, auto_create: bool) -> Self {
        self.auto_create = auto_create;
        self
    }

    /// Sets read-only mode.
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

/// The ledger store.
///
/// Manages a `SQLite` connection with WAL mode and a busy timeout, and
/// verifies the schema version on open.
///
/// # Examples
///
/// ```no_run
/// use tollgate::{Store, StoreConfig};
///
/// let store = Store::open(StoreConfig::new("/tmp/tollgate.db")).unwrap();
/// ```
#[derive(Debug)]
pub struct Store {
    conn: Connection,
    config: StoreConfig,
}

impl Store {
    /// Opens the store with the given configuration.
    ///
    /// Creates the parent directory when auto-create is enabled, applies
    /// the connection PRAGMAs, and initializes or verifies the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, the PRAGMAs
    /// cannot be applied, or the schema version is unsupported.
    pub fn open(config: StoreConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.read_only {
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;

        // PRAGMA journal_mode returns a row; the others do not.
        let _: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL")?;
        conn.execute_batch(&format!(
            "PRAGMA busy_timeout = {}",
            config.busy_timeout.as_millis()
        ))?;

        migrations::check_schema_compatibility(&conn)?;

        Ok(Self { conn, config })
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns the busy timeout the store was opened with.
    #[must_use]
    pub const fn busy_timeout(&self) -> Duration {
        self.config.busy_timeout
    }
}
