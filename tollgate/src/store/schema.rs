//! Store schema definitions and SQL constants.
//!
//! This module contains all SQL table definitions, indices, metadata
//! keys, and statements for the tollgate ledger store.
//!
//! Amounts are stored as decimal TEXT: deposits are 128-bit values and do
//! not fit SQLite's signed 64-bit integers in general.

/// Current schema version for the store.
///
/// The version is stored in the metadata table and checked on open to
/// ensure compatibility between the store and the library.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// SQL statement to create the metadata table.
///
/// Holds the schema version, the ledger parameters frozen at
/// initialization, and the aggregate balances rewritten with every
/// operation.
pub const CREATE_METADATA_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS metadata (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL
    )";

/// SQL statement to create the reservations table.
///
/// One row per active reservation, keyed by slot index. Settled
/// reservations are deleted here and appended to `settlements`.
pub const CREATE_RESERVATIONS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS reservations (
        slot INTEGER PRIMARY KEY,
        requester TEXT NOT NULL,
        deposit TEXT NOT NULL,
        staked INTEGER NOT NULL,
        shortfall TEXT NOT NULL,
        created_at INTEGER NOT NULL
    )";

/// SQL statement to create the settlements audit table.
///
/// Append-only history: freeing a slot never erases the record of what
/// occupied it or how its deposit was disposed of.
pub const CREATE_SETTLEMENTS_TABLE: &str = r"
    CREATE TABLE IF NOT EXISTS settlements (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        slot INTEGER NOT NULL,
        requester TEXT NOT NULL,
        amount TEXT NOT NULL,
        disposition TEXT NOT NULL,
        reserved_at INTEGER NOT NULL,
        settled_at INTEGER NOT NULL
    )";

/// SQL statement to create an index on the settlements disposition.
///
/// Speeds up audit queries that separate collections from forfeitures.
pub const CREATE_DISPOSITION_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_settlements_disposition ON settlements(disposition)";

/// SQL statement to select the schema version from the metadata table.
pub const SELECT_SCHEMA_VERSION: &str = "SELECT value FROM metadata WHERE key = 'schema_version'";

/// SQL statement to insert or update the schema version.
pub const INSERT_SCHEMA_VERSION: &str =
    "INSERT OR REPLACE INTO metadata (key, value) VALUES ('schema_version', ?)";

/// SQL statement to read a metadata value by key.
pub const SELECT_METADATA: &str = "SELECT value FROM metadata WHERE key = ?";

/// SQL statement to insert or update a metadata value.
pub const UPSERT_METADATA: &str = "INSERT OR REPLACE INTO metadata (key, value) VALUES (?, ?)";

/// SQL statement to insert an active reservation.
pub const INSERT_RESERVATION: &str = r"
    INSERT INTO reservations (slot, requester, deposit, staked, shortfall, created_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

/// SQL statement to delete an active reservation by slot.
pub const DELETE_RESERVATION: &str = "DELETE FROM reservations WHERE slot = ?";

/// SQL statement to list active reservations in slot order.
pub const LIST_RESERVATIONS: &str = r"
    SELECT slot, requester, deposit, staked, shortfall, created_at
    FROM reservations
    ORDER BY slot
";

/// SQL statement to append a settlement audit row.
pub const INSERT_SETTLEMENT: &str = r"
    INSERT INTO settlements (slot, requester, amount, disposition, reserved_at, settled_at)
    VALUES (?, ?, ?, ?, ?, ?)
";

/// SQL statement to list settlement history in settlement order.
pub const LIST_SETTLEMENTS: &str = r"
    SELECT slot, requester, amount, disposition, reserved_at, settled_at
    FROM settlements
    ORDER BY id
";

// Metadata keys for the frozen ledger parameters.

/// Metadata key: service name.
pub const META_SERVICE_NAME: &str = "service_name";
/// Metadata key: operator identity.
pub const META_OPERATOR: &str = "operator";
/// Metadata key: canonical connection price.
pub const META_PRICE: &str = "price";
/// Metadata key: fixed slot capacity.
pub const META_MAX_SLOTS: &str = "max_slots";
/// Metadata key: maturity window in seconds.
pub const META_MATURITY_SECONDS: &str = "maturity_seconds";

// Metadata keys for the aggregate balances.

/// Metadata key: escrow balance.
pub const META_ESCROW: &str = "escrow";
/// Metadata key: outstanding stake aggregate.
pub const META_STAKE_DUE: &str = "stake_due";
/// Metadata key: collected operator revenue.
pub const META_REVENUE: &str = "revenue";
/// Metadata key: forfeited total.
pub const META_FORFEITED: &str = "forfeited";
