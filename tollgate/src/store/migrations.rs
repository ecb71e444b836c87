//! Store schema management.
//!
//! Handles schema initialization and version checking on open.

use rusqlite::Connection;

use crate::error::{Error, Result};

use super::schema::{
    CREATE_DISPOSITION_INDEX, CREATE_METADATA_TABLE, CREATE_RESERVATIONS_TABLE,
    CREATE_SETTLEMENTS_TABLE, CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION,
    SELECT_SCHEMA_VERSION,
};

/// Initializes the store schema.
///
/// Creates all tables and indices and records the schema version. Safe
/// only on a store that has not been initialized yet.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_RESERVATIONS_TABLE, [])?;
    conn.execute(CREATE_SETTLEMENTS_TABLE, [])?;
    conn.execute(CREATE_DISPOSITION_INDEX, [])?;
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION])?;
    Ok(())
}

/// Gets the current schema version from the store.
///
/// Returns 0 when the metadata table is missing or carries no version,
/// which marks a store that still needs initialization.
///
/// # Errors
///
/// Returns an error if the query fails for any other reason.
pub fn get_schema_version(conn: &Connection) -> Result<i32> {
    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| {
        let value: String = row.get(0)?;
        value
            .parse::<i32>()
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
    }) {
        Ok(version) => Ok(version),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(rusqlite::Error::SqliteFailure(sqlite_err, message)) => {
            // "no such table" means a fresh store
            if message
                .as_deref()
                .is_some_and(|m| m.contains("no such table"))
            {
                Ok(0)
            } else {
                Err(rusqlite::Error::SqliteFailure(sqlite_err, message).into())
            }
        }
        Err(e) => Err(e.into()),
    }
}

/// Checks schema compatibility, initializing a fresh store.
///
/// # Errors
///
/// Returns `UnsupportedSchemaVersion` when the store was written by a
/// different schema revision, or a database error if initialization
/// fails.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;

    if version == 0 {
        return initialize_schema(conn);
    }
    if version != CURRENT_SCHEMA_VERSION {
        return Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        });
    }
    Ok(())
}
