//! Error types for the tollgate library.
//!
//! This module provides the error hierarchy for all ledger operations,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::reservation::SlotIndex;

/// Result type alias for operations that may fail with a tollgate error.
///
/// # Examples
///
/// ```
/// use tollgate::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(7)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the tollgate library.
///
/// This enum encompasses all possible error conditions that can occur
/// during admission, settlement, and persistence operations. Every failure
/// is atomic: an operation that returns an error has made no state change.
#[derive(Debug, Error)]
pub enum Error {
    /// All capacity slots are occupied; the admission was refused and the
    /// deposit was not taken.
    #[error("capacity exhausted: all {capacity} slots are active")]
    CapacityExhausted {
        /// The fixed capacity of the pool.
        capacity: u32,
    },

    /// The caller identity does not match the role the operation requires.
    #[error("not authorized: operation requires {required}, called by {caller}")]
    NotAuthorized {
        /// The identity or role the operation requires.
        required: String,
        /// The identity that attempted the operation.
        caller: String,
    },

    /// A slot index referenced a non-existent or already-settled reservation.
    #[error("invalid slot {slot}: {reason}")]
    InvalidSlot {
        /// The offending slot index.
        slot: SlotIndex,
        /// The reason the slot is invalid.
        reason: String,
    },

    /// A validation error occurred.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// The ledger state no longer satisfies its own invariants.
    ///
    /// This is never the caller's fault; it indicates a bug or tampered
    /// storage and the ledger should not be trusted until inspected.
    #[error("ledger corruption detected: {details}")]
    LedgerCorruption {
        /// Details about the detected divergence.
        details: String,
    },

    /// The store exists but has never been initialized with ledger
    /// parameters.
    #[error("ledger not initialized (run init first)")]
    LedgerNotInitialized,

    /// An attempt was made to re-initialize the ledger with conflicting
    /// parameters. The operator identity and admission parameters are
    /// frozen at creation time.
    #[error("ledger already initialized: {details}")]
    AlreadyInitialized {
        /// Details about the conflicting parameter.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: i32,
        /// The schema version found in the store.
        found: i32,
    },

    /// A store lock timeout occurred.
    #[error("store lock timeout after {seconds}s")]
    LockTimeout {
        /// The number of seconds waited before timing out.
        seconds: u64,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// Additional conversions for better ergonomics

impl From<crate::funds::InvalidAmountError> for Error {
    fn from(err: crate::funds::InvalidAmountError) -> Self {
        Self::Validation {
            field: "amount".into(),
            message: err.reason,
        }
    }
}

impl From<crate::account::InvalidAccountError> for Error {
    fn from(err: crate::account::InvalidAccountError) -> Self {
        Self::Validation {
            field: "account".into(),
            message: err.reason,
        }
    }
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Check if error indicates the capacity pool is full.
    ///
    /// # Examples
    ///
    /// ```
    /// use tollgate::Error;
    ///
    /// let err = Error::CapacityExhausted { capacity: 10 };
    /// assert!(err.is_capacity_exhausted());
    /// ```
    #[must_use]
    pub fn is_capacity_exhausted(&self) -> bool {
        matches!(self, Self::CapacityExhausted { .. })
    }

    /// Check if error is an authorization failure.
    ///
    /// # Examples
    ///
    /// ```
    /// use tollgate::Error;
    ///
    /// let err = Error::NotAuthorized {
    ///     required: "operator".to_string(),
    ///     caller: "mallory".to_string(),
    /// };
    /// assert!(err.is_not_authorized());
    /// ```
    #[must_use]
    pub fn is_not_authorized(&self) -> bool {
        matches!(self, Self::NotAuthorized { .. })
    }

    /// Check if error refers to a missing or settled slot.
    #[must_use]
    pub fn is_invalid_slot(&self) -> bool {
        matches!(self, Self::InvalidSlot { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_exhausted_error() {
        let err = Error::CapacityExhausted { capacity: 10 };
        let display = format!("{err}");
        assert!(display.contains("capacity exhausted"));
        assert!(display.contains("10"));
        assert!(err.is_capacity_exhausted());
        assert!(!err.is_not_authorized());
    }

    #[test]
    fn test_not_authorized_error() {
        let err = Error::NotAuthorized {
            required: "operator".to_string(),
            caller: "alice".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("not authorized"));
        assert!(display.contains("operator"));
        assert!(display.contains("alice"));
        assert!(err.is_not_authorized());
    }

    #[test]
    fn test_invalid_slot_error() {
        let err = Error::InvalidSlot {
            slot: SlotIndex::from(3),
            reason: "no active reservation".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("invalid slot 3"));
        assert!(display.contains("no active reservation"));
        assert!(err.is_invalid_slot());
    }

    #[test]
    fn test_validation_error() {
        let err = Error::Validation {
            field: "deposit".to_string(),
            message: "must be greater than zero".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("validation error"));
        assert!(display.contains("deposit"));
    }

    #[test]
    fn test_ledger_corruption_error() {
        let err = Error::LedgerCorruption {
            details: "stake due does not match active reservations".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("corruption"));
        assert!(display.contains("stake due"));
    }

    #[test]
    fn test_not_initialized_error() {
        let err = Error::LedgerNotInitialized;
        let display = format!("{err}");
        assert!(display.contains("not initialized"));
    }

    #[test]
    fn test_already_initialized_error() {
        let err = Error::AlreadyInitialized {
            details: "operator differs".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("already initialized"));
        assert!(display.contains("operator differs"));
    }

    #[test]
    fn test_unsupported_schema_version_error() {
        let err = Error::UnsupportedSchemaVersion {
            expected: 1,
            found: 2,
        };
        let display = format!("{err}");
        assert!(display.contains("expected 1"));
        assert!(display.contains("found 2"));
    }

    #[test]
    fn test_lock_timeout_error() {
        let err = Error::LockTimeout { seconds: 5 };
        let display = format!("{err}");
        assert!(display.contains("lock timeout"));
        assert!(display.contains('5'));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        let display = format!("{err}");
        assert!(display.contains("I/O error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<u32> {
            Err(Error::LedgerNotInitialized)
        }

        assert!(returns_result().is_err());
    }
}
