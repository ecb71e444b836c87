//! Shared test utilities for store unit tests.

use std::time::Duration;

use tempfile::tempdir;

use crate::account::AccountId;
use crate::funds::Amount;
use crate::ledger::LedgerParams;
use crate::store::{Store, StoreConfig};

/// Creates a temporary test store that is cleaned up automatically.
///
/// # Panics
///
/// Panics if the temporary directory or store cannot be created. This is
/// acceptable in test code where we want to fail fast.
#[must_use]
pub fn create_test_store() -> Store {
    let dir = tempdir().unwrap();
    let path = dir.path().join("test.db");
    let store = Store::open(StoreConfig::new(path)).unwrap();

    // Prevent the TempDir from being dropped immediately
    std::mem::forget(dir);

    store
}

/// Standard ledger parameters for tests: operator "operator", price 100,
/// four slots, a one-day maturity window.
///
/// # Panics
///
/// Panics if the operator identity is rejected, which cannot happen for
/// the fixed test value.
#[must_use]
pub fn test_params() -> LedgerParams {
    LedgerParams {
        service_name: "tollgate".to_string(),
        operator: AccountId::new("operator").unwrap(),
        price: Amount::new(100),
        max_slots: 4,
        maturity_window: Duration::from_secs(86_400),
    }
}
