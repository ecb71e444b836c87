//! Check command implementation.
//!
//! A pure read: prints the next free slot index, or `-1` when the pool
//! is full (the sentinel is rendered only at this edge).

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;
use tollgate::check_availability;

/// Print the next free slot index, or -1 when full.
#[derive(Args)]
pub struct CheckCommand {}

impl CheckCommand {
    /// Execute the check command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;
        let ledger = store.load_ledger()?;

        match check_availability(&ledger) {
            Some(slot) => println!("{slot}"),
            None => println!("-1"),
        }
        Ok(())
    }
}
