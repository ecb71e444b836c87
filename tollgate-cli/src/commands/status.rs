//! Status command implementation.
//!
//! The operator dashboard: occupancy, escrow, revenue, and stake in one
//! read-only snapshot.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;

/// Print ledger occupancy and balances.
#[derive(Args)]
pub struct StatusCommand {}

impl StatusCommand {
    /// Execute the status command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;
        let ledger = store.load_ledger()?;

        println!("service={}", ledger.service_name());
        println!("operator={}", ledger.operator());
        println!("price={}", ledger.params().price);
        println!(
            "maturity_seconds={}",
            ledger.maturity_window().as_secs()
        );
        println!("capacity={}", ledger.pool().capacity());
        println!("active={}", ledger.active_count());
        match ledger.next_free_slot() {
            Some(slot) => println!("next_free={slot}"),
            None => println!("next_free=-1"),
        }
        println!("escrow={}", ledger.escrow_balance());
        println!("stake_due={}", ledger.stake_due());
        println!("revenue={}", ledger.operator_revenue());
        println!("forfeited={}", ledger.forfeited_total());
        Ok(())
    }
}
