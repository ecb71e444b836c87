//! List command implementation.

use crate::error::CliError;
use crate::utils::{format_timestamp, load_configuration, open_store, GlobalOptions};
use clap::Args;

/// List active reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Include the settled audit history
    #[arg(long)]
    pub history: bool,
}

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;
        let ledger = store.load_ledger()?;

        for reservation in ledger.pool().iter_active() {
            println!(
                "slot={} requester={} deposit={} staked={} created_at={}",
                reservation.slot(),
                reservation.requester(),
                reservation.deposit(),
                reservation.staked(),
                format_timestamp(reservation.created_at())
            );
        }

        if self.history {
            for row in store.list_settlements()? {
                println!("{row}");
            }
        }
        Ok(())
    }
}
