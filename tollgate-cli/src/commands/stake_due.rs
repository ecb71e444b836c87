//! Stake-due command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;

/// Print the aggregate outstanding stake.
#[derive(Args)]
pub struct StakeDueCommand {}

impl StakeDueCommand {
    /// Execute the stake-due command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;
        let ledger = store.load_ledger()?;

        println!("{}", ledger.stake_due());
        Ok(())
    }
}
