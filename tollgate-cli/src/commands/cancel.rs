//! Cancel command implementation.
//!
//! The requester's early exit. The outcome is asymmetric: an unmatured
//! unstaked reservation is refunded in full, a staked one is forfeited
//! at any age, and a matured unstaked one is a no-op left for the
//! operator sweep.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, require_caller, GlobalOptions};
use clap::Args;
use std::time::SystemTime;
use tollgate::{CancelOptions, CancelPlan, PlanExecutor, SlotIndex};

/// Cancel a reservation (refund or forfeiture).
#[derive(Args)]
pub struct CancelCommand {
    /// Slot index of the reservation to cancel
    #[arg(value_name = "SLOT")]
    pub slot: u32,

    /// Preview the cancellation without committing it
    #[arg(long)]
    pub dry_run: bool,
}

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = tollgate::init_logger(global.verbose, global.quiet);
        let caller = require_caller(global)?;
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;
        let mut ledger = store.load_ledger()?;
        let now = SystemTime::now();

        let options = CancelOptions::new(SlotIndex::from(self.slot), caller);
        let plan = CancelPlan::new(options).build_plan(&ledger, now)?;

        let mut executor = PlanExecutor::new(&mut ledger).with_store(&mut store);
        if self.dry_run {
            executor = executor.dry_run();
        }
        let result = executor.execute(&plan, now)?;

        for warning in &result.warnings {
            logger.warn(warning);
        }
        match result.settlements.first() {
            Some(record) => println!("outcome={} amount={}", record.disposition, record.amount),
            None => println!("outcome=noop"),
        }
        Ok(())
    }
}
