//! Request command implementation.
//!
//! Admits a reservation for the calling identity, escrowing the deposit.
//! Prints the admission record: the assigned slot, the stake
//! classification, and the shortfall.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, require_caller, GlobalOptions};
use clap::Args;
use std::time::SystemTime;
use tollgate::{AdmissionOptions, AdmissionPlan, Amount, FlatRatePolicy, PlanExecutor};

/// Request a connection, escrowing a deposit.
#[derive(Args)]
pub struct RequestCommand {
    /// Deposit to escrow with the request
    #[arg(long, value_name = "AMOUNT")]
    pub deposit: Amount,

    /// Plan the admission without committing it
    #[arg(long)]
    pub dry_run: bool,
}

impl RequestCommand {
    /// Execute the request command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = tollgate::init_logger(global.verbose, global.quiet);
        let caller = require_caller(global)?;
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;
        let mut ledger = store.load_ledger()?;
        let now = SystemTime::now();

        let policy = FlatRatePolicy::new(ledger.params().price);
        let options = AdmissionOptions::new(caller, self.deposit);
        let plan = AdmissionPlan::new(options, &policy).build_plan(&ledger, now)?;

        let mut executor = PlanExecutor::new(&mut ledger).with_store(&mut store);
        if self.dry_run {
            executor = executor.dry_run();
        }
        let result = executor.execute(&plan, now)?;

        for warning in &result.warnings {
            logger.warn(warning);
        }
        if let Some(record) = result.admission {
            println!(
                "slot={} staked={} shortfall={}",
                record.slot, record.staked, record.shortfall
            );
        }
        Ok(())
    }
}
