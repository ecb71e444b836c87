//! Collect command implementation.
//!
//! The operator-only sweep: every active unstaked reservation past the
//! maturity window moves into operator revenue and frees its slot.
//! Collecting nothing is success with a zero total.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, require_caller, GlobalOptions};
use clap::Args;
use std::time::SystemTime;
use tollgate::{CollectPlan, PlanExecutor};

/// Sweep matured unstaked deposits into operator revenue.
#[derive(Args)]
pub struct CollectCommand {
    /// Preview the sweep without committing it
    #[arg(long)]
    pub dry_run: bool,
}

impl CollectCommand {
    /// Execute the collect command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let logger = tollgate::init_logger(global.verbose, global.quiet);
        let caller = require_caller(global)?;
        let config = load_configuration(global)?;
        let mut store = open_store(global, &config)?;
        let mut ledger = store.load_ledger()?;
        let now = SystemTime::now();

        let plan = CollectPlan::new(caller).build_plan(&ledger, now)?;

        let mut executor = PlanExecutor::new(&mut ledger).with_store(&mut store);
        if self.dry_run {
            executor = executor.dry_run();
        }
        let result = executor.execute(&plan, now)?;

        for warning in &result.warnings {
            logger.warn(warning);
        }
        for record in &result.settlements {
            println!(
                "slot={} requester={} amount={}",
                record.slot, record.requester, record.amount
            );
        }
        println!("total={}", result.collected_total);
        Ok(())
    }
}
