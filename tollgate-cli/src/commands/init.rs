//! Init command implementation.
//!
//! Creates the data directory and freezes the ledger parameters: the
//! operator identity, canonical price, slot capacity, and maturity
//! window. Re-running with identical parameters is a no-op; the frozen
//! parameters cannot be changed afterwards.

use crate::error::CliError;
use crate::utils::{open_store, resolve_data_dir, GlobalOptions};
use clap::Args;
use tollgate::config::{Config, ConfigBuilder};
use tollgate::{AccountId, Amount, LedgerParams};

/// Initialize the ledger and freeze its parameters.
#[derive(Args)]
pub struct InitCommand {
    /// Operator identity revenue accrues to
    #[arg(long, value_name = "ACCOUNT")]
    pub operator: Option<String>,

    /// Canonical connection price
    #[arg(long, value_name = "AMOUNT")]
    pub price: Option<Amount>,

    /// Slot capacity
    #[arg(long, value_name = "N")]
    pub max_slots: Option<u32>,

    /// Maturity window in seconds
    #[arg(long, value_name = "SECONDS")]
    pub maturity_seconds: Option<u64>,

    /// Service name exposed by `name`
    #[arg(long, value_name = "NAME")]
    pub service_name: Option<String>,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;

        let overrides = Config {
            service_name: self.service_name,
            operator: self.operator,
            price: self.price,
            max_slots: self.max_slots,
            maturity_seconds: self.maturity_seconds,
            maximum_lock_wait_seconds: None,
        };
        let config = ConfigBuilder::new()
            .with_data_dir(&data_dir)
            .with_config(overrides)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))?;

        let operator = config.operator().ok_or_else(|| {
            CliError::InvalidArguments(
                "operator required: pass --operator, set TOLLGATE_OPERATOR, or configure it"
                    .to_string(),
            )
        })?;
        let operator =
            AccountId::new(operator).map_err(|e| CliError::InvalidArguments(e.to_string()))?;

        let params = LedgerParams {
            service_name: config.service_name().to_string(),
            operator,
            price: config.price(),
            max_slots: config.max_slots(),
            maturity_window: config.maturity_window(),
        };

        let mut store = open_store(global, &config)?;
        store.init_ledger(&params)?;

        println!(
            "initialized service={} operator={} price={} max_slots={} maturity_seconds={}",
            params.service_name,
            params.operator,
            params.price,
            params.max_slots,
            params.maturity_window.as_secs()
        );
        Ok(())
    }
}
