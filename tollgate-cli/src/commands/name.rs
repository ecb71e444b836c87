//! Name command implementation.

use crate::error::CliError;
use crate::utils::{load_configuration, open_store, GlobalOptions};
use clap::Args;

/// Print the service name.
#[derive(Args)]
pub struct NameCommand {}

impl NameCommand {
    /// Execute the name command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let config = load_configuration(global)?;
        let store = open_store(global, &config)?;
        let params = store.load_params()?;

        println!("{}", params.service_name);
        Ok(())
    }
}
