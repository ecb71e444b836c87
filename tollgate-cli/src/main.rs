//! Main entry point for the tollgate CLI.
//!
//! This is the command-line interface for the tollgate connection ledger.
//! It mirrors the ledger's caller-facing surface onto subcommands:
//! - `request`: admit a reservation, escrowing a deposit
//! - `collect`: operator sweep of matured unstaked deposits
//! - `cancel`: requester cancellation (refund or forfeiture)
//! - `check` / `stake-due` / `status` / `list`: pure reads
//!
//! The CLI plays the hosting runtime's role: it supplies the
//! authenticated caller identity (`--from`), the deposited value, and the
//! wall-clock time, and it scopes each invocation to one store
//! transaction.

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::Cli;
use utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _logger = tollgate::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        from: cli.from,
        busy_timeout: cli.busy_timeout,
    };

    let result = match cli.command {
        cli::Command::Init(cmd) => cmd.execute(&global),
        cli::Command::Name(cmd) => cmd.execute(&global),
        cli::Command::Check(cmd) => cmd.execute(&global),
        cli::Command::Request(cmd) => cmd.execute(&global),
        cli::Command::Collect(cmd) => cmd.execute(&global),
        cli::Command::Cancel(cmd) => cmd.execute(&global),
        cli::Command::StakeDue(cmd) => cmd.execute(&global),
        cli::Command::Status(cmd) => cmd.execute(&global),
        cli::Command::List(cmd) => cmd.execute(&global),
        cli::Command::Completions(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
