//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    CancelCommand, CheckCommand, CollectCommand, CompletionsCommand, InitCommand, ListCommand,
    NameCommand, RequestCommand, StakeDueCommand, StatusCommand,
};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for rationing paid connection slots.
#[derive(Parser)]
#[command(name = "tollgate")]
#[command(
    version,
    about = "Ration paid connection slots with escrowed deposits",
    long_about = None
)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "TOLLGATE_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Authenticated caller identity for this invocation
    #[arg(long, value_name = "ACCOUNT", global = true, env = "TOLLGATE_ACCOUNT")]
    pub from: Option<String>,

    /// Override the default store lock timeout (in seconds)
    #[arg(long, value_name = "SECONDS", global = true, env = "TOLLGATE_BUSY_TIMEOUT")]
    pub busy_timeout: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the ledger and freeze its parameters
    Init(InitCommand),

    /// Print the service name
    Name(NameCommand),

    /// Print the next free slot index, or -1 when full
    Check(CheckCommand),

    /// Request a connection, escrowing a deposit
    Request(RequestCommand),

    /// Sweep matured unstaked deposits into operator revenue
    Collect(CollectCommand),

    /// Cancel a reservation (refund or forfeiture)
    Cancel(CancelCommand),

    /// Print the aggregate outstanding stake
    #[command(name = "stake-due")]
    StakeDue(StakeDueCommand),

    /// Print ledger occupancy and balances
    Status(StatusCommand),

    /// List active reservations
    List(ListCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}
