//! Build script for tollgate-cli.
//!
//! Generates the man page at build time using clap_mangen. The generated
//! page is placed in OUT_DIR for inclusion in release builds.
//!
//! Note: We build a minimal command structure here rather than importing
//! from the main crate, since build scripts cannot depend on the crate
//! being built.

use clap::{Arg, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Build the CLI command structure for man page generation.
///
/// IMPORTANT: Keep this structure synchronized with src/cli.rs
/// When adding/removing/modifying commands, update both files.
fn build_cli() -> Command {
    Command::new("tollgate")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Ration paid connection slots with escrowed deposits")
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(clap::ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("TOLLGATE_DATA_DIR"),
        )
        .arg(
            Arg::new("from")
                .long("from")
                .help("Authenticated caller identity for this invocation")
                .value_name("ACCOUNT")
                .global(true)
                .env("TOLLGATE_ACCOUNT"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Override the default store lock timeout (in seconds)")
                .value_name("SECONDS")
                .global(true)
                .env("TOLLGATE_BUSY_TIMEOUT"),
        )
        .subcommands(vec![
            Command::new("init")
                .about("Initialize the ledger and freeze its parameters"),
            Command::new("name").about("Print the service name"),
            Command::new("check")
                .about("Print the next free slot index, or -1 when full"),
            Command::new("request")
                .about("Request a connection, escrowing a deposit"),
            Command::new("collect")
                .about("Sweep matured unstaked deposits into operator revenue"),
            Command::new("cancel")
                .about("Cancel a reservation (refund or forfeiture)"),
            Command::new("stake-due")
                .about("Print the aggregate outstanding stake"),
            Command::new("status").about("Print ledger occupancy and balances"),
            Command::new("list").about("List active reservations"),
            Command::new("completions")
                .about("Generate shell completion scripts"),
        ])
}

fn main() {
    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir).unwrap();

    let app = build_cli();
    let man = Man::new(app);
    let mut buffer = Vec::new();
    man.render(&mut buffer).unwrap();

    fs::write(man_dir.join("tollgate.1"), buffer).unwrap();

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
}
