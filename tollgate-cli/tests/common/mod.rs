//! Common test utilities for CLI integration tests.
//!
//! Provides an isolated test environment with a temporary data directory
//! and helpers for the frequent command patterns.

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Canonical test price (matches the production default).
pub const PRICE: u128 = 3_000_000_000_000_000;

/// Test environment with an isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the tollgate data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let data_dir = temp_dir.path().join("tollgate-data");

        Self { temp_dir, data_dir }
    }

    /// Get a bare command builder without pre-configured flags.
    pub fn command_bare(&self) -> Command {
        Command::cargo_bin("tollgate").expect("Failed to find tollgate binary")
    }

    /// Get a command builder with the data directory pre-configured.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        // Keep host environment from leaking into tests.
        for var in [
            "TOLLGATE_ACCOUNT",
            "TOLLGATE_DATA_DIR",
            "TOLLGATE_OPERATOR",
            "TOLLGATE_PRICE",
            "TOLLGATE_MAX_SLOTS",
            "TOLLGATE_MATURITY_SECONDS",
            "TOLLGATE_SERVICE_NAME",
            "TOLLGATE_LOG_MODE",
        ] {
            cmd.env_remove(var);
        }
        cmd
    }

    /// Get a command builder acting as the given caller.
    pub fn command_as(&self, account: &str) -> Command {
        let mut cmd = self.command();
        cmd.arg("--from").arg(account);
        cmd
    }

    /// Initialize the ledger with the given capacity and maturity window.
    ///
    /// The operator is "operator" and the price is [`PRICE`].
    pub fn init(&self, max_slots: u32, maturity_seconds: u64) {
        self.command()
            .arg("init")
            .arg("--operator")
            .arg("operator")
            .arg("--price")
            .arg(PRICE.to_string())
            .arg("--max-slots")
            .arg(max_slots.to_string())
            .arg("--maturity-seconds")
            .arg(maturity_seconds.to_string())
            .assert()
            .success();
    }

    /// Request a connection and return the command's stdout.
    ///
    /// # Panics
    /// Panics if the request fails.
    pub fn request(&self, account: &str, deposit: u128) -> String {
        let output = self
            .command_as(account)
            .arg("request")
            .arg("--deposit")
            .arg(deposit.to_string())
            .output()
            .expect("Failed to run request command");

        assert!(
            output.status.success(),
            "Request failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }

    /// Request a connection and return the assigned slot index.
    pub fn request_slot(&self, account: &str, deposit: u128) -> u32 {
        let stdout = self.request(account, deposit);
        let field = stdout
            .split_whitespace()
            .find_map(|kv| kv.strip_prefix("slot="))
            .expect("request output missing slot field");
        field.parse().expect("slot field is not a number")
    }

    /// Run `check` and return the printed index (-1 when full).
    pub fn check(&self) -> i64 {
        let output = self
            .command()
            .arg("check")
            .output()
            .expect("Failed to run check command");
        assert!(output.status.success());
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .parse()
            .expect("check output is not a number")
    }

    /// Run `stake-due` and return the printed aggregate.
    pub fn stake_due(&self) -> u128 {
        let output = self
            .command()
            .arg("stake-due")
            .output()
            .expect("Failed to run stake-due command");
        assert!(output.status.success());
        String::from_utf8(output.stdout)
            .expect("Invalid UTF-8 in output")
            .trim()
            .parse()
            .expect("stake-due output is not a number")
    }

    /// Run `status` and return its stdout.
    pub fn status(&self) -> String {
        let output = self
            .command()
            .arg("status")
            .output()
            .expect("Failed to run status command");
        assert!(output.status.success());
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }

    /// Run `list` and return its stdout.
    pub fn list(&self) -> String {
        let output = self
            .command()
            .arg("list")
            .output()
            .expect("Failed to run list command");
        assert!(output.status.success());
        String::from_utf8(output.stdout).expect("Invalid UTF-8 in output")
    }
}
