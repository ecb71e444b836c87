//! Configuration system for tollgate.
//!
//! Configuration feeds two places: `init` freezes the admission
//! parameters (operator, price, capacity, maturity window) into the
//! store's metadata, and the store lock behavior is consulted on every
//! open. After initialization the frozen metadata governs ledger
//! behavior; changing the configuration file does not rewrite a deployed
//! ledger.
//!
//! # Configuration Precedence
//!
//! Sources are merged from multiple origins with the following
//! precedence (highest to lowest):
//!
//! 1. Programmatic overrides (via [`ConfigBuilder::with_config`])
//! 2. Environment variables (`TOLLGATE_*`)
//! 3. The data directory's `config.yaml`
//! 4. Built-in defaults
//!
//! # Examples
//!
//! ```no_run
//! use tollgate::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! println!("price: {}", config.price());
//! ```

pub mod builder;
pub mod environment;
pub mod schema;

pub use builder::{default_data_dir, ConfigBuilder, CONFIG_FILE_NAME};
pub use environment::EnvironmentConfig;
pub use schema::{
    Config, DEFAULT_MATURITY_SECONDS, DEFAULT_MAX_SLOTS, DEFAULT_PRICE, DEFAULT_SERVICE_NAME,
};
