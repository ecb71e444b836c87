//! Environment variable configuration overrides.
//!
//! Every config field can be overridden with a `TOLLGATE_*` environment
//! variable, which takes precedence over the configuration file but not
//! over programmatic overrides.

use std::env;

use crate::error::{Error, Result};
use crate::funds::Amount;

use super::schema::Config;

/// Environment variable: service name.
pub const ENV_SERVICE_NAME: &str = "TOLLGATE_SERVICE_NAME";
/// Environment variable: operator identity.
pub const ENV_OPERATOR: &str = "TOLLGATE_OPERATOR";
/// Environment variable: connection price.
pub const ENV_PRICE: &str = "TOLLGATE_PRICE";
/// Environment variable: slot capacity.
pub const ENV_MAX_SLOTS: &str = "TOLLGATE_MAX_SLOTS";
/// Environment variable: maturity window in seconds.
pub const ENV_MATURITY_SECONDS: &str = "TOLLGATE_MATURITY_SECONDS";
/// Environment variable: maximum store lock wait in seconds.
pub const ENV_MAX_LOCK_WAIT: &str = "TOLLGATE_MAX_LOCK_WAIT";

/// Loader for environment-based configuration.
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Reads a `Config` from `TOLLGATE_*` environment variables.
    ///
    /// Unset variables leave the corresponding field `None`.
    ///
    /// # Errors
    ///
    /// Returns a validation error when a set variable cannot be parsed.
    pub fn load() -> Result<Config> {
        Ok(Config {
            service_name: env::var(ENV_SERVICE_NAME).ok(),
            operator: env::var(ENV_OPERATOR).ok(),
            price: parse_var::<Amount>(ENV_PRICE)?,
            max_slots: parse_var::<u32>(ENV_MAX_SLOTS)?,
            maturity_seconds: parse_var::<u64>(ENV_MATURITY_SECONDS)?,
            maximum_lock_wait_seconds: parse_var::<u64>(ENV_MAX_LOCK_WAIT)?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(value) => value.parse::<T>().map(Some).map_err(|_| Error::Validation {
            field: name.to_string(),
            message: format!("cannot parse environment value: {value}"),
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn clear_all() {
        for var in [
            ENV_SERVICE_NAME,
            ENV_OPERATOR,
            ENV_PRICE,
            ENV_MAX_SLOTS,
            ENV_MATURITY_SECONDS,
            ENV_MAX_LOCK_WAIT,
        ] {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_load_with_nothing_set() {
        clear_all();
        let config = EnvironmentConfig::load().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    #[serial]
    fn test_load_reads_values() {
        clear_all();
        env::set_var(ENV_OPERATOR, "operator");
        env::set_var(ENV_PRICE, "1000");
        env::set_var(ENV_MAX_SLOTS, "3");
        env::set_var(ENV_MATURITY_SECONDS, "0");

        let config = EnvironmentConfig::load().unwrap();
        assert_eq!(config.operator(), Some("operator"));
        assert_eq!(config.price(), Amount::new(1000));
        assert_eq!(config.max_slots(), 3);
        assert_eq!(config.maturity_seconds, Some(0));

        clear_all();
    }

    #[test]
    #[serial]
    fn test_load_rejects_garbage() {
        clear_all();
        env::set_var(ENV_MAX_SLOTS, "many");
        let err = EnvironmentConfig::load().unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
        clear_all();
    }
}
