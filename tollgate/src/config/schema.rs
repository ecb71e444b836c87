//! Configuration schema definitions.
//!
//! This module defines the configuration structure for tollgate: the
//! service identity, the admission parameters handed to `init`, and the
//! store lock behavior.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::error::{Error, Result};
use crate::funds::Amount;

/// Default service name exposed by `name()`.
pub const DEFAULT_SERVICE_NAME: &str = "tollgate";

/// Default canonical connection price.
pub const DEFAULT_PRICE: u128 = 3_000_000_000_000_000;

/// Default slot capacity.
pub const DEFAULT_MAX_SLOTS: u32 = 10;

/// Default maturity window in seconds (24 hours).
pub const DEFAULT_MATURITY_SECONDS: u64 = 86_400;

/// Complete configuration structure.
///
/// All fields are optional; unset fields fall back to built-in defaults
/// through the resolved accessors. The operator has no default: it names
/// the identity revenue accrues to and must be stated explicitly.
///
/// # Examples
///
/// ```
/// use tollgate::config::Config;
///
/// let config = Config {
///     operator: Some("operator".to_string()),
///     max_slots: Some(4),
///     ..Default::default()
/// };
/// assert_eq!(config.max_slots(), 4);
/// assert_eq!(config.service_name(), "tollgate");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Service name exposed on the caller-facing surface.
    pub service_name: Option<String>,

    /// The operator identity revenue accrues to.
    pub operator: Option<String>,

    /// Canonical connection price deposits are classified against.
    pub price: Option<Amount>,

    /// Hard bound on concurrently active reservations.
    pub max_slots: Option<u32>,

    /// Maturity window in seconds.
    pub maturity_seconds: Option<u64>,

    /// Maximum time to wait for the store lock (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,
}

impl Config {
    /// Returns the service name, defaulting to [`DEFAULT_SERVICE_NAME`].
    #[must_use]
    pub fn service_name(&self) -> &str {
        self.service_name.as_deref().unwrap_or(DEFAULT_SERVICE_NAME)
    }

    /// Returns the configured operator identity, if any.
    #[must_use]
    pub fn operator(&self) -> Option<&str> {
        self.operator.as_deref()
    }

    /// Returns the connection price, defaulting to [`DEFAULT_PRICE`].
    #[must_use]
    pub fn price(&self) -> Amount {
        self.price.unwrap_or(Amount::new(DEFAULT_PRICE))
    }

    /// Returns the slot capacity, defaulting to [`DEFAULT_MAX_SLOTS`].
    #[must_use]
    pub fn max_slots(&self) -> u32 {
        self.max_slots.unwrap_or(DEFAULT_MAX_SLOTS)
    }

    /// Returns the maturity window, defaulting to
    /// [`DEFAULT_MATURITY_SECONDS`].
    #[must_use]
    pub fn maturity_window(&self) -> Duration {
        Duration::from_secs(self.maturity_seconds.unwrap_or(DEFAULT_MATURITY_SECONDS))
    }

    /// Merges another configuration over this one.
    ///
    /// Set fields in `other` take precedence; unset fields keep the
    /// current value.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self {
            service_name: other.service_name.or(self.service_name),
            operator: other.operator.or(self.operator),
            price: other.price.or(self.price),
            max_slots: other.max_slots.or(self.max_slots),
            maturity_seconds: other.maturity_seconds.or(self.maturity_seconds),
            maximum_lock_wait_seconds: other
                .maximum_lock_wait_seconds
                .or(self.maximum_lock_wait_seconds),
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a zero price, a zero slot count, an
    /// empty service name, or an unusable operator identity. A zero
    /// maturity window is allowed; test deployments rely on deposits that
    /// mature immediately.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref name) = self.service_name {
            if name.trim().is_empty() {
                return Err(Error::Validation {
                    field: "service_name".into(),
                    message: "service name must be non-empty".into(),
                });
            }
        }
        if let Some(price) = self.price {
            if price.is_zero() {
                return Err(Error::Validation {
                    field: "price".into(),
                    message: "connection price must be greater than zero".into(),
                });
            }
        }
        if let Some(max_slots) = self.max_slots {
            if max_slots == 0 {
                return Err(Error::Validation {
                    field: "max_slots".into(),
                    message: "capacity must be at least one slot".into(),
                });
            }
        }
        if let Some(ref operator) = self.operator {
            AccountId::new(operator.clone()).map_err(|e| Error::Validation {
                field: "operator".into(),
                message: e.reason,
            })?;
        }
        Ok(())
    }
}
