//! Settlement planning: operator collection and requester cancellation.
//!
//! A reservation moves from active to settled only here. Collection is
//! the operator-only sweep of matured unstaked deposits; cancellation is
//! the requester's early exit, refunding an unmatured unstaked deposit or
//! forfeiting a staked one.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

use crate::account::AccountId;
use crate::error::{Error, Result};
use crate::funds::Amount;
use crate::ledger::Ledger;
use crate::reservation::SlotIndex;

use super::plan::{LedgerAction, OperationPlan};

/// How a settled reservation left the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Swept into operator revenue after maturity.
    Collected,
    /// Refunded in full to the requester before maturity.
    Refunded,
    /// Forfeited by a staker.
    Forfeited,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Collected => write!(f, "collected"),
            Self::Refunded => write!(f, "refunded"),
            Self::Forfeited => write!(f, "forfeited"),
        }
    }
}

impl FromStr for Disposition {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "collected" => Ok(Self::Collected),
            "refunded" => Ok(Self::Refunded),
            "forfeited" => Ok(Self::Forfeited),
            other => Err(format!("unknown disposition: {other}")),
        }
    }
}

/// The observable record of one settled reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementRecord {
    /// The slot that was settled and freed.
    pub slot: SlotIndex,
    /// The requester that had funded the reservation.
    pub requester: AccountId,
    /// The deposit amount settled.
    pub amount: Amount,
    /// How the deposit was disposed of.
    pub disposition: Disposition,
}

/// A collection plan generator for the operator sweep.
///
/// # Examples
///
/// ```
/// use std::time::SystemTime;
/// use tollgate::{AccountId, Amount, CollectPlan, Ledger, LedgerParams};
///
/// let params = LedgerParams {
///     service_name: "tollgate".to_string(),
///     operator: AccountId::new("operator").unwrap(),
///     price: Amount::new(100),
///     max_slots: 10,
///     maturity_window: std::time::Duration::from_secs(86_400),
/// };
/// let ledger = Ledger::new(params);
///
/// // Collecting from an empty pool is a valid no-op.
/// let plan = CollectPlan::new(AccountId::new("operator").unwrap())
///     .build_plan(&ledger, SystemTime::now())
///     .unwrap();
/// assert!(plan.is_empty());
/// ```
pub struct CollectPlan {
    caller: AccountId,
}

impl CollectPlan {
    /// Creates a collection plan for the given caller.
    #[must_use]
    pub const fn new(caller: AccountId) -> Self {
        Self { caller }
    }

    /// Builds an operation plan sweeping every matured unstaked
    /// reservation into operator revenue.
    ///
    /// Staked reservations are never swept, matured or not; they leave
    /// the pool only through cancellation. An empty sweep is success with
    /// a warning, not an error.
    ///
    /// # Errors
    ///
    /// Returns `NotAuthorized` if the caller is not the operator.
    pub fn build_plan(&self, ledger: &Ledger, now: SystemTime) -> Result<OperationPlan> {
        if !ledger.is_operator(&self.caller) {
            return Err(Error::NotAuthorized {
                required: format!("operator {}", ledger.operator()),
                caller: self.caller.to_string(),
            });
        }

        let window = ledger.maturity_window();
        let mut plan = OperationPlan::new("Collect matured unstaked deposits");
        for reservation in ledger.pool().iter_active() {
            if reservation.staked() || !reservation.is_matured(now, window) {
                continue;
            }
            plan = plan.add_action(LedgerAction::Collect {
                slot: reservation.slot(),
                requester: reservation.requester().clone(),
                amount: reservation.deposit(),
            });
        }

        if plan.is_empty() {
            plan = plan.add_warning("no matured unstaked reservations to collect");
        }

        Ok(plan)
    }
}

/// Options for a cancellation request.
#[derive(Debug, Clone)]
pub struct CancelOptions {
    /// The slot to cancel.
    pub slot: SlotIndex,

    /// The authenticated caller requesting cancellation.
    pub caller: AccountId,
}

impl CancelOptions {
    /// Creates cancellation options for the given slot and caller.
    #[must_use]
    pub const fn new(slot: SlotIndex, caller: AccountId) -> Self {
        Self { slot, caller }
    }
}

/// A cancellation plan generator.
pub struct CancelPlan {
    options: CancelOptions,
}

impl CancelPlan {
    /// Creates a new cancellation plan with the given options.
    #[must_use]
    pub const fn new(options: CancelOptions) -> Self {
        Self { options }
    }

    /// Builds an operation plan for this cancellation request.
    ///
    /// The outcome is asymmetric by design: an unmatured unstaked
    /// reservation is refunded in full, a staked reservation is forfeited
    /// whatever its age, and a matured unstaked reservation is left for
    /// the operator sweep (an empty plan with a warning).
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlot` if the slot holds no active reservation, or
    /// `NotAuthorized` if the caller is not the reservation's requester.
    pub fn build_plan(&self, ledger: &Ledger, now: SystemTime) -> Result<OperationPlan> {
        let slot = self.options.slot;
        let reservation = ledger.pool().get(slot).ok_or(Error::InvalidSlot {
            slot,
            reason: "no active reservation".into(),
        })?;

        if reservation.requester() != &self.options.caller {
            return Err(Error::NotAuthorized {
                required: format!("requester {}", reservation.requester()),
                caller: self.options.caller.to_string(),
            });
        }

        let mut plan = OperationPlan::new(format!("Cancel reservation in slot {slot}"));

        if reservation.staked() {
            plan = plan.add_action(LedgerAction::Forfeit {
                slot,
                requester: reservation.requester().clone(),
                amount: reservation.deposit(),
                shortfall: reservation.shortfall(),
            });
        } else if reservation.is_matured(now, ledger.maturity_window()) {
            plan = plan.add_warning(format!(
                "slot {slot} has matured and is earmarked for operator collection; nothing to refund"
            ));
        } else {
            plan = plan.add_action(LedgerAction::Refund {
                slot,
                requester: reservation.requester().clone(),
                amount: reservation.deposit(),
            });
        }

        Ok(plan)
    }
}
