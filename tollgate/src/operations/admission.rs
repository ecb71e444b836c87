//! Admission planning: validating capacity and classifying deposits.
//!
//! Admission is the only path that creates reservations. A request either
//! fails with `CapacityExhausted` before the deposit is taken, or yields a
//! plan that admits the reservation into the next free slot with its
//! classification fixed.

use std::time::SystemTime;

use crate::account::AccountId;
use crate::error::{Error, Result};
use crate::funds::Amount;
use crate::ledger::Ledger;
use crate::pricing::PricingPolicy;
use crate::reservation::{Reservation, SlotIndex};

use super::plan::{LedgerAction, OperationPlan};

/// Options for an admission request.
#[derive(Debug, Clone)]
pub struct AdmissionOptions {
    /// The authenticated caller funding the reservation.
    pub requester: AccountId,

    /// The value deposited with the request.
    pub deposit: Amount,
}

impl AdmissionOptions {
    /// Creates admission options for the given requester and deposit.
    #[must_use]
    pub const fn new(requester: AccountId, deposit: Amount) -> Self {
        Self { requester, deposit }
    }
}

/// The observable record of a successful admission.
///
/// Carries everything a caller learns from being admitted: the assigned
/// slot, the stake classification, and the shortfall owed if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdmissionRecord {
    /// The assigned slot index.
    pub slot: SlotIndex,
    /// The requester that funded the reservation.
    pub requester: AccountId,
    /// The escrowed deposit.
    pub deposit: Amount,
    /// Whether the deposit was classified as stake-backed.
    pub staked: bool,
    /// The stake shortfall (zero when unstaked).
    pub shortfall: Amount,
}

impl AdmissionRecord {
    /// Builds the record announced for an admitted reservation.
    #[must_use]
    pub fn for_reservation(reservation: &Reservation) -> Self {
        Self {
            slot: reservation.slot(),
            requester: reservation.requester().clone(),
            deposit: reservation.deposit(),
            staked: reservation.staked(),
            shortfall: reservation.shortfall(),
        }
    }
}

/// An admission plan generator.
///
/// # Examples
///
/// ```
/// use std::time::SystemTime;
/// use tollgate::{
///     AccountId, AdmissionOptions, AdmissionPlan, Amount, FlatRatePolicy, Ledger, LedgerParams,
/// };
///
/// let params = LedgerParams {
///     service_name: "tollgate".to_string(),
///     operator: AccountId::new("operator").unwrap(),
///     price: Amount::new(100),
///     max_slots: 10,
///     maturity_window: std::time::Duration::from_secs(86_400),
/// };
/// let ledger = Ledger::new(params);
/// let policy = FlatRatePolicy::new(Amount::new(100));
///
/// let options = AdmissionOptions::new(AccountId::new("alice").unwrap(), Amount::new(150));
/// let plan = AdmissionPlan::new(options, &policy)
///     .build_plan(&ledger, SystemTime::now())
///     .unwrap();
/// assert_eq!(plan.len(), 1);
/// ```
pub struct AdmissionPlan<'p> {
    options: AdmissionOptions,
    policy: &'p dyn PricingPolicy,
}

impl<'p> AdmissionPlan<'p> {
    /// Creates a new admission plan with the given options and pricing
    /// policy.
    #[must_use]
    pub fn new(options: AdmissionOptions, policy: &'p dyn PricingPolicy) -> Self {
        Self { options, policy }
    }

    /// Builds an operation plan for this admission request.
    ///
    /// This does not modify the ledger. The plan must be executed in the
    /// same call, against the same snapshot, so the slot chosen here is
    /// still the next free one at apply time.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a zero deposit, or `CapacityExhausted`
    /// when every slot is active; in both cases the deposit is not taken.
    pub fn build_plan(&self, ledger: &Ledger, now: SystemTime) -> Result<OperationPlan> {
        if self.options.deposit.is_zero() {
            return Err(Error::Validation {
                field: "deposit".into(),
                message: "deposit must be greater than zero".into(),
            });
        }

        let slot = ledger.next_free_slot().ok_or(Error::CapacityExhausted {
            capacity: ledger.pool().capacity(),
        })?;

        let classification = self.policy.classify(self.options.deposit);
        let reservation = Reservation::builder(
            slot,
            self.options.requester.clone(),
            self.options.deposit,
        )
        .staked(classification.staked)
        .shortfall(classification.shortfall)
        .created_at(now)
        .build()?;

        let plan = OperationPlan::new(format!(
            "Admit reservation for {} with deposit {}",
            self.options.requester, self.options.deposit
        ))
        .add_action(LedgerAction::Admit(reservation));

        Ok(plan)
    }
}

/// Reports the next free slot index, or `None` when the pool is full.
///
/// This is the library form of the caller-facing availability check;
/// transports that encode a full pool as `-1` render `None` that way at
/// the edge.
#[must_use]
pub fn check_availability(ledger: &Ledger) -> Option<SlotIndex> {
    ledger.next_free_slot()
}
