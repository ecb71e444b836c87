//! The ledger aggregate: slot pool, stake ledger, and operator account.
//!
//! The ledger is the single mutable shared resource in the system. All
//! mutation flows through [`Ledger::apply`] with a [`LedgerAction`]
//! produced by the planning layer; no other component writes reservation
//! state. Authorization and maturity are checked when a plan is built,
//! against the same snapshot and clock reading the plan is executed with.

use std::time::Duration;

use crate::account::AccountId;
use crate::error::{Error, Result};
use crate::funds::Amount;
use crate::operations::plan::LedgerAction;
use crate::pool::SlotPool;
use crate::reservation::{Reservation, SlotIndex};

/// Immutable parameters fixed when the ledger is created.
///
/// The operator identity and admission parameters are frozen at system
/// creation and never change for the lifetime of the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerParams {
    /// Human-readable service name exposed on the caller-facing surface.
    pub service_name: String,
    /// The identity entitled to collect matured revenue.
    pub operator: AccountId,
    /// The canonical connection price deposits are classified against.
    pub price: Amount,
    /// The hard bound on concurrently active reservations.
    pub max_slots: u32,
    /// The holding period after which unstaked deposits become collectible.
    pub maturity_window: Duration,
}

impl LedgerParams {
    /// Validates the parameter set.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty service name, a zero price,
    /// or a zero slot count. A zero maturity window is allowed (deposits
    /// mature immediately), which test deployments rely on.
    pub fn validate(&self) -> Result<()> {
        if self.service_name.trim().is_empty() {
            return Err(Error::Validation {
                field: "service_name".into(),
                message: "service name must be non-empty".into(),
            });
        }
        if self.price.is_zero() {
            return Err(Error::Validation {
                field: "price".into(),
                message: "connection price must be greater than zero".into(),
            });
        }
        if self.max_slots == 0 {
            return Err(Error::Validation {
                field: "max_slots".into(),
                message: "capacity must be at least one slot".into(),
            });
        }
        Ok(())
    }
}

/// Snapshot of the ledger's aggregate balances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LedgerTotals {
    /// Sum of deposits held in escrow for active reservations.
    pub escrow: Amount,
    /// Sum of shortfalls over active staked reservations.
    pub stake_due: Amount,
    /// Revenue collected by the operator to date.
    pub revenue: Amount,
    /// Total value forfeited by stakers to date.
    pub forfeited: Amount,
}

/// The admission/escrow/settlement ledger.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tollgate::{AccountId, Amount, Ledger, LedgerParams};
///
/// let params = LedgerParams {
///     service_name: "tollgate".to_string(),
///     operator: AccountId::new("operator").unwrap(),
///     price: Amount::new(100),
///     max_slots: 10,
///     maturity_window: Duration::from_secs(86_400),
/// };
/// let ledger = Ledger::new(params);
///
/// assert_eq!(ledger.active_count(), 0);
/// assert!(ledger.stake_due().is_zero());
/// ```
#[derive(Debug, Clone)]
pub struct Ledger {
    params: LedgerParams,
    pool: SlotPool,
    totals: LedgerTotals,
}

impl Ledger {
    /// Creates an empty ledger with the given parameters.
    #[must_use]
    pub fn new(params: LedgerParams) -> Self {
        let pool = SlotPool::new(params.max_slots);
        Self {
            params,
            pool,
            totals: LedgerTotals::default(),
        }
    }

    /// Reconstructs a ledger from persisted state.
    ///
    /// # Errors
    ///
    /// Returns an error if a reservation does not fit the pool, or if the
    /// persisted totals disagree with the reservations (corruption).
    pub fn restore(
        params: LedgerParams,
        reservations: Vec<Reservation>,
        totals: LedgerTotals,
    ) -> Result<Self> {
        params.validate()?;
        let mut pool = SlotPool::new(params.max_slots);
        for reservation in reservations {
            pool.restore(reservation)?;
        }
        let ledger = Self {
            params,
            pool,
            totals,
        };
        ledger.verify()?;
        Ok(ledger)
    }

    /// Returns the immutable ledger parameters.
    #[must_use]
    pub const fn params(&self) -> &LedgerParams {
        &self.params
    }

    /// Returns the service name.
    #[must_use]
    pub fn service_name(&self) -> &str {
        &self.params.service_name
    }

    /// Returns the operator identity.
    #[must_use]
    pub const fn operator(&self) -> &AccountId {
        &self.params.operator
    }

    /// Returns `true` if the caller is the operator.
    #[must_use]
    pub fn is_operator(&self, caller: &AccountId) -> bool {
        &self.params.operator == caller
    }

    /// Returns the maturity window.
    #[must_use]
    pub const fn maturity_window(&self) -> Duration {
        self.params.maturity_window
    }

    /// Returns the slot pool.
    #[must_use]
    pub const fn pool(&self) -> &SlotPool {
        &self.pool
    }

    /// Returns the number of active reservations.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.pool.active_count()
    }

    /// Returns the next free slot index, or `None` when the pool is full.
    #[must_use]
    pub fn next_free_slot(&self) -> Option<SlotIndex> {
        self.pool.next_free_slot()
    }

    /// Returns the aggregate outstanding stake.
    #[must_use]
    pub const fn stake_due(&self) -> Amount {
        self.totals.stake_due
    }

    /// Returns the balance currently held in escrow.
    #[must_use]
    pub const fn escrow_balance(&self) -> Amount {
        self.totals.escrow
    }

    /// Returns the revenue collected by the operator to date.
    #[must_use]
    pub const fn operator_revenue(&self) -> Amount {
        self.totals.revenue
    }

    /// Returns the total value forfeited by stakers to date.
    #[must_use]
    pub const fn forfeited_total(&self) -> Amount {
        self.totals.forfeited
    }

    /// Returns a snapshot of the aggregate balances.
    #[must_use]
    pub const fn totals(&self) -> LedgerTotals {
        self.totals
    }

    /// Applies a single action to the ledger.
    ///
    /// Actions are validated against the live state: an action that no
    /// longer matches the reservation it targets is rejected without any
    /// change. Maturity and authorization are not re-derived here; plans
    /// carry those decisions and must be executed with the same snapshot
    /// and clock reading they were built from.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExhausted`, `InvalidSlot`, or `LedgerCorruption`
    /// depending on the mismatch.
    pub fn apply(&mut self, action: &LedgerAction) -> Result<()> {
        match action {
            LedgerAction::Admit(reservation) => self.admit(reservation),
            LedgerAction::Collect {
                slot,
                requester,
                amount,
            } => {
                let freed = self.settle(*slot, requester, *amount, false)?;
                self.totals.revenue = self.add(self.totals.revenue, freed.deposit(), "revenue")?;
                Ok(())
            }
            LedgerAction::Refund {
                slot,
                requester,
                amount,
            } => {
                self.settle(*slot, requester, *amount, false)?;
                Ok(())
            }
            LedgerAction::Forfeit {
                slot,
                requester,
                amount,
                shortfall,
            } => {
                let occupant = self.pool.get(*slot).ok_or(Error::InvalidSlot {
                    slot: *slot,
                    reason: "no active reservation".into(),
                })?;
                if occupant.shortfall() != *shortfall {
                    return Err(Error::LedgerCorruption {
                        details: format!(
                            "forfeiture shortfall {shortfall} does not match slot {slot}"
                        ),
                    });
                }
                let freed = self.settle(*slot, requester, *amount, true)?;
                self.totals.stake_due =
                    self.sub(self.totals.stake_due, freed.shortfall(), "stake due")?;
                self.totals.forfeited =
                    self.add(self.totals.forfeited, freed.deposit(), "forfeited total")?;
                Ok(())
            }
        }
    }

    /// Verifies the ledger invariants.
    ///
    /// The escrow balance must equal the sum of active deposits, and the
    /// outstanding stake must equal the sum of active staked shortfalls.
    ///
    /// # Errors
    ///
    /// Returns `LedgerCorruption` describing the first divergence found.
    pub fn verify(&self) -> Result<()> {
        let mut escrow = Amount::ZERO;
        let mut stake_due = Amount::ZERO;
        for reservation in self.pool.iter_active() {
            escrow = self.add(escrow, reservation.deposit(), "escrow recomputation")?;
            if reservation.staked() {
                stake_due = self.add(
                    stake_due,
                    reservation.shortfall(),
                    "stake due recomputation",
                )?;
            }
        }
        if escrow != self.totals.escrow {
            return Err(Error::LedgerCorruption {
                details: format!(
                    "escrow balance {} does not match active deposits {escrow}",
                    self.totals.escrow
                ),
            });
        }
        if stake_due != self.totals.stake_due {
            return Err(Error::LedgerCorruption {
                details: format!(
                    "stake due {} does not match active staked shortfalls {stake_due}",
                    self.totals.stake_due
                ),
            });
        }
        Ok(())
    }

    fn admit(&mut self, reservation: &Reservation) -> Result<()> {
        self.pool.allocate(reservation.clone())?;
        self.totals.escrow = self.add(self.totals.escrow, reservation.deposit(), "escrow")?;
        if reservation.staked() {
            self.totals.stake_due =
                self.add(self.totals.stake_due, reservation.shortfall(), "stake due")?;
        }
        Ok(())
    }

    /// Removes a reservation from escrow, checking the action still
    /// describes the occupant.
    fn settle(
        &mut self,
        slot: SlotIndex,
        requester: &AccountId,
        amount: Amount,
        expect_staked: bool,
    ) -> Result<Reservation> {
        let occupant = self.pool.get(slot).ok_or(Error::InvalidSlot {
            slot,
            reason: "no active reservation".into(),
        })?;
        if occupant.requester() != requester
            || occupant.deposit() != amount
            || occupant.staked() != expect_staked
        {
            return Err(Error::LedgerCorruption {
                details: format!("settlement action does not match slot {slot}"),
            });
        }
        let freed = self.pool.free(slot)?;
        self.totals.escrow = self.sub(self.totals.escrow, freed.deposit(), "escrow")?;
        Ok(freed)
    }

    fn add(&self, lhs: Amount, rhs: Amount, what: &str) -> Result<Amount> {
        lhs.checked_add(rhs).ok_or_else(|| Error::LedgerCorruption {
            details: format!("{what} overflowed"),
        })
    }

    fn sub(&self, lhs: Amount, rhs: Amount, what: &str) -> Result<Amount> {
        lhs.checked_sub(rhs).ok_or_else(|| Error::LedgerCorruption {
            details: format!("{what} underflowed"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    // Property-based testing module
    // These tests verify conservation across arbitrary admit/settle walks
    #[cfg(feature = "property-tests")]
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        const PRICE: u128 = 100;

        fn build(slot: u32, deposit: u128) -> Reservation {
            let staked = deposit < PRICE;
            let builder = Reservation::builder(
                SlotIndex::from(slot),
                AccountId::new("alice").unwrap(),
                Amount::new(deposit),
            )
            .created_at(SystemTime::UNIX_EPOCH);
            if staked {
                builder
                    .staked(true)
                    .shortfall(Amount::new(PRICE - deposit))
                    .build()
                    .unwrap()
            } else {
                builder.build().unwrap()
            }
        }

        proptest! {
            // PROPERTY: every unit of escrow entering the ledger leaves it
            // through exactly one of refund, collection, or forfeiture.
            #[test]
            fn prop_escrow_is_conserved_across_full_drain(
                entries in prop::collection::vec((1..2 * PRICE, any::<bool>()), 1..20),
            ) {
                let mut ledger = Ledger::new(params());
                let requester = AccountId::new("alice").unwrap();
                let mut refunded = 0u128;
                let mut collected = 0u128;
                let mut forfeited = 0u128;
                let mut total = 0u128;

                for (deposit, collect_choice) in entries {
                    total += deposit;
                    let slot = ledger.next_free_slot().unwrap();
                    let reservation = build(slot.value(), deposit);
                    let staked = reservation.staked();
                    let shortfall = reservation.shortfall();
                    ledger.apply(&LedgerAction::Admit(reservation)).unwrap();
                    ledger.verify().unwrap();

                    let action = if staked {
                        forfeited += deposit;
                        LedgerAction::Forfeit {
                            slot,
                            requester: requester.clone(),
                            amount: Amount::new(deposit),
                            shortfall,
                        }
                    } else if collect_choice {
                        collected += deposit;
                        LedgerAction::Collect {
                            slot,
                            requester: requester.clone(),
                            amount: Amount::new(deposit),
                        }
                    } else {
                        refunded += deposit;
                        LedgerAction::Refund {
                            slot,
                            requester: requester.clone(),
                            amount: Amount::new(deposit),
                        }
                    };
                    ledger.apply(&action).unwrap();
                    ledger.verify().unwrap();
                }

                prop_assert!(ledger.escrow_balance().is_zero());
                prop_assert!(ledger.stake_due().is_zero());
                prop_assert_eq!(ledger.operator_revenue(), Amount::new(collected));
                prop_assert_eq!(ledger.forfeited_total(), Amount::new(forfeited));
                prop_assert_eq!(refunded + collected + forfeited, total);
            }
        }
    }

    fn params() -> LedgerParams {
        LedgerParams {
            service_name: "tollgate".to_string(),
            operator: AccountId::new("operator").unwrap(),
            price: Amount::new(100),
            max_slots: 3,
            maturity_window: Duration::from_secs(86_400),
        }
    }

    fn unstaked(slot: u32, requester: &str, deposit: u128) -> Reservation {
        Reservation::builder(
            SlotIndex::from(slot),
            AccountId::new(requester).unwrap(),
            Amount::new(deposit),
        )
        .created_at(SystemTime::UNIX_EPOCH)
        .build()
        .unwrap()
    }

    fn staked(slot: u32, requester: &str, deposit: u128, shortfall: u128) -> Reservation {
        Reservation::builder(
            SlotIndex::from(slot),
            AccountId::new(requester).unwrap(),
            Amount::new(deposit),
        )
        .staked(true)
        .shortfall(Amount::new(shortfall))
        .created_at(SystemTime::UNIX_EPOCH)
        .build()
        .unwrap()
    }

    #[test]
    fn test_params_validation() {
        assert!(params().validate().is_ok());

        let mut bad = params();
        bad.price = Amount::ZERO;
        assert!(bad.validate().is_err());

        let mut bad = params();
        bad.max_slots = 0;
        assert!(bad.validate().is_err());

        let mut bad = params();
        bad.service_name = "  ".to_string();
        assert!(bad.validate().is_err());

        // A zero maturity window is deliberately legal.
        let mut zero_window = params();
        zero_window.maturity_window = Duration::from_secs(0);
        assert!(zero_window.validate().is_ok());
    }

    #[test]
    fn test_admit_updates_escrow_and_stake() {
        let mut ledger = Ledger::new(params());

        ledger
            .apply(&LedgerAction::Admit(unstaked(0, "alice", 100)))
            .unwrap();
        assert_eq!(ledger.escrow_balance(), Amount::new(100));
        assert!(ledger.stake_due().is_zero());

        ledger
            .apply(&LedgerAction::Admit(staked(1, "bob", 60, 40)))
            .unwrap();
        assert_eq!(ledger.escrow_balance(), Amount::new(160));
        assert_eq!(ledger.stake_due(), Amount::new(40));
        assert_eq!(ledger.active_count(), 2);
        ledger.verify().unwrap();
    }

    #[test]
    fn test_collect_moves_escrow_to_revenue() {
        let mut ledger = Ledger::new(params());
        ledger
            .apply(&LedgerAction::Admit(unstaked(0, "alice", 100)))
            .unwrap();

        ledger
            .apply(&LedgerAction::Collect {
                slot: SlotIndex::from(0),
                requester: AccountId::new("alice").unwrap(),
                amount: Amount::new(100),
            })
            .unwrap();

        assert_eq!(ledger.active_count(), 0);
        assert!(ledger.escrow_balance().is_zero());
        assert_eq!(ledger.operator_revenue(), Amount::new(100));
        ledger.verify().unwrap();
    }

    #[test]
    fn test_refund_releases_escrow_without_revenue() {
        let mut ledger = Ledger::new(params());
        ledger
            .apply(&LedgerAction::Admit(unstaked(0, "alice", 100)))
            .unwrap();

        ledger
            .apply(&LedgerAction::Refund {
                slot: SlotIndex::from(0),
                requester: AccountId::new("alice").unwrap(),
                amount: Amount::new(100),
            })
            .unwrap();

        assert!(ledger.escrow_balance().is_zero());
        assert!(ledger.operator_revenue().is_zero());
        ledger.verify().unwrap();
    }

    #[test]
    fn test_forfeit_zeroes_stake_and_burns_deposit() {
        let mut ledger = Ledger::new(params());
        ledger
            .apply(&LedgerAction::Admit(staked(0, "bob", 60, 40)))
            .unwrap();

        ledger
            .apply(&LedgerAction::Forfeit {
                slot: SlotIndex::from(0),
                requester: AccountId::new("bob").unwrap(),
                amount: Amount::new(60),
                shortfall: Amount::new(40),
            })
            .unwrap();

        assert!(ledger.escrow_balance().is_zero());
        assert!(ledger.stake_due().is_zero());
        assert!(ledger.operator_revenue().is_zero());
        assert_eq!(ledger.forfeited_total(), Amount::new(60));
        ledger.verify().unwrap();
    }

    #[test]
    fn test_settlement_of_vacant_slot_fails() {
        let mut ledger = Ledger::new(params());
        let err = ledger
            .apply(&LedgerAction::Refund {
                slot: SlotIndex::from(0),
                requester: AccountId::new("alice").unwrap(),
                amount: Amount::new(100),
            })
            .unwrap_err();
        assert!(err.is_invalid_slot());
    }

    #[test]
    fn test_mismatched_settlement_action_fails_without_change() {
        let mut ledger = Ledger::new(params());
        ledger
            .apply(&LedgerAction::Admit(unstaked(0, "alice", 100)))
            .unwrap();

        // Wrong amount
        let err = ledger
            .apply(&LedgerAction::Refund {
                slot: SlotIndex::from(0),
                requester: AccountId::new("alice").unwrap(),
                amount: Amount::new(50),
            })
            .unwrap_err();
        assert!(matches!(err, Error::LedgerCorruption { .. }));

        // Collect of a staked occupant is never planned; apply rejects it too.
        let mut staked_ledger = Ledger::new(params());
        staked_ledger
            .apply(&LedgerAction::Admit(staked(0, "bob", 60, 40)))
            .unwrap();
        let err = staked_ledger
            .apply(&LedgerAction::Collect {
                slot: SlotIndex::from(0),
                requester: AccountId::new("bob").unwrap(),
                amount: Amount::new(60),
            })
            .unwrap_err();
        assert!(matches!(err, Error::LedgerCorruption { .. }));

        assert_eq!(ledger.active_count(), 1);
        assert_eq!(staked_ledger.active_count(), 1);
        ledger.verify().unwrap();
        staked_ledger.verify().unwrap();
    }

    #[test]
    fn test_capacity_bound_enforced() {
        let mut ledger = Ledger::new(params());
        for slot in 0..3 {
            ledger
                .apply(&LedgerAction::Admit(unstaked(slot, "alice", 10)))
                .unwrap();
        }
        let err = ledger
            .apply(&LedgerAction::Admit(unstaked(3, "alice", 10)))
            .unwrap_err();
        assert!(err.is_capacity_exhausted());
        assert_eq!(ledger.active_count(), 3);
        assert_eq!(ledger.escrow_balance(), Amount::new(30));
    }

    #[test]
    fn test_restore_round_trip() {
        let reservations = vec![staked(1, "bob", 60, 40), unstaked(2, "carol", 100)];
        let totals = LedgerTotals {
            escrow: Amount::new(160),
            stake_due: Amount::new(40),
            revenue: Amount::new(500),
            forfeited: Amount::new(7),
        };
        let ledger = Ledger::restore(params(), reservations, totals).unwrap();

        assert_eq!(ledger.active_count(), 2);
        assert_eq!(ledger.next_free_slot(), Some(SlotIndex::from(0)));
        assert_eq!(ledger.operator_revenue(), Amount::new(500));
        assert_eq!(ledger.forfeited_total(), Amount::new(7));
    }

    #[test]
    fn test_restore_detects_corrupt_totals() {
        let reservations = vec![staked(0, "bob", 60, 40)];
        let totals = LedgerTotals {
            escrow: Amount::new(60),
            stake_due: Amount::new(99), // diverges from the one active shortfall
            revenue: Amount::ZERO,
            forfeited: Amount::ZERO,
        };
        let err = Ledger::restore(params(), reservations, totals).unwrap_err();
        assert!(matches!(err, Error::LedgerCorruption { .. }));
    }

    #[test]
    fn test_is_operator() {
        let ledger = Ledger::new(params());
        assert!(ledger.is_operator(&AccountId::new("operator").unwrap()));
        assert!(!ledger.is_operator(&AccountId::new("alice").unwrap()));
    }
}
