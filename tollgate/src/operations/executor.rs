//! Plan execution engine.
//!
//! The executor applies operation plans to the in-memory ledger and,
//! when a store is attached, mirrors every applied action into the
//! database inside a single transaction. Application is all-or-nothing:
//! actions are staged against a copy of the ledger, so a plan that fails
//! part-way leaves no partial effects behind.

use std::time::SystemTime;

use crate::error::{Error, Result};
use crate::funds::Amount;
use crate::ledger::Ledger;
use crate::store::Store;

use super::admission::AdmissionRecord;
use super::plan::{LedgerAction, OperationPlan};
use super::settlement::{Disposition, SettlementRecord};

/// Result of executing a plan.
///
/// Carries the observable records derived from the plan: the admission
/// record for an admission, per-reservation settlement records and the
/// aggregate collected total for settlements. Dry runs produce the same
/// records without mutating anything.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,

    /// Whether this was a dry run (no changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were applied (or would be).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The admission record, for admission plans.
    pub admission: Option<AdmissionRecord>,

    /// Per-reservation settlement records, for settlement plans.
    pub settlements: Vec<SettlementRecord>,

    /// Aggregate amount swept into operator revenue by this plan.
    pub collected_total: Amount,
}

impl ExecutionResult {
    fn from_plan(plan: &OperationPlan, dry_run: bool) -> Result<Self> {
        let mut admission = None;
        let mut settlements = Vec::new();
        let mut collected_total = Amount::ZERO;

        for action in &plan.actions {
            match action {
                LedgerAction::Admit(reservation) => {
                    admission = Some(AdmissionRecord::for_reservation(reservation));
                }
                LedgerAction::Collect {
                    slot,
                    requester,
                    amount,
                } => {
                    collected_total =
                        collected_total
                            .checked_add(*amount)
                            .ok_or(Error::LedgerCorruption {
                                details: "collected total overflowed".into(),
                            })?;
                    settlements.push(SettlementRecord {
                        slot: *slot,
                        requester: requester.clone(),
                        amount: *amount,
                        disposition: Disposition::Collected,
                    });
                }
                LedgerAction::Refund {
                    slot,
                    requester,
                    amount,
                } => {
                    settlements.push(SettlementRecord {
                        slot: *slot,
                        requester: requester.clone(),
                        amount: *amount,
                        disposition: Disposition::Refunded,
                    });
                }
                LedgerAction::Forfeit {
                    slot,
                    requester,
                    amount,
                    ..
                } => {
                    settlements.push(SettlementRecord {
                        slot: *slot,
                        requester: requester.clone(),
                        amount: *amount,
                        disposition: Disposition::Forfeited,
                    });
                }
            }
        }

        Ok(Self {
            success: true,
            dry_run,
            actions_taken: plan.actions.iter().map(LedgerAction::description).collect(),
            warnings: plan.warnings.clone(),
            admission,
            settlements,
            collected_total,
        })
    }
}

/// Executes operation plans against the ledger.
///
/// The executor can run in normal mode (applying changes) or dry-run mode
/// (deriving the result records without changes).
///
/// # Examples
///
/// ```
/// use std::time::SystemTime;
/// use tollgate::{
///     AccountId, AdmissionOptions, AdmissionPlan, Amount, FlatRatePolicy, Ledger, LedgerParams,
///     PlanExecutor,
/// };
///
/// let params = LedgerParams {
///     service_name: "tollgate".to_string(),
///     operator: AccountId::new("operator").unwrap(),
///     price: Amount::new(100),
///     max_slots: 10,
///     maturity_window: std::time::Duration::from_secs(86_400),
/// };
/// let mut ledger = Ledger::new(params);
/// let policy = FlatRatePolicy::new(Amount::new(100));
/// let now = SystemTime::now();
///
/// let options = AdmissionOptions::new(AccountId::new("alice").unwrap(), Amount::new(150));
/// let plan = AdmissionPlan::new(options, &policy).build_plan(&ledger, now).unwrap();
///
/// let result = PlanExecutor::new(&mut ledger).execute(&plan, now).unwrap();
/// assert!(result.success);
/// assert_eq!(result.admission.unwrap().slot.value(), 0);
/// ```
pub struct PlanExecutor<'a> {
    ledger: &'a mut Ledger,
    store: Option<&'a mut Store>,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates a new plan executor over the given ledger.
    #[must_use]
    pub fn new(ledger: &'a mut Ledger) -> Self {
        Self {
            ledger,
            store: None,
            dry_run: false,
        }
    }

    /// Attaches a store; every applied action is persisted in one
    /// transaction alongside the updated aggregate balances.
    #[must_use]
    pub fn with_store(mut self, store: &'a mut Store) -> Self {
        self.store = Some(store);
        self
    }

    /// Switches the executor to dry-run mode.
    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the plan.
    ///
    /// `now` stamps the settlement audit rows; it should be the same
    /// clock reading the plan was built with.
    ///
    /// # Errors
    ///
    /// Returns an error if any action no longer matches the ledger state,
    /// if the resulting state fails invariant verification, or if
    /// persistence fails. On error nothing is changed.
    pub fn execute(&mut self, plan: &OperationPlan, now: SystemTime) -> Result<ExecutionResult> {
        let result = ExecutionResult::from_plan(plan, self.dry_run)?;
        if self.dry_run {
            return Ok(result);
        }

        // Stage against a copy so a mid-plan failure leaves the live
        // ledger untouched.
        let mut staged = self.ledger.clone();
        for action in &plan.actions {
            log::debug!("applying: {}", action.description());
            staged.apply(action)?;
        }
        staged.verify()?;

        if let Some(store) = self.store.as_deref_mut() {
            store.apply_actions(&plan.actions, &staged, now)?;
        }

        *self.ledger = staged;
        Ok(result)
    }
}
