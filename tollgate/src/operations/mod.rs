//! Ledger operations using the plan-execute pattern.
//!
//! Every state transition (admission, collection, cancellation) is
//! split into two phases:
//!
//! 1. **Planning**: analyzes the request against an immutable ledger
//!    snapshot, performs authorization and maturity checks, and builds a
//!    plan of [`plan::LedgerAction`]s (or a typed error, with no state
//!    change).
//! 2. **Execution**: applies the plan atomically to the ledger and, when
//!    a store is attached, persists it in a single transaction.
//!
//! The split keeps each operation's whole-call atomicity trivially
//! auditable and gives the CLI a dry-run mode for free. Plans must be
//! executed in the same call that built them, with the same clock
//! reading; the executor rejects plans that no longer match the ledger.
//!
//! # Examples
//!
//! ```
//! use std::time::SystemTime;
//! use tollgate::{
//!     AccountId, AdmissionOptions, AdmissionPlan, Amount, FlatRatePolicy, Ledger, LedgerParams,
//!     PlanExecutor,
//! };
//!
//! let params = LedgerParams {
//!     service_name: "tollgate".to_string(),
//!     operator: AccountId::new("operator").unwrap(),
//!     price: Amount::new(100),
//!     max_slots: 10,
//!     maturity_window: std::time::Duration::from_secs(86_400),
//! };
//! let mut ledger = Ledger::new(params);
//! let policy = FlatRatePolicy::new(Amount::new(100));
//! let now = SystemTime::now();
//!
//! let options = AdmissionOptions::new(AccountId::new("alice").unwrap(), Amount::new(150));
//! let plan = AdmissionPlan::new(options, &policy).build_plan(&ledger, now).unwrap();
//! let result = PlanExecutor::new(&mut ledger).execute(&plan, now).unwrap();
//! assert_eq!(result.admission.unwrap().slot.value(), 0);
//! ```

pub mod admission;
pub mod executor;
pub mod plan;
pub mod settlement;

#[cfg(test)]
mod proptests;

pub use admission::{check_availability, AdmissionOptions, AdmissionPlan, AdmissionRecord};
pub use executor::{ExecutionResult, PlanExecutor};
pub use plan::{LedgerAction, OperationPlan};
pub use settlement::{
    CancelOptions, CancelPlan, CollectPlan, Disposition, SettlementRecord,
};
