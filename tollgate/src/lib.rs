#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # tollgate
//!
//! A library for rationing a fixed number of concurrent paid connection
//! slots with escrowed deposits.
//!
//! Each admitted reservation escrows a deposit. Deposits at or above the
//! canonical price are full purchases; smaller deposits are stake-backed,
//! with the shortfall tracked as outstanding stake. After a fixed holding
//! period the operator may collect matured unstaked deposits as revenue;
//! before maturity the requester may cancel for a full refund, while a
//! staker who cancels forfeits the deposit instead.
//!
//! ## Core Types
//!
//! - [`Ledger`] and [`LedgerParams`]: the single-writer ledger aggregate
//! - [`Reservation`], [`SlotIndex`], and [`SlotPool`]: the capacity arena
//! - [`PricingPolicy`] and [`FlatRatePolicy`]: deposit classification
//! - [`AdmissionPlan`], [`CollectPlan`], [`CancelPlan`], and
//!   [`PlanExecutor`]: the plan-execute operation layer
//! - [`Store`]: transactional persistence and the settlement audit trail
//! - [`Error`] and [`Result`]: error handling types
//!
//! ## Examples
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
//!     price: Amount::new(3_000_000_000_000_000),
//!     max_slots: 10,
//!     maturity_window: std::time::Duration::from_secs(86_400),
//! };
//! let mut ledger = Ledger::new(params);
//! let policy = FlatRatePolicy::new(Amount::new(3_000_000_000_000_000));
//! let now = SystemTime::now();
//!
//! let options = AdmissionOptions::new(
//!     AccountId::new("alice").unwrap(),
//!     Amount::new(3_000_000_000_000_000),
//! );
//! let plan = AdmissionPlan::new(options, &policy).build_plan(&ledger, now).unwrap();
//! let result = PlanExecutor::new(&mut ledger).execute(&plan, now).unwrap();
//!
//! let record = result.admission.unwrap();
//! assert_eq!(record.slot.value(), 0);
//! assert!(!record.staked);
//! ```

pub mod account;
pub mod config;
pub mod error;
pub mod funds;
pub mod ledger;
pub mod logging;
pub mod operations;
pub mod pool;
pub mod pricing;
pub mod reservation;
pub mod store;

// Re-export key types at crate root for convenience
pub use account::AccountId;
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use funds::Amount;
pub use ledger::{Ledger, LedgerParams, LedgerTotals};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    check_availability, AdmissionOptions, AdmissionPlan, AdmissionRecord, CancelOptions,
    CancelPlan, CollectPlan, Disposition, ExecutionResult, LedgerAction, OperationPlan,
    PlanExecutor, SettlementRecord,
};
pub use pool::SlotPool;
pub use pricing::{Classification, FlatRatePolicy, PricingPolicy};
pub use reservation::{Reservation, SlotIndex};
pub use store::{SettlementRow, Store, StoreConfig};
