//! Property-based tests for ledger operations.
//!
//! These drive arbitrary operation sequences through the plan-execute
//! path and check the ledger invariants after every step: the capacity
//! bound always holds, the stake aggregate always equals the sum of
//! active staked shortfalls, failed operations change nothing, and slot
//! assignment always picks the lowest vacant index.

use std::time::{Duration, SystemTime};

use proptest::prelude::*;

use crate::account::AccountId;
use crate::funds::Amount;
use crate::ledger::{Ledger, LedgerParams};
use crate::operations::admission::{AdmissionOptions, AdmissionPlan};
use crate::operations::executor::PlanExecutor;
use crate::operations::settlement::{CancelOptions, CancelPlan, CollectPlan};
use crate::pricing::FlatRatePolicy;
use crate::reservation::SlotIndex;

const ACCOUNTS: [&str; 5] = ["operator", "alice", "bob", "carol", "dave"];
const PRICE: u128 = 100;
const MAX_SLOTS: u32 = 4;
const WINDOW_SECS: u64 = 1_000;

#[derive(Debug, Clone)]
enum Op {
    Request { who: usize, deposit: u128 },
    Collect { who: usize },
    Cancel { slot: u32, who: usize },
    Advance { secs: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1..ACCOUNTS.len(), 1..=2 * PRICE).prop_map(|(who, deposit)| Op::Request { who, deposit }),
        (0..ACCOUNTS.len()).prop_map(|who| Op::Collect { who }),
        (0..MAX_SLOTS + 2, 0..ACCOUNTS.len()).prop_map(|(slot, who)| Op::Cancel { slot, who }),
        (1..3 * WINDOW_SECS).prop_map(|secs| Op::Advance { secs }),
    ]
}

fn account(who: usize) -> AccountId {
    AccountId::new(ACCOUNTS[who]).unwrap()
}

fn fresh_ledger() -> Ledger {
    Ledger::new(LedgerParams {
        service_name: "tollgate".to_string(),
        operator: account(0),
        price: Amount::new(PRICE),
        max_slots: MAX_SLOTS,
        maturity_window: Duration::from_secs(WINDOW_SECS),
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]

    #[test]
    fn ledger_invariants_hold_under_arbitrary_operations(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut ledger = fresh_ledger();
        let policy = FlatRatePolicy::new(Amount::new(PRICE));
        let mut now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);

        for op in ops {
            let before = (ledger.totals(), ledger.active_count());

            match op {
                Op::Request { who, deposit } => {
                    let expected_slot = ledger.next_free_slot();
                    let options = AdmissionOptions::new(account(who), Amount::new(deposit));
                    let plan = AdmissionPlan::new(options, &policy).build_plan(&ledger, now);
                    match plan {
                        Ok(plan) => {
                            let result = PlanExecutor::new(&mut ledger)
                                .execute(&plan, now)
                                .expect("planned admission must apply");
                            let record = result.admission.expect("admission record");
                            // Assignment is always the lowest vacant index.
                            prop_assert_eq!(Some(record.slot), expected_slot);
                            prop_assert_eq!(record.staked, deposit < PRICE);
                        }
                        Err(err) => {
                            prop_assert!(err.is_capacity_exhausted());
                            prop_assert_eq!(expected_slot, None);
                            prop_assert_eq!((ledger.totals(), ledger.active_count()), before);
                        }
                    }
                }
                Op::Collect { who } => {
                    let plan = CollectPlan::new(account(who)).build_plan(&ledger, now);
                    match plan {
                        Ok(plan) => {
                            prop_assert_eq!(who, 0);
                            let result = PlanExecutor::new(&mut ledger)
                                .execute(&plan, now)
                                .expect("planned collection must apply");
                            // Every swept slot is vacated.
                            for record in &result.settlements {
                                prop_assert!(ledger.pool().get(record.slot).is_none());
                            }
                        }
                        Err(err) => {
                            prop_assert!(err.is_not_authorized());
                            prop_assert_ne!(who, 0);
                            prop_assert_eq!((ledger.totals(), ledger.active_count()), before);
                        }
                    }
                }
                Op::Cancel { slot, who } => {
                    let options = CancelOptions::new(SlotIndex::from(slot), account(who));
                    match CancelPlan::new(options).build_plan(&ledger, now) {
                        Ok(plan) => {
                            PlanExecutor::new(&mut ledger)
                                .execute(&plan, now)
                                .expect("planned cancellation must apply");
                        }
                        Err(err) => {
                            prop_assert!(err.is_invalid_slot() || err.is_not_authorized());
                            prop_assert_eq!((ledger.totals(), ledger.active_count()), before);
                        }
                    }
                }
                Op::Advance { secs } => {
                    now += Duration::from_secs(secs);
                }
            }

            // Core invariants after every step.
            prop_assert!(ledger.active_count() <= MAX_SLOTS as usize);
            ledger.verify().expect("ledger invariants");
        }
    }

    #[test]
    fn stake_due_equals_sum_of_active_staked_shortfalls(deposits in prop::collection::vec(1..=2 * PRICE, 1..8)) {
        let mut ledger = fresh_ledger();
        let policy = FlatRatePolicy::new(Amount::new(PRICE));
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);

        let mut expected_stake = 0u128;
        for (i, deposit) in deposits.into_iter().enumerate() {
            if i as u32 >= MAX_SLOTS {
                break;
            }
            let options = AdmissionOptions::new(account(1), Amount::new(deposit));
            let plan = AdmissionPlan::new(options, &policy)
                .build_plan(&ledger, now)
                .unwrap();
            PlanExecutor::new(&mut ledger).execute(&plan, now).unwrap();
            if deposit < PRICE {
                expected_stake += PRICE - deposit;
            }
        }

        prop_assert_eq!(ledger.stake_due(), Amount::new(expected_stake));
    }
}
