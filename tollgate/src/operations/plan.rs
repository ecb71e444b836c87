//! Plan types for ledger operations.
//!
//! Plans describe what an operation will do to the ledger without doing
//! it. They are built against an immutable snapshot, can be inspected or
//! rendered for a dry run, and are applied atomically by the executor.

use crate::account::AccountId;
use crate::funds::Amount;
use crate::reservation::{Reservation, SlotIndex};

/// A single action to be applied to the ledger.
///
/// Settlement actions carry the requester and amounts they were planned
/// against so that application can detect a stale plan instead of
/// settling the wrong occupant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerAction {
    /// Admit a new reservation into its assigned slot.
    Admit(Reservation),

    /// Sweep a matured unstaked deposit into operator revenue.
    Collect {
        /// The slot being settled.
        slot: SlotIndex,
        /// The requester whose deposit is collected.
        requester: AccountId,
        /// The deposit amount moving to revenue.
        amount: Amount,
    },

    /// Refund an unmatured unstaked deposit to its requester.
    Refund {
        /// The slot being settled.
        slot: SlotIndex,
        /// The requester receiving the refund.
        requester: AccountId,
        /// The deposit amount refunded.
        amount: Amount,
    },

    /// Forfeit a staked deposit, removing it from the liability surface.
    Forfeit {
        /// The slot being settled.
        slot: SlotIndex,
        /// The requester forfeiting the deposit.
        requester: AccountId,
        /// The deposit amount forfeited.
        amount: Amount,
        /// The stake shortfall cleared from the aggregate.
        shortfall: Amount,
    },
}

impl LedgerAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Admit(r) => {
                let kind = if r.staked() { "staked" } else { "unstaked" };
                format!(
                    "Admit {kind} reservation for {} in slot {} with deposit {}",
                    r.requester(),
                    r.slot(),
                    r.deposit()
                )
            }
            Self::Collect {
                slot,
                requester,
                amount,
            } => {
                format!("Collect {amount} from slot {slot} ({requester}) into operator revenue")
            }
            Self::Refund {
                slot,
                requester,
                amount,
            } => {
                format!("Refund {amount} from slot {slot} to {requester}")
            }
            Self::Forfeit {
                slot,
                requester,
                amount,
                shortfall,
            } => {
                format!(
                    "Forfeit {amount} staked by {requester} in slot {slot} (clearing stake {shortfall})"
                )
            }
        }
    }
}

/// A complete operation plan describing all actions to be taken.
///
/// Plans carry a description, the action sequence, and warnings that
/// should reach the caller even when the plan is empty (an empty plan is
/// a valid no-op, not an error).
///
/// # Examples
///
/// ```
/// use tollgate::OperationPlan;
///
/// let plan = OperationPlan::new("Collect matured deposits");
/// assert!(plan.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to apply.
    pub actions: Vec<LedgerAction>,

    /// Warnings to communicate to the caller.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates a new, empty plan with the given description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: LedgerAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }
}
