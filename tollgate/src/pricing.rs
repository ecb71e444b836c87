//! Deposit classification against the canonical connection price.
//!
//! The pricing formula is deliberately kept behind a trait. Admission
//! and settlement depend only on this interface, so a different rule
//! (ordinal-dependent, volume-dependent) can be swapped in without
//! touching either.

use crate::funds::Amount;

/// The result of classifying a deposit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    /// `true` if the deposit is a partial, stake-backed commitment.
    pub staked: bool,
    /// The outstanding stake (`price - deposit`), zero when unstaked.
    pub shortfall: Amount,
}

impl Classification {
    /// A full, unstaked purchase.
    #[must_use]
    pub const fn unstaked() -> Self {
        Self {
            staked: false,
            shortfall: Amount::ZERO,
        }
    }

    /// A stake-backed commitment with the given shortfall.
    #[must_use]
    pub const fn staked(shortfall: Amount) -> Self {
        Self {
            staked: true,
            shortfall,
        }
    }
}

/// Classifies incoming deposits as full purchases or stake-backed
/// commitments.
pub trait PricingPolicy {
    /// Classifies a deposit, computing its stake shortfall if any.
    fn classify(&self, deposit: Amount) -> Classification;
}

/// The default policy: a flat threshold at a fixed canonical price.
///
/// Deposits at or above the price are unstaked full purchases; deposits
/// below it are staked, with the difference tracked as outstanding stake.
///
/// # Examples
///
/// ```
/// use tollgate::{Amount, FlatRatePolicy, PricingPolicy};
///
/// let policy = FlatRatePolicy::new(Amount::new(100));
///
/// let full = policy.classify(Amount::new(150));
/// assert!(!full.staked);
///
/// let partial = policy.classify(Amount::new(60));
/// assert!(partial.staked);
/// assert_eq!(partial.shortfall, Amount::new(40));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRatePolicy {
    price: Amount,
}

impl FlatRatePolicy {
    /// Creates a policy with the given canonical price.
    #[must_use]
    pub const fn new(price: Amount) -> Self {
        Self { price }
    }

    /// Returns the canonical price.
    #[must_use]
    pub const fn price(&self) -> Amount {
        self.price
    }
}

impl PricingPolicy for FlatRatePolicy {
    fn classify(&self, deposit: Amount) -> Classification {
        if deposit >= self.price {
            return Classification::unstaked();
        }
        // deposit < price, so the subtraction cannot underflow
        let shortfall = self
            .price
            .checked_sub(deposit)
            .unwrap_or(Amount::ZERO);
        Classification::staked(shortfall)
    }
}
