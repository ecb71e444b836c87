//! Reservation types for tracking admitted connections.
//!
//! A reservation records one admitted unit of paid access: who funded it,
//! how much was escrowed, how the deposit was classified against the
//! canonical price, and when it was created. Maturity is never stored; it
//! is always derived from the creation timestamp and the configured
//! maturity window at the point of use.

use std::fmt;
use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::account::AccountId;
use crate::funds::Amount;

/// A 0-based capacity slot index.
///
/// Slot indices are assigned in strictly increasing order from 0 while
/// capacity remains, and a freed index becomes the next assignable one.
///
/// # Examples
///
/// ```
/// use tollgate::SlotIndex;
///
/// let slot = SlotIndex::from(3);
/// assert_eq!(slot.value(), 3);
/// assert_eq!(format!("{slot}"), "3");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SlotIndex(u32);

impl SlotIndex {
    /// Returns the underlying index.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns the index as a `usize` for array access.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for SlotIndex {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for SlotIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One admitted reservation occupying a capacity slot.
///
/// Reservations are created only at admission and leave the pool only
/// through settlement (collection or cancellation). The stake
/// classification is fixed at admission time and immutable thereafter.
///
/// # Examples
///
/// ```
/// use tollgate::{AccountId, Amount, Reservation, SlotIndex};
///
/// let requester = AccountId::new("alice").unwrap();
/// let reservation = Reservation::builder(
///     SlotIndex::from(0),
///     requester,
///     Amount::new(3_000_000_000_000_000),
/// )
/// .build()
/// .unwrap();
///
/// assert!(!reservation.staked());
/// assert!(reservation.shortfall().is_zero());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    slot: SlotIndex,
    requester: AccountId,
    deposit: Amount,
    staked: bool,
    shortfall: Amount,
    created_at: SystemTime,
}

impl Reservation {
    /// Creates a new reservation builder.
    ///
    /// The builder defaults to an unstaked reservation with zero shortfall
    /// created now; admission sets the classification and timestamp
    /// explicitly.
    #[must_use]
    pub fn builder(slot: SlotIndex, requester: AccountId, deposit: Amount) -> ReservationBuilder {
        ReservationBuilder {
            slot,
            requester,
            deposit,
            staked: false,
            shortfall: Amount::ZERO,
            created_at: None,
        }
    }

    /// Returns the assigned slot index.
    #[must_use]
    pub const fn slot(&self) -> SlotIndex {
        self.slot
    }

    /// Returns the identity that funded the reservation.
    ///
    /// Only this identity may cancel it.
    #[must_use]
    pub const fn requester(&self) -> &AccountId {
        &self.requester
    }

    /// Returns the escrowed deposit.
    #[must_use]
    pub const fn deposit(&self) -> Amount {
        self.deposit
    }

    /// Returns whether the deposit was classified as stake-backed.
    #[must_use]
    pub const fn staked(&self) -> bool {
        self.staked
    }

    /// Returns the stake shortfall (zero for unstaked reservations).
    #[must_use]
    pub const fn shortfall(&self) -> Amount {
        self.shortfall
    }

    /// Returns the admission timestamp.
    #[must_use]
    pub const fn created_at(&self) -> SystemTime {
        self.created_at
    }

    /// Checks whether the reservation has matured.
    ///
    /// A reservation matures once its age reaches the maturity window.
    /// A clock reading earlier than the creation timestamp reads as
    /// unmatured.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::time::{Duration, SystemTime};
    /// use tollgate::{AccountId, Amount, Reservation, SlotIndex};
    ///
    /// let requester = AccountId::new("alice").unwrap();
    /// let created = SystemTime::now();
    /// let reservation = Reservation::builder(SlotIndex::from(0), requester, Amount::new(10))
    ///     .created_at(created)
    ///     .build()
    ///     .unwrap();
    ///
    /// let window = Duration::from_secs(86_400);
    /// assert!(!reservation.is_matured(created, window));
    /// assert!(reservation.is_matured(created + window, window));
    /// ```
    #[must_use]
    pub fn is_matured(&self, now: SystemTime, window: Duration) -> bool {
        now.duration_since(self.created_at)
            .map(|age| age >= window)
            .unwrap_or(false)
    }
}

/// Builder for creating `Reservation` instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    slot: SlotIndex,
    requester: AccountId,
    deposit: Amount,
    staked: bool,
    shortfall: Amount,
    created_at: Option<SystemTime>,
}

impl ReservationBuilder {
    /// Sets the stake classification flag.
    #[must_use]
    pub const fn staked(mut self, staked: bool) -> Self {
        self.staked = staked;
        self
    }

    /// Sets the stake shortfall.
    #[must_use]
    pub const fn shortfall(mut self, shortfall: Amount) -> Self {
        self.shortfall = shortfall;
        self
    }

    /// Sets the admission timestamp.
    #[must_use]
    pub fn created_at(mut self, created_at: SystemTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Builds the reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the classification is inconsistent: an unstaked
    /// reservation with a non-zero shortfall, or a staked reservation with
    /// a zero shortfall.
    pub fn build(self) -> Result<Reservation, ValidationError> {
        if !self.staked && !self.shortfall.is_zero() {
            return Err(ValidationError {
                field: "shortfall".into(),
                message: "unstaked reservations must carry a zero shortfall".into(),
            });
        }
        if self.staked && self.shortfall.is_zero() {
            return Err(ValidationError {
                field: "shortfall".into(),
                message: "staked reservations must carry a non-zero shortfall".into(),
            });
        }

        Ok(Reservation {
            slot: self.slot,
            requester: self.requester,
            deposit: self.deposit,
            staked: self.staked,
            shortfall: self.shortfall,
            created_at: self.created_at.unwrap_or_else(SystemTime::now),
        })
    }
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}
