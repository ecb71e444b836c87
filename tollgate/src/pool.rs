//! The fixed-capacity slot pool holding active reservations.
//!
//! The pool is an arena of `MAX_SLOTS` optional reservation records. The
//! next assignable slot is always the lowest vacant index, which yields the
//! required assignment order: strictly increasing from 0 while capacity
//! remains, with a freed index becoming the next one handed out. Freeing a
//! slot only vacates it; settlement history lives in the store's audit
//! table, never in the pool.

use crate::error::{Error, Result};
use crate::reservation::{Reservation, SlotIndex};

/// A fixed-capacity arena of reservation slots.
///
/// # Examples
///
/// ```
/// use tollgate::{AccountId, Amount, Reservation, SlotIndex, SlotPool};
///
/// let mut pool = SlotPool::new(2);
/// assert_eq!(pool.next_free_slot(), Some(SlotIndex::from(0)));
///
/// let requester = AccountId::new("alice").unwrap();
/// let reservation = Reservation::builder(SlotIndex::from(0), requester, Amount::new(10))
///     .build()
///     .unwrap();
/// pool.allocate(reservation).unwrap();
///
/// assert_eq!(pool.active_count(), 1);
/// assert_eq!(pool.next_free_slot(), Some(SlotIndex::from(1)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotPool {
    slots: Vec<Option<Reservation>>,
}

impl SlotPool {
    /// Creates an empty pool with the given fixed capacity.
    ///
    /// The capacity never changes after construction; the hard bound on
    /// concurrent reservations is exactly this value.
    #[must_use]
    pub fn new(capacity: u32) -> Self {
        Self {
            slots: vec![None; capacity as usize],
        }
    }

    /// Returns the fixed capacity of the pool.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn capacity(&self) -> u32 {
        self.slots.len() as u32
    }

    /// Returns the number of active (unsettled) reservations.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Returns `true` when every slot is occupied.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.next_free_slot().is_none()
    }

    /// Returns the lowest vacant slot index, or `None` when the pool is
    /// full.
    ///
    /// This is a pure read with no side effects.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn next_free_slot(&self) -> Option<SlotIndex> {
        self.slots
            .iter()
            .position(Option::is_none)
            .map(|i| SlotIndex::from(i as u32))
    }

    /// Returns the active reservation in a slot, if any.
    #[must_use]
    pub fn get(&self, slot: SlotIndex) -> Option<&Reservation> {
        self.slots.get(slot.index()).and_then(Option::as_ref)
    }

    /// Iterates over the active reservations in slot order.
    pub fn iter_active(&self) -> impl Iterator<Item = &Reservation> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    /// Writes a new reservation into the pool.
    ///
    /// The reservation must carry the pool's current next free slot index;
    /// allocation and slot assignment are one atomic step, so a plan built
    /// against a stale snapshot is rejected rather than silently placed
    /// elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `CapacityExhausted` when no slot is vacant, or
    /// `LedgerCorruption` when the reservation's slot does not match the
    /// next assignable index.
    pub fn allocate(&mut self, reservation: Reservation) -> Result<SlotIndex> {
        let next = self.next_free_slot().ok_or(Error::CapacityExhausted {
            capacity: self.capacity(),
        })?;
        if reservation.slot() != next {
            return Err(Error::LedgerCorruption {
                details: format!(
                    "allocation for slot {} does not match next free slot {next}",
                    reservation.slot()
                ),
            });
        }
        self.slots[next.index()] = Some(reservation);
        Ok(next)
    }

    /// Restores a reservation at its recorded slot.
    ///
    /// Used when reconstructing the pool from persistent storage, where
    /// settled slots may leave gaps below active ones.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlot` if the slot is out of range, or
    /// `LedgerCorruption` if the slot is already occupied.
    pub fn restore(&mut self, reservation: Reservation) -> Result<()> {
        let slot = reservation.slot();
        if slot.index() >= self.slots.len() {
            return Err(Error::InvalidSlot {
                slot,
                reason: format!("beyond pool capacity {}", self.capacity()),
            });
        }
        if self.slots[slot.index()].is_some() {
            return Err(Error::LedgerCorruption {
                details: format!("two reservations recorded for slot {slot}"),
            });
        }
        self.slots[slot.index()] = Some(reservation);
        Ok(())
    }

    /// Vacates a slot, returning the reservation that occupied it.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSlot` if the slot is out of range or already vacant.
    pub fn free(&mut self, slot: SlotIndex) -> Result<Reservation> {
        if slot.index() >= self.slots.len() {
            return Err(Error::InvalidSlot {
                slot,
                reason: format!("beyond pool capacity {}", self.capacity()),
            });
        }
        self.slots[slot.index()].take().ok_or(Error::InvalidSlot {
            slot,
            reason: "no active reservation".into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::AccountId;
    use crate::funds::Amount;

    fn reservation(slot: u32) -> Reservation {
        Reservation::builder(
            SlotIndex::from(slot),
            AccountId::new("alice").unwrap(),
            Amount::new(100),
        )
        .build()
        .unwrap()
    }

    #[test]
    fn test_empty_pool() {
        let pool = SlotPool::new(3);
        assert_eq!(pool.capacity(), 3);
        assert_eq!(pool.active_count(), 0);
        assert!(!pool.is_full());
        assert_eq!(pool.next_free_slot(), Some(SlotIndex::from(0)));
    }

    #[test]
    fn test_allocation_order_is_strictly_increasing() {
        let mut pool = SlotPool::new(3);
        for expected in 0..3 {
            let assigned = pool.allocate(reservation(expected)).unwrap();
            assert_eq!(assigned, SlotIndex::from(expected));
        }
        assert!(pool.is_full());
        assert_eq!(pool.next_free_slot(), None);
    }

    #[test]
    fn test_allocate_when_full_fails() {
        let mut pool = SlotPool::new(1);
        pool.allocate(reservation(0)).unwrap();

        let err = pool.allocate(reservation(1)).unwrap_err();
        assert!(err.is_capacity_exhausted());
        // The failed allocation changed nothing.
        assert_eq!(pool.active_count(), 1);
    }

    #[test]
    fn test_allocate_rejects_stale_slot() {
        let mut pool = SlotPool::new(3);
        pool.allocate(reservation(0)).unwrap();

        // A plan built before the first allocation would still target slot 0.
        let err = pool.allocate(reservation(0)).unwrap_err();
        assert!(matches!(err, Error::LedgerCorruption { .. }));
    }

    #[test]
    fn test_freed_slot_is_reassigned_next() {
        let mut pool = SlotPool::new(3);
        pool.allocate(reservation(0)).unwrap();
        pool.allocate(reservation(1)).unwrap();
        pool.allocate(reservation(2)).unwrap();

        pool.free(SlotIndex::from(1)).unwrap();
        assert_eq!(pool.next_free_slot(), Some(SlotIndex::from(1)));

        pool.allocate(reservation(1)).unwrap();
        assert!(pool.is_full());
    }

    #[test]
    fn test_free_returns_occupant() {
        let mut pool = SlotPool::new(2);
        pool.allocate(reservation(0)).unwrap();

        let freed = pool.free(SlotIndex::from(0)).unwrap();
        assert_eq!(freed.slot(), SlotIndex::from(0));
        assert_eq!(pool.active_count(), 0);
    }

    #[test]
    fn test_free_vacant_slot_fails() {
        let mut pool = SlotPool::new(2);
        let err = pool.free(SlotIndex::from(0)).unwrap_err();
        assert!(err.is_invalid_slot());
    }

    #[test]
    fn test_free_out_of_range_fails() {
        let mut pool = SlotPool::new(2);
        let err = pool.free(SlotIndex::from(5)).unwrap_err();
        assert!(err.is_invalid_slot());
    }

    #[test]
    fn test_reallocation_replaces_all_fields() {
        let mut pool = SlotPool::new(1);
        let first = Reservation::builder(
            SlotIndex::from(0),
            AccountId::new("alice").unwrap(),
            Amount::new(100),
        )
        .build()
        .unwrap();
        pool.allocate(first).unwrap();
        pool.free(SlotIndex::from(0)).unwrap();

        let second = Reservation::builder(
            SlotIndex::from(0),
            AccountId::new("bob").unwrap(),
            Amount::new(75),
        )
        .staked(true)
        .shortfall(Amount::new(25))
        .build()
        .unwrap();
        pool.allocate(second).unwrap();

        let occupant = pool.get(SlotIndex::from(0)).unwrap();
        assert_eq!(occupant.requester().as_str(), "bob");
        assert_eq!(occupant.deposit(), Amount::new(75));
        assert!(occupant.staked());
    }

    #[test]
    fn test_restore_at_arbitrary_slot() {
        let mut pool = SlotPool::new(4);
        pool.restore(reservation(2)).unwrap();

        assert_eq!(pool.active_count(), 1);
        assert!(pool.get(SlotIndex::from(2)).is_some());
        // Lower vacant slots are still assignable first.
        assert_eq!(pool.next_free_slot(), Some(SlotIndex::from(0)));
    }

    #[test]
    fn test_restore_duplicate_slot_fails() {
        let mut pool = SlotPool::new(4);
        pool.restore(reservation(2)).unwrap();
        let err = pool.restore(reservation(2)).unwrap_err();
        assert!(matches!(err, Error::LedgerCorruption { .. }));
    }

    #[test]
    fn test_restore_out_of_range_fails() {
        let mut pool = SlotPool::new(2);
        let err = pool.restore(reservation(2)).unwrap_err();
        assert!(err.is_invalid_slot());
    }

    #[test]
    fn test_iter_active_in_slot_order() {
        let mut pool = SlotPool::new(4);
        pool.restore(reservation(3)).unwrap();
        pool.restore(reservation(1)).unwrap();

        let slots: Vec<u32> = pool.iter_active().map(|r| r.slot().value()).collect();
        assert_eq!(slots, vec![1, 3]);
    }
}
