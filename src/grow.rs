//! Growth policy: when the table must rehash and what capacity it moves to.

use crate::error::TableError;

cfg_if::cfg_if! {
    if #[cfg(feature = "load-seventy-five")] {
        /// Percentage of slots that may be Filled or Deleted before an insert
        /// triggers a rehash.
        pub const LOAD_FACTOR_PERCENT: usize = 75;
    } else {
        /// Percentage of slots that may be Filled or Deleted before an insert
        /// triggers a rehash.
        pub const LOAD_FACTOR_PERCENT: usize = 78;
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "small-initial-capacity")] {
        /// Slot count of a freshly constructed table, and the floor of every
        /// capacity the table grows to.
        pub const INITIAL_CAPACITY: usize = 1 << 4;
    } else {
        /// Slot count of a freshly constructed table, and the floor of every
        /// capacity the table grows to.
        pub const INITIAL_CAPACITY: usize = 1 << 10;
    }
}

/// Largest `size + tombstones` a table of `capacity` slots tolerates before
/// the next insert rehashes.
///
/// For every capacity `>= INITIAL_CAPACITY` this leaves at least one Empty
/// slot after the insert that reaches it, so lookup probes always terminate.
#[inline(always)]
pub(crate) fn max_load(capacity: usize) -> usize {
    ((capacity as u128 * LOAD_FACTOR_PERCENT as u128) / 100) as usize
}

/// Whether an insert into a table with the given counters must rehash first.
#[inline(always)]
pub(crate) fn needs_grow(size: usize, tombstones: usize, capacity: usize) -> bool {
    size + tombstones > max_load(capacity)
}

/// Capacity the table moves to when it outgrows `capacity`: doubled, and
/// never below [`INITIAL_CAPACITY`].
#[inline]
pub(crate) fn next_capacity(capacity: usize) -> Result<usize, TableError> {
    capacity
        .checked_mul(2)
        .map(|doubled| doubled.max(INITIAL_CAPACITY))
        .ok_or(TableError::CapacityOverflow)
}

/// Smallest power-of-two capacity, at least [`INITIAL_CAPACITY`], that holds
/// `entries` live entries without triggering a rehash.
pub(crate) fn capacity_for(entries: usize) -> Result<usize, TableError> {
    let mut capacity = INITIAL_CAPACITY;
    while entries > max_load(capacity) {
        capacity = capacity
            .checked_mul(2)
            .ok_or(TableError::CapacityOverflow)?;
    }
    Ok(capacity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_capacity_is_power_of_two() {
        assert!(INITIAL_CAPACITY.is_power_of_two());
        assert!(max_load(INITIAL_CAPACITY) < INITIAL_CAPACITY - 1);
    }

    #[test]
    fn trigger_counts_tombstones() {
        let limit = max_load(1024);
        assert!(!needs_grow(limit, 0, 1024));
        assert!(needs_grow(limit + 1, 0, 1024));
        assert!(needs_grow(limit / 2, limit / 2 + 1, 1024));
    }

    #[test]
    fn doubling_is_clamped_to_initial() {
        assert_eq!(next_capacity(0), Ok(INITIAL_CAPACITY));
        assert_eq!(next_capacity(1), Ok(INITIAL_CAPACITY));
        assert_eq!(
            next_capacity(INITIAL_CAPACITY),
            Ok(INITIAL_CAPACITY * 2)
        );
        assert_eq!(
            next_capacity(usize::MAX / 2 + 1),
            Err(TableError::CapacityOverflow)
        );
    }

    #[test]
    fn capacity_for_entries() {
        assert_eq!(capacity_for(0), Ok(INITIAL_CAPACITY));
        assert_eq!(capacity_for(max_load(INITIAL_CAPACITY)), Ok(INITIAL_CAPACITY));
        assert_eq!(
            capacity_for(max_load(INITIAL_CAPACITY) + 1),
            Ok(INITIAL_CAPACITY * 2)
        );

        let capacity = capacity_for(100_000).unwrap();
        assert!(capacity.is_power_of_two());
        assert!(max_load(capacity) >= 100_000);
        assert!(max_load(capacity / 2) < 100_000);
        assert_eq!(capacity_for(usize::MAX), Err(TableError::CapacityOverflow));
    }
}
