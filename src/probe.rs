//! Linear probing over the table columns.

use crate::layout::Columns;
use crate::layout::State;

/// What the caller intends to do with the resolved slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Only a Filled slot holding the key is an answer.
    Lookup,
    /// A Filled slot holding the key, or else the slot a new entry belongs in.
    Insert,
}

/// Resolves the slot for `key` with cached hash `hash`.
///
/// Starting at `hash & mask`, slots are visited in order with wraparound:
/// - a Filled slot with an equal hash and byte-equal key is returned in
///   either mode;
/// - Deleted slots never end the scan, but in [`Mode::Insert`] the first one
///   seen is remembered;
/// - an Empty slot ends the scan: `None` for [`Mode::Lookup`], and for
///   [`Mode::Insert`] the remembered Deleted slot if any, else the Empty one.
///
/// # Panics
///
/// Panics if all `capacity` slots are visited without the scan ending. The
/// growth policy always leaves an Empty slot, so this only happens on a
/// corrupted state column.
fn find_slot(columns: &Columns<'_>, hash: u64, key: &[u8], mode: Mode) -> Option<usize> {
    let mask = columns.mask();
    let mut index = hash as usize & mask;
    let mut first_deleted = None;

    for _ in 0..columns.capacity() {
        match columns.states[index] {
            State::Empty => {
                return match mode {
                    Mode::Lookup => None,
                    Mode::Insert => Some(first_deleted.unwrap_or(index)),
                };
            }
            State::Deleted => {
                if mode == Mode::Insert && first_deleted.is_none() {
                    first_deleted = Some(index);
                }
            }
            State::Filled => {
                if columns.hashes[index] == hash && columns.keys[index] == key {
                    return Some(index);
                }
            }
        }

        index = (index + 1) & mask;
    }

    panic!(
        "probe for hash {hash:#018x} visited all {} slots without finding an empty slot",
        columns.capacity()
    );
}

/// Slot of the live entry for `key`, if any.
#[inline]
pub(crate) fn find(columns: &Columns<'_>, hash: u64, key: &[u8]) -> Option<usize> {
    find_slot(columns, hash, key, Mode::Lookup)
}

/// Slot an insert of `key` writes to: its live entry, or else the slot a new
/// entry belongs in.
#[inline]
pub(crate) fn find_insert_slot(columns: &Columns<'_>, hash: u64, key: &[u8]) -> usize {
    match find_slot(columns, hash, key, Mode::Insert) {
        Some(index) => index,
        None => unreachable!("insert probes end on a live match or a vacant slot"),
    }
}

/// Distance from the home slot of `hash` to `index`, following wraparound.
#[cfg(any(test, feature = "stats"))]
#[inline(always)]
pub(crate) fn probe_distance(hash: u64, index: usize, mask: usize) -> usize {
    index.wrapping_sub(hash as usize & mask) & mask
}
