use alloc::vec::Vec;
use core::alloc::Layout;

use crate::error::TableError;

/// Per-slot state tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub(crate) enum State {
    #[default]
    Empty = 0,
    Filled = 1,
    Deleted = 2,
}

/// The four parallel columns of a table, all exactly `capacity` long.
///
/// `hashes[i]`, `keys[i]` and `values[i]` are meaningful only while
/// `states[i] == State::Filled`. Vacated slots keep stale data, which the
/// state column masks.
#[derive(Clone)]
pub(crate) struct Columns<'k> {
    pub(crate) keys: Vec<&'k [u8]>,
    pub(crate) values: Vec<u64>,
    pub(crate) hashes: Vec<u64>,
    pub(crate) states: Vec<State>,
}

/// Allocates a column of exactly `capacity` copies of `fill`, reporting
/// failure instead of aborting.
fn try_column<T: Copy>(capacity: usize, fill: T) -> Result<Vec<T>, TableError> {
    let layout = Layout::array::<T>(capacity).map_err(|_| TableError::CapacityOverflow)?;

    let mut column = Vec::new();
    column
        .try_reserve_exact(capacity)
        .map_err(|_| TableError::AllocError { layout })?;
    column.resize(capacity, fill);
    Ok(column)
}

impl<'k> Columns<'k> {
    /// Allocates all four columns with every slot Empty.
    ///
    /// `capacity` must be a power of two.
    pub(crate) fn try_with_capacity(capacity: usize) -> Result<Self, TableError> {
        debug_assert!(capacity.is_power_of_two());

        Ok(Self {
            keys: try_column(capacity, &[][..])?,
            values: try_column(capacity, 0)?,
            hashes: try_column(capacity, 0)?,
            states: try_column(capacity, State::Empty)?,
        })
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.states.len()
    }

    #[inline(always)]
    pub(crate) fn mask(&self) -> usize {
        self.capacity() - 1
    }

    /// Writes a live entry into slot `index`, marking it Filled.
    #[inline(always)]
    pub(crate) fn fill(&mut self, index: usize, hash: u64, key: &'k [u8], value: u64) {
        self.hashes[index] = hash;
        self.keys[index] = key;
        self.values[index] = value;
        self.states[index] = State::Filled;
    }

    /// Bytes held by the four columns.
    #[cfg(any(test, feature = "stats"))]
    pub(crate) fn allocated_bytes(&self) -> usize {
        self.keys.capacity() * core::mem::size_of::<&[u8]>()
            + self.values.capacity() * core::mem::size_of::<u64>()
            + self.hashes.capacity() * core::mem::size_of::<u64>()
            + self.states.capacity() * core::mem::size_of::<State>()
    }
}
