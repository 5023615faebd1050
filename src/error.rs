use core::alloc::Layout;

/// The error type for fallible table allocation.
///
/// Returned by [`Table::try_insert`](crate::Table::try_insert),
/// [`Table::try_reserve`](crate::Table::try_reserve) and the `try_*`
/// constructors. Lookup and removal misses are not errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TableError {
    /// The requested capacity does not fit in `usize` or exceeds the maximum
    /// allocation size for one of the columns.
    #[error("capacity overflow")]
    CapacityOverflow,

    /// The allocator failed to provide memory for a column.
    #[error("memory allocation of {} bytes failed", .layout.size())]
    AllocError {
        /// The layout of the column that could not be allocated.
        layout: Layout,
    },
}

impl TableError {
    /// Diverges the way the infallible table operations do: allocator
    /// failures go to [`handle_alloc_error`](alloc::alloc::handle_alloc_error),
    /// capacity overflow panics.
    #[cold]
    #[inline(never)]
    pub(crate) fn abort(self) -> ! {
        match self {
            TableError::CapacityOverflow => panic!("capacity overflow"),
            TableError::AllocError { layout } => alloc::alloc::handle_alloc_error(layout),
        }
    }
}
