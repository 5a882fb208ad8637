use thiserror::Error;

/// Error types for `ErasedVec` and `FatVec` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum FatVecError {
    /// The allocation hooks could not satisfy a request
    #[error("Allocation failed: {size} bytes with alignment {align}")]
    AllocationFailed {
        /// Number of bytes requested, header included
        size: usize,
        /// Alignment requested
        align: usize,
    },
    /// The byte size of the requested capacity does not fit in `isize`
    #[error("Capacity overflow: {capacity} items of {item_size} bytes")]
    CapacityOverflow {
        /// Capacity that was requested
        capacity: usize,
        /// Size of one item in bytes
        item_size: usize,
    },
    /// Index is beyond the current vector length
    #[error("Index out of bounds: index {index} is beyond vector length {length}")]
    IndexOutOfBounds {
        /// Index that was accessed
        index: usize,
        /// Current length of the vector
        length: usize,
    },
    /// Item bytes do not match the element size of the vector
    #[error("Item size mismatch: expected {expected} bytes, got {actual}")]
    ItemSizeMismatch {
        /// Element size of the vector
        expected: usize,
        /// Length of the provided item
        actual: usize,
    },
}
