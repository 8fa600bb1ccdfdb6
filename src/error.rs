use tessera_common::{CompositionType, TypeError};

/// Every recoverable allocation, placement, and layout failure in the crate.
///
/// Sizing conditions are reported here instead of panicking so callers can allocate a
/// larger arena and retry. Element addressing errors (an index past `count`) are not
/// represented; those panic, since they indicate a broken upstream invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("allocation overflow: {requested} bytes at offset {byte_offset} do not fit in a region of {capacity} bytes")]
    AllocationOverflow {
        requested: usize,
        byte_offset: usize,
        capacity: usize,
    },
    #[error("slot overflow: all {count} slots of the accessor have already been taken")]
    SlotOverflow { count: usize },
    #[error("footprint out of bounds: {footprint} bytes at offset {byte_offset} exceed a block of {block_length} bytes")]
    OutOfBoundsFootprint {
        byte_offset: usize,
        footprint: usize,
        block_length: usize,
    },
    #[error("region of {byte_length} bytes at offset {byte_offset} overlaps an existing region")]
    RegionOverlap {
        byte_offset: usize,
        byte_length: usize,
    },
    #[error("cannot copy {copied} bytes into a footprint of {available} bytes")]
    FootprintMismatch { copied: usize, available: usize },
    #[error("expected an accessor of composition {expected}, found {actual}")]
    CompositionMismatch {
        expected: CompositionType,
        actual: CompositionType,
    },
    #[error("expected elements of {expected} components, found {actual}")]
    ElementWidthMismatch { expected: usize, actual: usize },
    #[error(transparent)]
    Type(#[from] TypeError),
}
