use std::result;

use thiserror::Error;

pub type Result<T, E = Error> = result::Result<T, E>;

/// Error types for slotcache operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Cache capacity must be greater than zero")]
    ZeroCapacity,

    #[error("Slot {slot} is out of bounds for cache of capacity {capacity}")]
    SlotOutOfBounds { slot: usize, capacity: usize },
}
