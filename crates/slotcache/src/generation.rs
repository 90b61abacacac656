use std::sync::atomic::{AtomicU64, Ordering};

/// Marker distinguishing one cache consumer instance from another.
///
/// Consumers sharing a cache stamp every entry they install with their own
/// generation and treat any occupant carrying a different one as a miss.
/// Generations are plain comparable values, not reference identity, so tags
/// survive should entries ever be serialized or handed across a process
/// boundary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

impl Generation {
    /// Allocates a process-wide distinct generation.
    ///
    /// Monotonic counter rather than a timestamp: two instances created
    /// within the same clock tick must still get distinct tags.
    pub fn unique() -> Self {
        Self(NEXT_GENERATION.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn new(generation: u64) -> Self {
        Self(generation)
    }
}

impl From<u64> for Generation {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<Generation> for u64 {
    fn from(value: Generation) -> Self {
        value.0
    }
}
