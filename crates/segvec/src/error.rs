use std::{io, result};

use thiserror::Error;

pub type Result<T, E = Error> = result::Result<T, E>;

/// Error types for segvec operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] io::Error),
    #[error(transparent)]
    Cache(#[from] slotcache::Error),

    #[error("Element size must be greater than zero")]
    ZeroElementSize,

    #[error("Segment index {index} is out of bounds for table of {count} segments")]
    SegmentOutOfBounds { index: usize, count: usize },

    #[error("Segment {index} has no range set")]
    MissingSegment { index: usize },

    #[error("Vector has no segments")]
    NoSegments,

    #[error("Offset {offset} is past the end of the data ({data_size} bytes)")]
    OffsetOutOfBounds { offset: u64, data_size: u64 },

    #[error("Element index {index} is out of bounds ({data_size} data bytes)")]
    ElementOutOfBounds { index: u64, data_size: u64 },

    #[error("Segment sizes overflow the addressable range")]
    SizeOverflow,

    #[error("Missing {callback} callback")]
    MissingCallback { callback: &'static str },

    #[error("Read callback succeeded but left no cache value for element {index}")]
    MissingCacheValue { index: u64 },
}
