#![doc = include_str!("../README.md")]

pub use slotcache::{
    Cache, CacheValue, EntryTag, Error as SlotCacheError, Generation, ValueOwnership,
};

mod backing;
mod coordinator;
mod error;
mod flags;
mod resolve;
mod segment;
mod table;
mod vector;

pub use backing::*;
pub use error::*;
pub use flags::*;
pub use resolve::*;
pub use segment::*;
pub use table::*;
pub use vector::*;
