//! Mediation between element indices and cache slots.
//!
//! Slots are direct-mapped: `element_index mod capacity`, no chaining, no
//! probing. Indices congruent modulo the capacity contend for one slot; the
//! most recently installed entry wins and the loser is evicted implicitly by
//! tag mismatch on its next lookup. Tags carry the resolved physical
//! location plus the owning vector's generation, so entries installed by an
//! unrelated vector sharing the cache are never served.

use std::rc::Rc;

use log::debug;
use slotcache::{Cache, CacheValue, EntryTag, Generation, ValueOwnership};

use crate::{Error, Location, Result};

#[inline(always)]
pub(crate) fn slot_for(index: u64, capacity: usize) -> usize {
    (index % capacity as u64) as usize
}

#[inline(always)]
fn tag_for(location: &Location, generation: Generation) -> EntryTag {
    EntryTag::new(location.source(), location.offset(), generation)
}

/// Looks up the cached value for an element, if the occupant of its slot
/// carries the exact `(source, offset, generation)` tag. Anything else
/// (empty slot, other location, other generation) is a miss.
pub(crate) fn lookup<V>(
    cache: &Cache<V>,
    index: u64,
    location: &Location,
    generation: Generation,
) -> Result<Option<Rc<V>>> {
    let slot = slot_for(index, cache.capacity());

    match cache.get(slot)? {
        Some(value) if value.tag() == tag_for(location, generation) => {
            debug!("cache hit for element {index} (slot {slot} of {})", cache.capacity());
            Ok(Some(value.value()))
        }
        _ => {
            debug!("cache miss for element {index} (slot {slot} of {})", cache.capacity());
            Ok(None)
        }
    }
}

/// Post-read verification: the read callback reported success, so a value
/// tagged for this exact element must now occupy the slot.
pub(crate) fn expect_cached<V>(
    cache: &Cache<V>,
    index: u64,
    location: &Location,
    generation: Generation,
) -> Result<Rc<V>> {
    let slot = slot_for(index, cache.capacity());

    cache
        .get(slot)?
        .filter(|value| value.tag() == tag_for(location, generation))
        .map(CacheValue::value)
        .ok_or(Error::MissingCacheValue { index })
}

/// Installs a value for an element, stamped with its physical location and
/// the owning vector's generation. The slot's previous occupant is released
/// per the cache's own ownership discipline.
pub(crate) fn install<V>(
    cache: &mut Cache<V>,
    index: u64,
    location: &Location,
    generation: Generation,
    value: Rc<V>,
    ownership: ValueOwnership,
) -> Result<()> {
    let slot = slot_for(index, cache.capacity());
    cache.set(slot, tag_for(location, generation), value, ownership)?;
    Ok(())
}
