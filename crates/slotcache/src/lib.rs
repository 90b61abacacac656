#![doc = include_str!("../README.md")]

use std::rc::Rc;

use log::debug;

mod error;
mod generation;
mod value;

pub use error::*;
pub use generation::*;
pub use value::*;

/// Fixed-capacity, slot-addressed value store.
///
/// Slot selection is the caller's business; the cache only stores, tags, and
/// releases values. Overwriting an occupied slot drops the previous occupant
/// (its value, if `Managed`, dies with it).
#[derive(Debug)]
#[must_use = "Cache should be stored to retain its entries"]
pub struct Cache<V> {
    slots: Vec<Option<CacheValue<V>>>,
}

impl<V> Cache<V> {
    /// Creates a cache with a fixed number of slots.
    ///
    /// A zero capacity is a configuration error, not an empty cache.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }

        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        Ok(Self { slots })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of slots currently holding a value.
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Reads the occupant of a slot, if any.
    #[inline]
    pub fn get(&self, slot: usize) -> Result<Option<&CacheValue<V>>> {
        self.slots
            .get(slot)
            .map(Option::as_ref)
            .ok_or(Error::SlotOutOfBounds {
                slot,
                capacity: self.capacity(),
            })
    }

    /// Stores a value in a slot under the given tag.
    ///
    /// The previous occupant, if any, is dropped.
    pub fn set(
        &mut self,
        slot: usize,
        tag: EntryTag,
        value: Rc<V>,
        ownership: ValueOwnership,
    ) -> Result<()> {
        let capacity = self.capacity();
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(Error::SlotOutOfBounds { slot, capacity })?;

        if entry.is_some() {
            debug!("slot {slot} overwritten");
        }
        *entry = Some(CacheValue::new(tag, value, ownership));

        Ok(())
    }

    /// Removes and returns the occupant of a slot.
    pub fn take(&mut self, slot: usize) -> Result<Option<CacheValue<V>>> {
        let capacity = self.capacity();
        self.slots
            .get_mut(slot)
            .map(Option::take)
            .ok_or(Error::SlotOutOfBounds { slot, capacity })
    }

    /// Empties a slot, dropping its occupant if any.
    pub fn clear_slot(&mut self, slot: usize) -> Result<()> {
        self.take(slot).map(|_| ())
    }

    /// Empties every slot. Capacity is unchanged.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
    }

    /// Changes the number of slots.
    ///
    /// Growing adds empty slots; shrinking drops the occupants of the removed
    /// tail. A zero capacity is rejected as at construction.
    pub fn resize(&mut self, capacity: usize) -> Result<()> {
        if capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        self.slots.resize_with(capacity, || None);
        Ok(())
    }
}
