use std::rc::Rc;

use slotcache::{Cache, EntryTag, Error, Generation, Result, ValueOwnership};

fn tag(offset: u64, generation: Generation) -> EntryTag {
    EntryTag::new(0, offset, generation)
}

#[test]
fn zero_capacity_is_rejected() {
    assert!(matches!(
        Cache::<u32>::with_capacity(0),
        Err(Error::ZeroCapacity)
    ));
    let mut cache = Cache::<u32>::with_capacity(2).unwrap();
    assert!(matches!(cache.resize(0), Err(Error::ZeroCapacity)));
}

#[test]
fn set_get_roundtrip() -> Result<()> {
    let generation = Generation::unique();
    let mut cache = Cache::with_capacity(4)?;

    assert_eq!(cache.capacity(), 4);
    assert_eq!(cache.occupied(), 0);
    assert!(cache.get(3)?.is_none());

    cache.set(3, tag(1536, generation), Rc::new(7u32), ValueOwnership::Managed)?;

    let value = cache.get(3)?.expect("slot 3 occupied");
    assert_eq!(value.tag(), tag(1536, generation));
    assert_eq!(value.ownership(), ValueOwnership::Managed);
    assert_eq!(*value.value(), 7);
    assert_eq!(cache.occupied(), 1);

    Ok(())
}

#[test]
fn slot_out_of_bounds() -> Result<()> {
    let generation = Generation::unique();
    let mut cache = Cache::with_capacity(2)?;

    assert!(matches!(
        cache.get(2),
        Err(Error::SlotOutOfBounds {
            slot: 2,
            capacity: 2
        })
    ));
    assert!(matches!(
        cache.set(5, tag(0, generation), Rc::new(0u32), ValueOwnership::Managed),
        Err(Error::SlotOutOfBounds {
            slot: 5,
            capacity: 2
        })
    ));
    assert!(cache.take(9).is_err());

    Ok(())
}

#[test]
fn overwrite_drops_previous_occupant() -> Result<()> {
    let generation = Generation::unique();
    let mut cache = Cache::with_capacity(1)?;

    let first = Rc::new(vec![1u8, 2, 3]);
    let witness = Rc::clone(&first);
    cache.set(0, tag(0, generation), first, ValueOwnership::Managed)?;
    assert_eq!(Rc::strong_count(&witness), 2);

    cache.set(0, tag(512, generation), Rc::new(vec![4u8]), ValueOwnership::Managed)?;
    assert_eq!(Rc::strong_count(&witness), 1);
    assert_eq!(cache.get(0)?.unwrap().tag().offset(), 512);

    Ok(())
}

#[test]
fn shared_value_outlives_eviction() -> Result<()> {
    let generation = Generation::unique();
    let mut cache = Cache::with_capacity(1)?;

    let value = Rc::new(42u32);
    cache.set(0, tag(0, generation), Rc::clone(&value), ValueOwnership::Shared)?;
    cache.clear();

    assert_eq!(Rc::strong_count(&value), 1);
    assert_eq!(*value, 42);

    Ok(())
}

#[test]
fn take_and_clear_slot() -> Result<()> {
    let generation = Generation::unique();
    let mut cache = Cache::with_capacity(2)?;

    cache.set(0, tag(0, generation), Rc::new(1u32), ValueOwnership::Managed)?;
    cache.set(1, tag(512, generation), Rc::new(2u32), ValueOwnership::Managed)?;

    let taken = cache.take(0)?.expect("slot 0 occupied");
    assert_eq!(*taken.into_value(), 1);
    assert!(cache.get(0)?.is_none());

    cache.clear_slot(1)?;
    assert_eq!(cache.occupied(), 0);

    Ok(())
}

#[test]
fn resize_preserves_surviving_slots() -> Result<()> {
    let generation = Generation::unique();
    let mut cache = Cache::with_capacity(4)?;

    cache.set(1, tag(512, generation), Rc::new(1u32), ValueOwnership::Managed)?;
    cache.set(3, tag(1536, generation), Rc::new(3u32), ValueOwnership::Managed)?;

    cache.resize(2)?;
    assert_eq!(cache.capacity(), 2);
    assert_eq!(*cache.get(1)?.unwrap().value(), 1);
    assert!(cache.get(3).is_err());

    cache.resize(8)?;
    assert_eq!(cache.capacity(), 8);
    assert_eq!(*cache.get(1)?.unwrap().value(), 1);
    assert!(cache.get(3)?.is_none());

    Ok(())
}

#[test]
fn generations_are_distinct() {
    let a = Generation::unique();
    let b = Generation::unique();
    assert_ne!(a, b);
    assert!(u64::from(a) < u64::from(b));
}
