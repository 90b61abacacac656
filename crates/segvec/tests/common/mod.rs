#![allow(dead_code)]

use std::{cell::Cell, rc::Rc};

use segvec::{
    Backing, Cache, ElementRequest, HandleOwnership, ReadFlags, Result, ValueOwnership, Vector,
    WriteFlags,
};

/// Shared counters observing a backing's callback activity from outside the
/// vector that owns the handle.
#[derive(Debug, Default, Clone)]
pub struct Counters(Rc<CountersInner>);

#[derive(Debug, Default)]
struct CountersInner {
    reads: Cell<u64>,
    writes: Cell<u64>,
    frees: Cell<u64>,
    clones: Cell<u64>,
}

impl Counters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> u64 {
        self.0.reads.get()
    }

    pub fn writes(&self) -> u64 {
        self.0.writes.get()
    }

    pub fn frees(&self) -> u64 {
        self.0.frees.get()
    }

    pub fn clones(&self) -> u64 {
        self.0.clones.get()
    }

    fn bump(cell: &Cell<u64>) {
        cell.set(cell.get() + 1);
    }
}

/// Backing that synthesizes elements whose first four bytes little-endian
/// encode the element index. All four callbacks are implemented and counted
/// through the [`Counters`] handle.
#[derive(Debug, Clone, Copy)]
pub struct IndexedBacking;

impl Backing for IndexedBacking {
    type Handle = Counters;
    type Io = ();
    type Value = Vec<u8>;

    fn read_element(
        &self,
        handle: Option<&mut Counters>,
        _io: &mut (),
        vector: &Vector<Self>,
        cache: &mut Cache<Vec<u8>>,
        request: ElementRequest,
        _read_flags: ReadFlags,
    ) -> Result<()> {
        if let Some(counters) = handle {
            Counters::bump(&counters.0.reads);
        }

        let mut data = vec![0u8; request.size as usize];
        data[..4].copy_from_slice(&(request.index as u32).to_le_bytes());
        vector.set_element_by_index(cache, request.index, Rc::new(data), ValueOwnership::Managed)
    }

    fn write_element(
        &self,
        handle: Option<&mut Counters>,
        _io: &mut (),
        _vector: &Vector<Self>,
        _cache: &mut Cache<Vec<u8>>,
        _request: ElementRequest,
        _write_flags: WriteFlags,
    ) -> Result<()> {
        if let Some(counters) = handle {
            Counters::bump(&counters.0.writes);
        }
        Ok(())
    }

    fn free_handle(&self, handle: Counters) -> Result<()> {
        Counters::bump(&handle.0.frees);
        Ok(())
    }

    fn clone_handle(&self, handle: &Counters) -> Result<Counters> {
        Counters::bump(&handle.0.clones);
        Ok(handle.clone())
    }
}

/// One vector of `count` elements of `element_size` bytes over a single
/// segment at physical offset 0, with a counted handle.
pub fn indexed_vector(
    element_size: u64,
    count: u64,
) -> Result<(Vector<IndexedBacking>, Counters)> {
    let counters = Counters::new();
    let mut vector = Vector::new(
        element_size,
        IndexedBacking,
        Some(counters.clone()),
        HandleOwnership::Owned,
    )?;
    vector.append_segment(0, 0, element_size * count, 0)?;
    Ok((vector, counters))
}

/// Decodes the element index stamped in a value's first four bytes.
pub fn decode_index(data: &[u8]) -> u32 {
    u32::from_le_bytes(data[..4].try_into().unwrap())
}
