use slotcache::Cache;

use crate::{Error, ReadFlags, Result, Vector, WriteFlags};

/// Resolved physical coordinates of one element, handed to the read and
/// write callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementRequest {
    /// Logical index of the element within the vector.
    pub index: u64,
    /// Physical source the containing segment belongs to.
    pub source: u32,
    /// Absolute byte offset of the element within that source.
    pub offset: u64,
    /// Fixed element size in bytes.
    pub size: u64,
    /// The containing segment's caller-defined flags.
    pub flags: u32,
}

/// Caller-supplied behavior behind a [`Vector`]: the data handle type and
/// the read/write/free/clone lifecycle callbacks.
///
/// Every method has a default body returning
/// [`MissingCallback`](Error::MissingCallback): leaving a method
/// unimplemented is how a backing declares that it does not support the
/// operation (a read-only backing implements `read_element` only, a vector
/// that never owns its handle needs neither `free_handle` nor
/// `clone_handle`).
///
/// `read_element` is handed the vector it was invoked from and is expected
/// to install the value it produces via
/// [`Vector::set_element_by_index`] on that same vector/cache pair before
/// returning success. The controller verifies the installation and treats a
/// successful callback that installed nothing as an internal inconsistency.
pub trait Backing: Sized {
    /// Opaque per-vector context (e.g. decoder state). May be absent.
    type Handle;
    /// Per-call external I/O context (e.g. an open file).
    type Io;
    /// The element value type materialized by `read_element`.
    type Value;

    /// Materializes the element described by `request` from the backing
    /// data.
    #[allow(unused_variables)]
    fn read_element(
        &self,
        handle: Option<&mut Self::Handle>,
        io: &mut Self::Io,
        vector: &Vector<Self>,
        cache: &mut Cache<Self::Value>,
        request: ElementRequest,
        read_flags: ReadFlags,
    ) -> Result<()> {
        Err(Error::MissingCallback {
            callback: "read_element",
        })
    }

    /// Flushes one element back to the backing data. Only ever invoked
    /// explicitly through [`Vector::write_element_by_index`].
    #[allow(unused_variables)]
    fn write_element(
        &self,
        handle: Option<&mut Self::Handle>,
        io: &mut Self::Io,
        vector: &Vector<Self>,
        cache: &mut Cache<Self::Value>,
        request: ElementRequest,
        write_flags: WriteFlags,
    ) -> Result<()> {
        Err(Error::MissingCallback {
            callback: "write_element",
        })
    }

    /// Releases an owned data handle at vector teardown.
    #[allow(unused_variables)]
    fn free_handle(&self, handle: Self::Handle) -> Result<()> {
        Err(Error::MissingCallback {
            callback: "free_handle",
        })
    }

    /// Duplicates the data handle for [`Vector::try_clone`].
    #[allow(unused_variables)]
    fn clone_handle(&self, handle: &Self::Handle) -> Result<Self::Handle> {
        Err(Error::MissingCallback {
            callback: "clone_handle",
        })
    }
}
