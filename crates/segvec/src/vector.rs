use std::{cell::RefCell, fmt, rc::Rc};

use log::{debug, warn};
use slotcache::{Cache, Generation, ValueOwnership};

use crate::{
    Backing, ElementRequest, Error, HandleOwnership, ReadFlags, Result, Segment, SegmentTable,
    WriteFlags, coordinator,
};

/// Virtual, segmented, element-addressed vector over an external data
/// source.
///
/// The vector maps logical element indices onto physical locations inside
/// the segments of its [`SegmentTable`] and materializes element values on
/// demand through the [`Backing`] callbacks, retaining them in a shared
/// [`Cache`]. The cache is passed per call rather than owned, so one cache
/// can back many vectors: entries are stamped with a per-vector generation
/// and are never served across instances.
///
/// Not safe for concurrent use: the vector, its table, and the cache must be
/// confined to one thread (or wrapped in external synchronization by the
/// caller). The read callback may re-enter
/// [`set_element_by_index`](Vector::set_element_by_index) on the vector it
/// was invoked from; nested
/// element reads on the same vector are outside the contract, as the data
/// handle is lent to the callback for the duration of the call.
#[must_use = "Vector should be stored to keep its data handle alive"]
pub struct Vector<B: Backing> {
    element_size: u64,
    generation: Generation,
    ownership: HandleOwnership,
    handle: RefCell<Option<B::Handle>>,
    backing: B,
    segments: SegmentTable,
}

impl<B: Backing> Vector<B> {
    /// Creates a vector of `element_size`-byte elements over `backing`.
    ///
    /// The segment table starts empty; the generation is assigned here and
    /// never changes. With [`HandleOwnership::Owned`] the vector releases
    /// `handle` through [`Backing::free_handle`] at teardown; with
    /// [`HandleOwnership::Borrowed`] the handle is merely dropped.
    pub fn new(
        element_size: u64,
        backing: B,
        handle: Option<B::Handle>,
        ownership: HandleOwnership,
    ) -> Result<Self> {
        if element_size == 0 {
            return Err(Error::ZeroElementSize);
        }

        Ok(Self {
            element_size,
            generation: Generation::unique(),
            ownership,
            handle: RefCell::new(handle),
            backing,
            segments: SegmentTable::new(),
        })
    }

    #[inline(always)]
    pub fn element_size(&self) -> u64 {
        self.element_size
    }

    /// Total byte size of the backing data (sum of segment sizes).
    #[inline(always)]
    pub fn data_size(&self) -> u64 {
        self.segments.data_size()
    }

    #[inline(always)]
    pub fn generation(&self) -> Generation {
        self.generation
    }

    #[inline(always)]
    pub fn handle_ownership(&self) -> HandleOwnership {
        self.ownership
    }

    /// Number of whole elements the backing data holds.
    #[inline]
    pub fn element_count(&self) -> u64 {
        self.data_size() / self.element_size
    }

    // ========================================================================
    // Segment operations
    // ========================================================================

    #[inline(always)]
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Appends a segment to the layout, returning its index.
    pub fn append_segment(
        &mut self,
        source: u32,
        offset: u64,
        size: u64,
        flags: u32,
    ) -> Result<usize> {
        self.segments.append(Segment::new(source, offset, size, flags))
    }

    /// Sets the segment at `index`, filling a placeholder or replacing the
    /// previous range. `data_size` is adjusted by the size delta.
    pub fn set_segment(
        &mut self,
        index: usize,
        source: u32,
        offset: u64,
        size: u64,
        flags: u32,
    ) -> Result<()> {
        self.segments
            .set(index, Segment::new(source, offset, size, flags))
    }

    /// Returns the segment at `index`.
    pub fn segment(&self, index: usize) -> Result<Segment> {
        self.segments.get(index)
    }

    /// Changes the number of segment entries; growth adds placeholders to be
    /// filled by [`set_segment`](Self::set_segment).
    pub fn resize_segments(&mut self, count: usize) {
        self.segments.resize(count);
    }

    /// Drops every segment; the vector becomes empty.
    pub fn clear_segments(&mut self) {
        self.segments.clear();
    }

    // ========================================================================
    // Element operations
    // ========================================================================

    /// Translates a logical byte offset into `(element_index, intra_element
    /// offset)`.
    pub fn element_index_at_offset(&self, offset: u64) -> Result<(u64, u64)> {
        self.segments
            .element_index_at_offset(self.element_size, offset)
    }

    /// Retrieves the value of element `index`, reading it through the
    /// backing on a cache miss.
    ///
    /// `io` is the per-call external I/O context forwarded to the read
    /// callback. With [`ReadFlags::IGNORE_CACHE`] the lookup is skipped and
    /// the callback always runs; its result is still installed for future
    /// lookups. Fails without invoking the callback when `index` is out of
    /// bounds, and with [`Error::MissingCacheValue`] when the callback
    /// claims success without installing a matching entry.
    pub fn element_by_index(
        &self,
        io: &mut B::Io,
        cache: &mut Cache<B::Value>,
        index: u64,
        read_flags: ReadFlags,
    ) -> Result<Rc<B::Value>> {
        let location = self.segments.locate_element(self.element_size, index)?;

        if !read_flags.ignore_cache()
            && let Some(value) = coordinator::lookup(cache, index, &location, self.generation)?
        {
            return Ok(value);
        }

        debug!(
            "reading element {index} at offset {} ({} bytes)",
            location.offset(),
            self.element_size
        );

        let request = ElementRequest {
            index,
            source: location.source(),
            offset: location.offset(),
            size: self.element_size,
            flags: location.flags(),
        };
        {
            let mut handle = self.handle.borrow_mut();
            self.backing
                .read_element(handle.as_mut(), io, self, cache, request, read_flags)?;
        }

        coordinator::expect_cached(cache, index, &location, self.generation)
    }

    /// Retrieves the value of the element containing the logical byte
    /// offset `offset`.
    ///
    /// The intra-element offset is discarded; callers addressing bytes
    /// within the element must re-derive it via
    /// [`element_index_at_offset`](Self::element_index_at_offset).
    pub fn element_at_offset(
        &self,
        io: &mut B::Io,
        cache: &mut Cache<B::Value>,
        offset: u64,
        read_flags: ReadFlags,
    ) -> Result<Rc<B::Value>> {
        let (index, _) = self.element_index_at_offset(offset)?;
        self.element_by_index(io, cache, index, read_flags)
    }

    /// Installs a value for element `index` in the cache, stamped with the
    /// element's resolved physical location and this vector's generation.
    ///
    /// Bounds are checked exactly as on the read path. This is the entry
    /// point a [`Backing::read_element`] implementation calls back into to
    /// publish the value it produced.
    pub fn set_element_by_index(
        &self,
        cache: &mut Cache<B::Value>,
        index: u64,
        value: Rc<B::Value>,
        ownership: ValueOwnership,
    ) -> Result<()> {
        let location = self.segments.locate_element(self.element_size, index)?;
        coordinator::install(cache, index, &location, self.generation, value, ownership)
    }

    /// Flushes element `index` back to the backing data through the write
    /// callback. Never invoked implicitly by any get/set path.
    pub fn write_element_by_index(
        &self,
        io: &mut B::Io,
        cache: &mut Cache<B::Value>,
        index: u64,
        write_flags: WriteFlags,
    ) -> Result<()> {
        let location = self.segments.locate_element(self.element_size, index)?;

        let request = ElementRequest {
            index,
            source: location.source(),
            offset: location.offset(),
            size: self.element_size,
            flags: location.flags(),
        };
        let mut handle = self.handle.borrow_mut();
        self.backing
            .write_element(handle.as_mut(), io, self, cache, request, write_flags)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Clones the vector: same element size and backing, a handle duplicated
    /// through [`Backing::clone_handle`], a deep copy of the segment table,
    /// and a fresh generation (the clone's cache entries are its own).
    ///
    /// A vector without a handle clones trivially; one with a handle fails
    /// with [`Error::MissingCallback`] when the backing does not implement
    /// `clone_handle`. The clone always owns its handle.
    pub fn try_clone(&self) -> Result<Self>
    where
        B: Clone,
    {
        let handle = match &*self.handle.borrow() {
            Some(handle) => Some(self.backing.clone_handle(handle)?),
            None => None,
        };

        let mut clone = Self::new(
            self.element_size,
            self.backing.clone(),
            handle,
            HandleOwnership::Owned,
        )?;
        clone.segments = self.segments.clone();

        Ok(clone)
    }

    /// Releases the vector: drops the segment table and, for an owned
    /// handle, runs the free-handle callback.
    ///
    /// Cleanup is best-effort-complete: the failure of the handle release
    /// (including a backing without `free_handle`) is reported after the
    /// rest of the teardown has run. Dropping the vector without calling
    /// `close` performs the same teardown, logging failures instead.
    pub fn close(mut self) -> Result<()> {
        self.segments.clear();
        self.release_handle()
    }

    fn release_handle(&mut self) -> Result<()> {
        if self.ownership != HandleOwnership::Owned {
            return Ok(());
        }
        match self.handle.get_mut().take() {
            Some(handle) => self.backing.free_handle(handle),
            None => Ok(()),
        }
    }
}

impl<B: Backing> Drop for Vector<B> {
    fn drop(&mut self) {
        if let Err(error) = self.release_handle() {
            warn!("failed to release data handle: {error}");
        }
    }
}

impl<B: Backing> fmt::Debug for Vector<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vector")
            .field("element_size", &self.element_size)
            .field("generation", &self.generation)
            .field("ownership", &self.ownership)
            .field("segments", &self.segments)
            .finish_non_exhaustive()
    }
}
