use smallvec::SmallVec;

use crate::{Error, Result, Segment};

/// Segment tables stay inline up to this many entries. Layouts are expected
/// to be tens of segments, not millions.
const INLINE_SEGMENTS: usize = 8;

/// Ordered table of segments describing a vector's backing layout.
///
/// Entries are dense and zero-indexed; an entry may be a placeholder
/// (reserved by [`resize`](Self::resize) but not yet set). `data_size` is
/// the sum of the sizes of all present segments and is kept consistent by
/// every mutation; there is no state in which the two disagree.
#[derive(Debug, Clone, Default)]
pub struct SegmentTable {
    entries: SmallVec<[Option<Segment>; INLINE_SEGMENTS]>,
    data_size: u64,
}

impl SegmentTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, placeholders included.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total byte size of all present segments.
    #[inline(always)]
    pub fn data_size(&self) -> u64 {
        self.data_size
    }

    /// Appends a segment, returning its index.
    pub fn append(&mut self, segment: Segment) -> Result<usize> {
        let data_size = self
            .data_size
            .checked_add(segment.size())
            .ok_or(Error::SizeOverflow)?;

        let index = self.entries.len();
        self.entries.push(Some(segment));
        self.data_size = data_size;

        Ok(index)
    }

    /// Returns the segment at `index`.
    ///
    /// An index past the end and an unset placeholder are both errors, not
    /// silent no-ops.
    pub fn get(&self, index: usize) -> Result<Segment> {
        self.entries
            .get(index)
            .ok_or(Error::SegmentOutOfBounds {
                index,
                count: self.entries.len(),
            })?
            .ok_or(Error::MissingSegment { index })
    }

    /// Sets the segment at `index`, filling a placeholder or replacing the
    /// previous segment.
    ///
    /// Replacement rolls the previous size out of `data_size` and the new
    /// size in as one operation.
    pub fn set(&mut self, index: usize, segment: Segment) -> Result<()> {
        let count = self.entries.len();
        let entry = self
            .entries
            .get_mut(index)
            .ok_or(Error::SegmentOutOfBounds { index, count })?;

        let previous_size = entry.as_ref().map(Segment::size).unwrap_or(0);
        let data_size = (self.data_size - previous_size)
            .checked_add(segment.size())
            .ok_or(Error::SizeOverflow)?;

        *entry = Some(segment);
        self.data_size = data_size;

        Ok(())
    }

    /// Changes the number of entries.
    ///
    /// Growing adds placeholders; shrinking drops the tail and rolls the
    /// dropped sizes out of `data_size`.
    pub fn resize(&mut self, count: usize) {
        if count < self.entries.len() {
            let removed: u64 = self.entries[count..]
                .iter()
                .flatten()
                .map(Segment::size)
                .sum();
            self.data_size -= removed;
        }
        self.entries.resize(count, None);
    }

    /// Drops every entry; `data_size` returns to zero.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.data_size = 0;
    }

    #[inline(always)]
    pub(crate) fn entries(&self) -> &[Option<Segment>] {
        &self.entries
    }
}
