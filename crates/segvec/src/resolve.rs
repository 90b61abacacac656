use crate::{Error, Result, SegmentTable};

/// Resolved physical coordinates of a logical position: the containing
/// segment's source and flags, and the absolute byte offset within that
/// source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    source: u32,
    offset: u64,
    flags: u32,
}

impl Location {
    #[inline(always)]
    pub fn source(&self) -> u32 {
        self.source
    }

    #[inline(always)]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    #[inline(always)]
    pub fn flags(&self) -> u32 {
        self.flags
    }
}

/// Pure translation walks over the segment table. Linear in segment count,
/// which is small for the intended layouts; segment boundaries belong to the
/// next segment (strict `<` against each cumulative end).
impl SegmentTable {
    /// Translates a logical byte offset into `(element_index, intra_element
    /// offset)` for elements of `element_size` bytes.
    ///
    /// The offset must fall inside a segment: an empty table, an unset
    /// placeholder reached by the walk, and an offset past the end of the
    /// data are all errors, never clamped.
    pub fn element_index_at_offset(&self, element_size: u64, offset: u64) -> Result<(u64, u64)> {
        if element_size == 0 {
            return Err(Error::ZeroElementSize);
        }
        if self.is_empty() {
            return Err(Error::NoSegments);
        }

        let mut cursor = 0u64;
        let mut covered = false;
        for (index, entry) in self.entries().iter().enumerate() {
            let segment = entry.ok_or(Error::MissingSegment { index })?;
            if offset < cursor + segment.size() {
                covered = true;
                break;
            }
            cursor += segment.size();
        }
        if !covered {
            return Err(Error::OffsetOutOfBounds {
                offset,
                data_size: self.data_size(),
            });
        }

        Ok((offset / element_size, offset % element_size))
    }

    /// Resolves the physical location of element `index` for elements of
    /// `element_size` bytes.
    ///
    /// The element's logical byte offset is `index * element_size`; the walk
    /// consumes segment sizes until the containing segment is found and the
    /// remainder lands inside it.
    pub fn locate_element(&self, element_size: u64, index: u64) -> Result<Location> {
        if element_size == 0 {
            return Err(Error::ZeroElementSize);
        }

        let logical = index
            .checked_mul(element_size)
            .ok_or(Error::SizeOverflow)?;
        if logical >= self.data_size() {
            return Err(Error::ElementOutOfBounds {
                index,
                data_size: self.data_size(),
            });
        }

        let mut remaining = logical;
        for (segment_index, entry) in self.entries().iter().enumerate() {
            let segment = entry.ok_or(Error::MissingSegment {
                index: segment_index,
            })?;
            if remaining < segment.size() {
                return Ok(Location {
                    source: segment.source(),
                    offset: segment.offset() + remaining,
                    flags: segment.flags(),
                });
            }
            remaining -= segment.size();
        }

        // data_size is the sum of present segment sizes, so a bounds-checked
        // offset always lands inside one of them.
        Err(Error::OffsetOutOfBounds {
            offset: logical,
            data_size: self.data_size(),
        })
    }
}
