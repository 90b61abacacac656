use std::ops::BitOr;

/// Whether a vector owns its data handle.
///
/// An owned handle is released through the free-handle callback exactly once
/// at teardown; a borrowed handle is left to the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HandleOwnership {
    Owned,
    #[default]
    Borrowed,
}

/// Read-behavior modifiers forwarded to the read callback.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadFlags(u8);

impl ReadFlags {
    pub const NONE: Self = Self(0);
    /// Skip the cache lookup and always invoke the read callback. The result
    /// is still installed in the cache for future lookups.
    pub const IGNORE_CACHE: Self = Self(1);

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline(always)]
    pub(crate) const fn ignore_cache(self) -> bool {
        self.contains(Self::IGNORE_CACHE)
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for ReadFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

/// Write-behavior modifiers forwarded to the write callback. Carried through
/// uninterpreted by the core.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteFlags(u8);

impl WriteFlags {
    pub const NONE: Self = Self(0);

    pub const fn new(bits: u8) -> Self {
        Self(bits)
    }

    #[inline(always)]
    pub const fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for WriteFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}
