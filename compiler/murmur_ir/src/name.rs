//! Interned string identifier.

use std::fmt;

/// Interned string identifier.
///
/// A `Name` is a 32-bit index into the [`StringInterner`](crate::StringInterner).
/// Equality is an O(1) integer compare; two `Name`s are equal iff their
/// interned text is equal.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Name(u32);

impl Name {
    /// Pre-interned empty string ("anonymous" message nodes).
    pub const EMPTY: Name = Name(0);

    /// Create from a raw interner index.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Name(raw)
    }

    /// Get the raw interner index.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Index into the interner's storage.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl Default for Name {
    fn default() -> Self {
        Self::EMPTY
    }
}
