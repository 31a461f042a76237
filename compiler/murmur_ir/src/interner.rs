//! String interner backing [`Name`] handles.
//!
//! Interned strings are leaked to obtain `'static` lifetimes, so lookups
//! can hand out references without lifetime entanglement with the lock.

use crate::Name;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

struct Inner {
    /// Map from string content to interner index.
    map: FxHashMap<&'static str, u32>,
    /// Storage for string contents, indexed by `Name::raw()`.
    strings: Vec<&'static str>,
}

/// String interner with interior mutability.
///
/// Provides O(1) interning and lookup behind a single `RwLock`; message
/// names, symbols and file names all share one interner, so symbol
/// identity falls out of `Name` equality.
pub struct StringInterner {
    inner: RwLock<Inner>,
}

impl StringInterner {
    /// Create a new interner with the empty string and the structural
    /// names every chain uses pre-interned.
    pub fn new() -> Self {
        let mut inner = Inner {
            map: FxHashMap::default(),
            strings: Vec::with_capacity(64),
        };
        for s in PRE_INTERNED {
            let leaked: &'static str = s;
            // Indices are tiny here; the push order defines the raw value.
            #[expect(
                clippy::cast_possible_truncation,
                reason = "pre-interned table is far below u32::MAX entries"
            )]
            let idx = inner.strings.len() as u32;
            inner.map.insert(leaked, idx);
            inner.strings.push(leaked);
        }
        StringInterner {
            inner: RwLock::new(inner),
        }
    }

    /// Intern a string, returning its Name.
    pub fn intern(&self, s: &str) -> Name {
        // Fast path: already interned.
        {
            let guard = self.inner.read();
            if let Some(&idx) = guard.map.get(s) {
                return Name::from_raw(idx);
            }
        }

        let mut guard = self.inner.write();
        // Double-check after acquiring the write lock.
        if let Some(&idx) = guard.map.get(s) {
            return Name::from_raw(idx);
        }

        let leaked: &'static str = Box::leak(s.to_owned().into_boxed_str());
        #[expect(
            clippy::cast_possible_truncation,
            reason = "over 4 billion distinct names is out of scope"
        )]
        let idx = guard.strings.len() as u32;
        guard.strings.push(leaked);
        guard.map.insert(leaked, idx);
        Name::from_raw(idx)
    }

    /// Look up the text for a Name.
    ///
    /// The returned reference is `'static` because interned strings are
    /// never deallocated.
    pub fn lookup(&self, name: Name) -> &'static str {
        let guard = self.inner.read();
        guard.strings[name.index()]
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.inner.read().strings.len()
    }

    /// Check whether only the pre-interned strings are present.
    pub fn is_empty(&self) -> bool {
        self.len() <= PRE_INTERNED.len()
    }
}

impl Default for StringInterner {
    fn default() -> Self {
        Self::new()
    }
}

/// Names every chain ends up using; interning them eagerly keeps their
/// raw indices stable (the empty string must be index 0 for `Name::EMPTY`).
const PRE_INTERNED: &[&str] = &[
    "",
    ".",
    "=",
    "cachedResult",
    "internal:createText",
    "internal:concatenateText",
    "internal:createNumber",
    "internal:createDecimal",
    "internal:createRegexp",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intern_and_lookup() {
        let interner = StringInterner::new();

        let hello = interner.intern("hello");
        let world = interner.intern("world");
        let hello2 = interner.intern("hello");

        assert_eq!(hello, hello2);
        assert_ne!(hello, world);
        assert_eq!(interner.lookup(hello), "hello");
        assert_eq!(interner.lookup(world), "world");
    }

    #[test]
    fn empty_string_is_name_empty() {
        let interner = StringInterner::new();
        assert_eq!(interner.intern(""), Name::EMPTY);
        assert_eq!(interner.lookup(Name::EMPTY), "");
    }

    #[test]
    fn structural_names_pre_interned() {
        let interner = StringInterner::new();
        assert!(interner.is_empty());
        let dot = interner.intern(".");
        assert_eq!(interner.lookup(dot), ".");
        assert!(interner.is_empty());
    }
}
