//! String interning for identifier deduplication.
//!
//! Member names, generic parameter names, and literal string values are
//! interned once and referred to by `Atom` afterwards, so descriptor
//! identity comparisons never touch string data.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

/// Interned string handle.
///
/// Two `Atom`s compare equal iff they were interned from equal strings in
/// the same [`Interner`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(pub u32);

/// Thread-safe append-only string interner.
///
/// Interned strings live for the lifetime of the interner; there is no
/// eviction.
pub struct Interner {
    /// String -> `Atom` mapping for deduplication
    atoms: DashMap<Arc<str>, Atom>,

    /// `Atom` -> string mapping for resolution
    strings: DashMap<u32, Arc<str>>,

    /// Next available atom id
    next_id: AtomicU32,
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}

impl Interner {
    /// Create an empty interner.
    pub fn new() -> Self {
        Self {
            atoms: DashMap::new(),
            strings: DashMap::new(),
            next_id: AtomicU32::new(0),
        }
    }

    /// Intern a string, returning its `Atom`.
    ///
    /// Repeated calls with equal strings return the same `Atom`.
    pub fn intern(&self, text: &str) -> Atom {
        if let Some(existing) = self.atoms.get(text) {
            return *existing;
        }
        let key: Arc<str> = Arc::from(text);
        // The entry holds the shard lock, so a racing intern of the same
        // string cannot allocate a second id.
        match self.atoms.entry(key.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let atom = Atom(self.next_id.fetch_add(1, Ordering::SeqCst));
                self.strings.insert(atom.0, key);
                entry.insert(atom);
                atom
            }
        }
    }

    /// Resolve an `Atom` back to its string.
    ///
    /// # Panics
    ///
    /// Panics if the atom was not produced by this interner.
    pub fn resolve(&self, atom: Atom) -> Arc<str> {
        self.strings
            .get(&atom.0)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| panic!("atom {} was not interned by this interner", atom.0))
    }

    /// Number of interned strings.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let interner = Interner::new();
        let a = interner.intern("property");
        let b = interner.intern("property");
        let c = interner.intern("method");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(interner.len(), 2);
    }

    #[test]
    fn test_resolve_round_trip() {
        let interner = Interner::new();
        let atom = interner.intern("value");
        assert_eq!(&*interner.resolve(atom), "value");
    }

    #[test]
    fn test_empty_string_interns() {
        let interner = Interner::new();
        let atom = interner.intern("");
        assert_eq!(&*interner.resolve(atom), "");
        assert_eq!(atom, interner.intern(""));
    }
}
