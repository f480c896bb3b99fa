//! Cache & cycle registry for descriptor construction.
//!
//! A process-wide memo table keyed by instantiation identity
//! ([`crate::types::TypeRefId`]): each identity is built at most once for
//! the lifetime of the registry, and while a build is running the
//! identity is marked **in progress** so that a structural or mutual
//! cycle is detected by the builder (which then emits a back-reference
//! placeholder) instead of re-entering the build.
//!
//! This is a compile-time memo table, not a request-serving cache: it
//! never evicts, so there is no staleness or invalidation concern within
//! a compilation run.

use crate::types::{TypeId, TypeRefId};
use dashmap::DashMap;
use tracing::trace;

/// Identity-keyed descriptor cache with in-progress cycle markers.
pub struct DescriptorRegistry {
    /// Finished descriptors by identity
    resolved: DashMap<TypeRefId, TypeId>,

    /// Identities currently being built
    in_progress: DashMap<TypeRefId, ()>,

    /// Completed builds per identity; at most 1 after any number of
    /// requests for the same identity
    build_counts: DashMap<TypeRefId, u32>,
}

impl Default for DescriptorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl DescriptorRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            resolved: DashMap::new(),
            in_progress: DashMap::new(),
            build_counts: DashMap::new(),
        }
    }

    /// The finished descriptor for an identity, if one was registered.
    pub fn resolved(&self, key: TypeRefId) -> Option<TypeId> {
        self.resolved.get(&key).map(|r| *r)
    }

    /// Whether the identity is currently being built. The builder uses
    /// this to detect cycles without re-entering the build.
    pub fn is_in_progress(&self, key: TypeRefId) -> bool {
        self.in_progress.contains_key(&key)
    }

    /// How many times the identity was actually built (0 or 1 unless the
    /// builder is broken). Exposed for the idempotence property.
    pub fn build_count(&self, key: TypeRefId) -> u32 {
        self.build_counts.get(&key).map_or(0, |c| *c)
    }

    /// Return the cached descriptor for `key`, or mark `key` in progress,
    /// run `build`, register the result, and clear the marker.
    ///
    /// A failed build registers nothing; the identity becomes buildable
    /// again (the error is deterministic, so retrying reproduces it).
    ///
    /// Callers must check [`is_in_progress`](Self::is_in_progress) before
    /// calling and emit a back-reference instead; re-entering an
    /// in-progress identity here is the one path that could loop forever,
    /// so it is a debug assertion.
    pub fn get_or_build<E>(
        &self,
        key: TypeRefId,
        build: impl FnOnce() -> Result<TypeId, E>,
    ) -> Result<TypeId, E> {
        if let Some(existing) = self.resolved(key) {
            trace!(key = key.0, ty = existing.0, "DescriptorRegistry cache hit");
            return Ok(existing);
        }
        debug_assert!(
            !self.is_in_progress(key),
            "identity {} re-entered the registry while in progress; \
             the builder must emit a back-reference instead",
            key.0
        );

        self.in_progress.insert(key, ());
        let result = build();
        self.in_progress.remove(&key);

        match result {
            Ok(ty) => {
                self.resolved.insert(key, ty);
                *self.build_counts.entry(key).or_insert(0) += 1;
                trace!(key = key.0, ty = ty.0, "DescriptorRegistry registered");
                Ok(ty)
            }
            Err(err) => Err(err),
        }
    }

    /// Number of finished identities.
    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/registry_tests.rs"]
mod tests;
