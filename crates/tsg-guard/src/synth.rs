//! Predicate synthesis.
//!
//! [`GuardSynthesizer`] walks an interned descriptor and composes a
//! [`Guard`], a pure `(value) -> bool` closure, per the descriptor's
//! kind. Synthesized guards are memoized in a [`GuardCache`] keyed by
//! descriptor id, so a given type compiles once per process.
//!
//! Back-reference placeholders synthesize to *deferred* guards: at call
//! time they resolve the identity through the descriptor registry and
//! invoke the (by-then-registered) target guard. That deferral is what
//! lets cyclic shapes terminate: the recursion happens over the value,
//! which is finite, not over the type graph.

use crate::value::Value;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use tracing::trace;
use tsg_solver::{
    DescriptorRegistry, IntrinsicKind, LiteralValue, TypeId, TypeInterner, TypeKey, TypeRefId,
};

/// An executable structural check. Pure; no observable side effects.
pub type Guard = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

// =============================================================================
// GuardCache
// =============================================================================

/// Process-wide memo table for synthesized guards, keyed by descriptor
/// id. Never evicts; the build counter exists so idempotence is
/// observable from tests.
pub struct GuardCache {
    guards: DashMap<TypeId, Guard>,
    build_counts: DashMap<TypeId, u32>,
}

impl Default for GuardCache {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            guards: DashMap::new(),
            build_counts: DashMap::new(),
        }
    }

    /// The cached guard for a descriptor, if one was synthesized.
    pub fn get(&self, ty: TypeId) -> Option<Guard> {
        self.guards.get(&ty).map(|entry| entry.clone())
    }

    /// How many times the descriptor's guard was actually synthesized
    /// (0 or 1 after any number of requests).
    pub fn build_count(&self, ty: TypeId) -> u32 {
        self.build_counts.get(&ty).map_or(0, |count| *count)
    }

    /// Number of cached guards.
    pub fn len(&self) -> usize {
        self.guards.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// Store `guard` unless a racing synthesis got there first; either
    /// way, return the canonical guard for `ty`.
    fn insert_first(&self, ty: TypeId, guard: Guard) -> Guard {
        match self.guards.entry(ty) {
            Entry::Occupied(entry) => entry.get().clone(),
            Entry::Vacant(entry) => {
                *self.build_counts.entry(ty).or_insert(0) += 1;
                entry.insert(guard).clone()
            }
        }
    }
}

// =============================================================================
// GuardSynthesizer
// =============================================================================

/// Composes guards from descriptors, consulting the cache throughout.
pub struct GuardSynthesizer {
    interner: Arc<TypeInterner>,
    registry: Arc<DescriptorRegistry>,
    cache: Arc<GuardCache>,
}

impl GuardSynthesizer {
    pub fn new(
        interner: Arc<TypeInterner>,
        registry: Arc<DescriptorRegistry>,
        cache: Arc<GuardCache>,
    ) -> Self {
        Self {
            interner,
            registry,
            cache,
        }
    }

    /// The guard for a descriptor. Memoized per descriptor id.
    pub fn synthesize(&self, ty: TypeId) -> Guard {
        if let Some(existing) = self.cache.get(ty) {
            return existing;
        }
        let guard = self.synthesize_uncached(ty);
        trace!(ty = ty.0, "guard synthesized");
        self.cache.insert_first(ty, guard)
    }

    fn synthesize_uncached(&self, ty: TypeId) -> Guard {
        let Some(key) = self.interner.lookup(ty) else {
            // Not a descriptor of this compiler. Generated checks never
            // raise, so the permissive fallback applies.
            return Arc::new(|_| true);
        };
        match key {
            TypeKey::Intrinsic(kind) => intrinsic_guard(kind),

            TypeKey::Literal(literal) => self.literal_guard(literal),

            TypeKey::Array(element) => {
                let element = self.synthesize(element);
                // The empty array trivially passes
                Arc::new(move |value| match value {
                    Value::Array(items) => items.iter().all(|item| element(item)),
                    _ => false,
                })
            }

            TypeKey::Tuple(list) => {
                let elements: Vec<Guard> = self
                    .interner
                    .type_list(list)
                    .iter()
                    .map(|element| self.synthesize(*element))
                    .collect();
                Arc::new(move |value| match value {
                    Value::Array(items) => {
                        items.len() == elements.len()
                            && items.iter().zip(&elements).all(|(item, guard)| guard(item))
                    }
                    _ => false,
                })
            }

            TypeKey::Object(shape_id) => {
                let shape = self.interner.object_shape(shape_id);
                let members: Vec<(Arc<str>, Guard, bool)> = shape
                    .properties
                    .iter()
                    .map(|property| {
                        (
                            self.interner.resolve_atom(property.name),
                            self.synthesize(property.type_id),
                            property.optional,
                        )
                    })
                    .collect();
                Arc::new(move |value| {
                    if !value.is_reference() {
                        return false;
                    }
                    members.iter().all(|(name, guard, optional)| {
                        match value.member(name) {
                            None => *optional,
                            // An explicitly undefined slot satisfies an
                            // optional member
                            Some(Value::Undefined) if *optional => true,
                            Some(member) => guard(member),
                        }
                    })
                })
            }

            TypeKey::Function => Arc::new(|value| value.is_callable()),

            TypeKey::Union(list) => {
                let branches: Vec<Guard> = self
                    .interner
                    .type_list(list)
                    .iter()
                    .map(|branch| self.synthesize(*branch))
                    .collect();
                // First match wins, declaration order
                Arc::new(move |value| branches.iter().any(|branch| branch(value)))
            }

            TypeKey::Intersection(list) => {
                let branches: Vec<Guard> = self
                    .interner
                    .type_list(list)
                    .iter()
                    .map(|branch| self.synthesize(*branch))
                    .collect();
                Arc::new(move |value| branches.iter().all(|branch| branch(value)))
            }

            TypeKey::Param(_) => {
                // Finished descriptors never contain open parameters; the
                // builder errors before registering one.
                debug_assert!(false, "open type parameter reached synthesis");
                Arc::new(|_| true)
            }

            TypeKey::Ref(target) => self.deferred_guard(target),
        }
    }

    fn literal_guard(&self, literal: LiteralValue) -> Guard {
        match literal {
            LiteralValue::String(atom) => {
                let expected = self.interner.resolve_atom(atom);
                Arc::new(move |value| {
                    matches!(value, Value::String(actual) if actual.as_str() == &*expected)
                })
            }
            LiteralValue::Number(expected) => {
                let expected = expected.0;
                // IEEE equality: a NaN literal matches nothing, which is
                // strict-equality semantics
                Arc::new(move |value| matches!(value, Value::Number(actual) if *actual == expected))
            }
            LiteralValue::Boolean(expected) => {
                Arc::new(move |value| matches!(value, Value::Boolean(actual) if *actual == expected))
            }
            LiteralValue::BigInt(atom) => {
                let expected: Option<i128> = self.interner.resolve_atom(atom).parse().ok();
                Arc::new(move |value| {
                    matches!(value, Value::BigInt(actual) if Some(*actual) == expected)
                })
            }
        }
    }

    /// Guard for a back-reference: resolve the identity through the
    /// registry at call time and invoke the target's guard. By the time
    /// any caller can invoke this closure, the enclosing compilation has
    /// registered the target, so the lookup hits; an identity that is
    /// somehow still unresolved degrades to pass.
    fn deferred_guard(&self, target: TypeRefId) -> Guard {
        let interner = Arc::clone(&self.interner);
        let registry = Arc::clone(&self.registry);
        let cache = Arc::clone(&self.cache);
        Arc::new(move |value| match registry.resolved(target) {
            Some(ty) => {
                let synthesizer = GuardSynthesizer::new(
                    Arc::clone(&interner),
                    Arc::clone(&registry),
                    Arc::clone(&cache),
                );
                (synthesizer.synthesize(ty))(value)
            }
            None => true,
        })
    }
}

fn intrinsic_guard(kind: IntrinsicKind) -> Guard {
    match kind {
        IntrinsicKind::Any | IntrinsicKind::Unknown => Arc::new(|_| true),
        IntrinsicKind::Never => Arc::new(|_| false),
        IntrinsicKind::Undefined => Arc::new(|value| matches!(value, Value::Undefined)),
        IntrinsicKind::Null => Arc::new(|value| matches!(value, Value::Null)),
        IntrinsicKind::Boolean => Arc::new(|value| matches!(value, Value::Boolean(_))),
        // Tag test: NaN is a number
        IntrinsicKind::Number => Arc::new(|value| matches!(value, Value::Number(_))),
        IntrinsicKind::String => Arc::new(|value| matches!(value, Value::String(_))),
        IntrinsicKind::BigInt => Arc::new(|value| matches!(value, Value::BigInt(_))),
        IntrinsicKind::Symbol => Arc::new(|value| matches!(value, Value::Symbol(_))),
    }
}
