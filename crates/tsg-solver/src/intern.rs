//! Descriptor interning.
//!
//! [`TypeInterner`] hash-conses every descriptor: equal structure gets an
//! equal [`TypeId`], so identity comparison is O(1) and the cache & cycle
//! registry can key on ids alone. Union and intersection construction
//! also normalizes here, so no other module ever sees a denormalized
//! branch list.
//!
//! All `TypeKey` construction is quarantined to this module; the rest of
//! the crate goes through the constructor methods.

use crate::def::DefId;
use crate::types::{
    IntrinsicKind, LiteralValue, ObjectShape, ObjectShapeId, OrderedFloat, PropertyInfo, TypeArgs,
    TypeId, TypeKey, TypeListId, TypeRef, TypeRefId,
};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use rustc_hash::FxHashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use tsg_common::{Atom, Interner};

/// Interning table for descriptors and their side data (branch lists,
/// object shapes, instantiation identities, member-name strings).
///
/// Append-only: descriptors are immutable once interned and live for the
/// lifetime of the interner.
pub struct TypeInterner {
    /// Member names, parameter names, literal strings
    strings: Interner,

    /// `TypeKey` -> `TypeId` deduplication
    type_map: DashMap<TypeKey, TypeId>,
    /// `TypeId` -> `TypeKey` storage
    types: DashMap<u32, TypeKey>,
    next_type: AtomicU32,

    /// Branch/element list deduplication and storage
    list_map: DashMap<Arc<[TypeId]>, TypeListId>,
    lists: DashMap<u32, Arc<[TypeId]>>,
    next_list: AtomicU32,

    /// Object shape deduplication and storage
    shape_map: DashMap<Arc<ObjectShape>, ObjectShapeId>,
    shapes: DashMap<u32, Arc<ObjectShape>>,
    next_shape: AtomicU32,

    /// Instantiation identity deduplication and storage
    ref_map: DashMap<Arc<TypeRef>, TypeRefId>,
    refs: DashMap<u32, Arc<TypeRef>>,
    next_ref: AtomicU32,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    /// Create an interner with the intrinsic descriptors pre-registered at
    /// their fixed ids.
    pub fn new() -> Self {
        let interner = Self {
            strings: Interner::new(),
            type_map: DashMap::new(),
            types: DashMap::new(),
            next_type: AtomicU32::new(TypeId::FIRST_DYNAMIC),
            list_map: DashMap::new(),
            lists: DashMap::new(),
            next_list: AtomicU32::new(0),
            shape_map: DashMap::new(),
            shapes: DashMap::new(),
            next_shape: AtomicU32::new(0),
            ref_map: DashMap::new(),
            refs: DashMap::new(),
            next_ref: AtomicU32::new(0),
        };
        for kind in IntrinsicKind::ALL {
            let id = kind.type_id();
            interner.types.insert(id.0, TypeKey::Intrinsic(kind));
            interner.type_map.insert(TypeKey::Intrinsic(kind), id);
        }
        interner.types.insert(TypeId::FUNCTION.0, TypeKey::Function);
        interner.type_map.insert(TypeKey::Function, TypeId::FUNCTION);
        interner
    }

    // -------------------------------------------------------------------------
    // Strings
    // -------------------------------------------------------------------------

    /// Intern a string (member name, parameter name, literal value).
    pub fn intern_string(&self, text: &str) -> Atom {
        self.strings.intern(text)
    }

    /// Resolve an interned string.
    pub fn resolve_atom(&self, atom: Atom) -> Arc<str> {
        self.strings.resolve(atom)
    }

    // -------------------------------------------------------------------------
    // Core interning
    // -------------------------------------------------------------------------

    /// Intern a structural key, returning its canonical `TypeId`.
    pub fn intern(&self, key: TypeKey) -> TypeId {
        if let Some(existing) = self.type_map.get(&key) {
            return *existing;
        }
        match self.type_map.entry(key) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = TypeId(self.next_type.fetch_add(1, Ordering::SeqCst));
                self.types.insert(id.0, key);
                entry.insert(id);
                id
            }
        }
    }

    /// Look up the structural key for an id. `None` only for ids not
    /// produced by this interner.
    pub fn lookup(&self, id: TypeId) -> Option<TypeKey> {
        self.types.get(&id.0).map(|entry| *entry.value())
    }

    /// Number of interned descriptors (intrinsics included).
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    // -------------------------------------------------------------------------
    // Side tables
    // -------------------------------------------------------------------------

    fn intern_list(&self, ids: Vec<TypeId>) -> TypeListId {
        let key: Arc<[TypeId]> = Arc::from(ids);
        if let Some(existing) = self.list_map.get(&key) {
            return *existing;
        }
        match self.list_map.entry(key.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = TypeListId(self.next_list.fetch_add(1, Ordering::SeqCst));
                self.lists.insert(id.0, key);
                entry.insert(id);
                id
            }
        }
    }

    /// The descriptor ids behind a list id.
    pub fn type_list(&self, id: TypeListId) -> Arc<[TypeId]> {
        self.lists
            .get(&id.0)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| panic!("type list {} was not interned here", id.0))
    }

    fn intern_shape(&self, shape: ObjectShape) -> ObjectShapeId {
        let key = Arc::new(shape);
        if let Some(existing) = self.shape_map.get(&key) {
            return *existing;
        }
        match self.shape_map.entry(key.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = ObjectShapeId(self.next_shape.fetch_add(1, Ordering::SeqCst));
                self.shapes.insert(id.0, key);
                entry.insert(id);
                id
            }
        }
    }

    /// The member set behind a shape id.
    pub fn object_shape(&self, id: ObjectShapeId) -> Arc<ObjectShape> {
        self.shapes
            .get(&id.0)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| panic!("object shape {} was not interned here", id.0))
    }

    /// Intern an instantiation identity (declaration site + resolved
    /// arguments). Equal `(def, args)` pairs share one id; this is the
    /// key the registry and back-references use.
    pub fn type_ref(&self, def: DefId, args: &[TypeId]) -> TypeRefId {
        let key = Arc::new(TypeRef {
            def,
            args: TypeArgs::from_slice(args),
        });
        if let Some(existing) = self.ref_map.get(&key) {
            return *existing;
        }
        match self.ref_map.entry(key.clone()) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                let id = TypeRefId(self.next_ref.fetch_add(1, Ordering::SeqCst));
                self.refs.insert(id.0, key);
                entry.insert(id);
                id
            }
        }
    }

    /// The `(def, args)` pair behind an instantiation identity.
    pub fn type_ref_data(&self, id: TypeRefId) -> Arc<TypeRef> {
        self.refs
            .get(&id.0)
            .map(|entry| Arc::clone(entry.value()))
            .unwrap_or_else(|| panic!("type ref {} was not interned here", id.0))
    }

    // -------------------------------------------------------------------------
    // Descriptor constructors
    // -------------------------------------------------------------------------

    /// String literal descriptor.
    pub fn literal_string(&self, value: &str) -> TypeId {
        let atom = self.intern_string(value);
        self.intern(TypeKey::Literal(LiteralValue::String(atom)))
    }

    /// Number literal descriptor.
    pub fn literal_number(&self, value: f64) -> TypeId {
        self.intern(TypeKey::Literal(LiteralValue::Number(OrderedFloat(value))))
    }

    /// Boolean literal descriptor.
    pub fn literal_boolean(&self, value: bool) -> TypeId {
        self.intern(TypeKey::Literal(LiteralValue::Boolean(value)))
    }

    /// Bigint literal descriptor (decimal digits).
    pub fn literal_bigint(&self, digits: &str) -> TypeId {
        let atom = self.intern_string(digits);
        self.intern(TypeKey::Literal(LiteralValue::BigInt(atom)))
    }

    /// Homogeneous array descriptor.
    pub fn array(&self, element: TypeId) -> TypeId {
        self.intern(TypeKey::Array(element))
    }

    /// Fixed-length tuple descriptor.
    pub fn tuple(&self, elements: Vec<TypeId>) -> TypeId {
        let list = self.intern_list(elements);
        self.intern(TypeKey::Tuple(list))
    }

    /// Object-shape descriptor.
    ///
    /// Properties are sorted by name so declaration order never affects
    /// identity; a duplicated name keeps its first declaration.
    pub fn object(&self, mut properties: Vec<PropertyInfo>) -> TypeId {
        properties.sort_by_key(|p| p.name);
        properties.dedup_by_key(|p| p.name);
        let shape = self.intern_shape(ObjectShape { properties });
        self.intern(TypeKey::Object(shape))
    }

    /// The callable-shape descriptor. All function shapes are one
    /// descriptor: callability is the entire contract.
    pub fn function(&self) -> TypeId {
        TypeId::FUNCTION
    }

    /// Open generic parameter (construction-time only).
    pub fn param(&self, name: Atom) -> TypeId {
        self.intern(TypeKey::Param(name))
    }

    /// Back-reference placeholder for an in-progress identity.
    pub fn backref(&self, target: TypeRefId) -> TypeId {
        self.intern(TypeKey::Ref(target))
    }

    /// Union descriptor ("satisfies at least one branch").
    ///
    /// Normalization: nested unions are flattened, duplicate branches keep
    /// their first occurrence, `never` branches are dropped, an
    /// `any`/`unknown` branch absorbs the union, the empty union is
    /// `never`, and a single branch collapses to itself. Branch order is
    /// otherwise preserved: the synthesized check tries branches in
    /// declaration order.
    pub fn union(&self, branches: Vec<TypeId>) -> TypeId {
        let mut flat = Vec::with_capacity(branches.len());
        for branch in branches {
            match self.lookup(branch) {
                Some(TypeKey::Union(list)) => flat.extend(self.type_list(list).iter().copied()),
                _ => flat.push(branch),
            }
        }
        if flat.contains(&TypeId::ANY) {
            return TypeId::ANY;
        }
        if flat.contains(&TypeId::UNKNOWN) {
            return TypeId::UNKNOWN;
        }
        let mut seen = FxHashSet::default();
        flat.retain(|id| *id != TypeId::NEVER && seen.insert(*id));
        match flat.len() {
            0 => TypeId::NEVER,
            1 => flat[0],
            _ => {
                let list = self.intern_list(flat);
                self.intern(TypeKey::Union(list))
            }
        }
    }

    /// Intersection descriptor ("satisfies all branches").
    ///
    /// Normalization: nested intersections are flattened, duplicates keep
    /// their first occurrence, `any`/`unknown` branches are dropped (they
    /// constrain nothing), a `never` branch absorbs the intersection, the
    /// empty intersection is `unknown`, and a single branch collapses.
    pub fn intersection(&self, branches: Vec<TypeId>) -> TypeId {
        let mut flat = Vec::with_capacity(branches.len());
        for branch in branches {
            match self.lookup(branch) {
                Some(TypeKey::Intersection(list)) => {
                    flat.extend(self.type_list(list).iter().copied());
                }
                _ => flat.push(branch),
            }
        }
        if flat.contains(&TypeId::NEVER) {
            return TypeId::NEVER;
        }
        let mut seen = FxHashSet::default();
        flat.retain(|id| {
            *id != TypeId::ANY && *id != TypeId::UNKNOWN && seen.insert(*id)
        });
        match flat.len() {
            0 => TypeId::UNKNOWN,
            1 => flat[0],
            _ => {
                let list = self.intern_list(flat);
                self.intern(TypeKey::Intersection(list))
            }
        }
    }

    // -------------------------------------------------------------------------
    // Descriptor queries
    // -------------------------------------------------------------------------

    /// Walk a finished descriptor and report whether any open generic
    /// parameter survived construction. Back-references are not followed:
    /// their targets are checked when their own identity is registered.
    pub fn contains_param(&self, root: TypeId) -> bool {
        let mut visited = FxHashSet::default();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            match self.lookup(id) {
                Some(TypeKey::Param(_)) => return true,
                Some(TypeKey::Array(element)) => stack.push(element),
                Some(
                    TypeKey::Tuple(list) | TypeKey::Union(list) | TypeKey::Intersection(list),
                ) => stack.extend(self.type_list(list).iter().copied()),
                Some(TypeKey::Object(shape)) => {
                    stack.extend(self.object_shape(shape).properties.iter().map(|p| p.type_id));
                }
                _ => {}
            }
        }
        false
    }
}

#[cfg(test)]
#[path = "../tests/intern_tests.rs"]
mod tests;
