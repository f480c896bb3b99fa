//! Core descriptor types.
//!
//! A **type descriptor** is the canonical representation of "what a type
//! requires structurally". Descriptors are interned: the [`TypeId`] handle
//! is the descriptor's identity, and two descriptors with the same id are
//! the same entity, not merely equal. Construction goes through
//! [`crate::intern::TypeInterner`]; nothing outside the interner creates a
//! `TypeId`.

use crate::def::DefId;
use smallvec::SmallVec;
use tsg_common::Atom;
use tsg_common::limits::TYPE_ARGS_INLINE;

// =============================================================================
// TypeId - Interned Descriptor Identity
// =============================================================================

/// Interned descriptor handle.
///
/// Equality on `TypeId` is descriptor identity. The intrinsic descriptors
/// below are pre-registered at fixed ids by the interner so they can be
/// compared and produced without a lookup.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

impl TypeId {
    /// Always passes.
    pub const ANY: Self = Self(0);
    /// Always passes (the permissive fallback for unsupported shapes).
    pub const UNKNOWN: Self = Self(1);
    /// Always fails.
    pub const NEVER: Self = Self(2);
    /// The `undefined` runtime tag.
    pub const UNDEFINED: Self = Self(3);
    /// The `null` runtime tag.
    pub const NULL: Self = Self(4);
    /// The `boolean` runtime tag.
    pub const BOOLEAN: Self = Self(5);
    /// The `number` runtime tag (`NaN` included).
    pub const NUMBER: Self = Self(6);
    /// The `string` runtime tag.
    pub const STRING: Self = Self(7);
    /// The `bigint` runtime tag.
    pub const BIGINT: Self = Self(8);
    /// The `symbol` runtime tag.
    pub const SYMBOL: Self = Self(9);
    /// The arity-blind callable shape. Every function-shape descriptor is
    /// this one id: callability is the whole contract, so there is nothing
    /// to distinguish one function-shape from another.
    pub const FUNCTION: Self = Self(10);

    /// First id handed out for structural (non-intrinsic) descriptors.
    pub(crate) const FIRST_DYNAMIC: u32 = 11;

    /// Check whether this id is one of the pre-registered intrinsics.
    pub const fn is_intrinsic(self) -> bool {
        self.0 < Self::FIRST_DYNAMIC
    }
}

// =============================================================================
// IntrinsicKind
// =============================================================================

/// Non-structural descriptor kinds with fixed semantics.
///
/// | kind | check |
/// |------|-------|
/// | `Any`, `Unknown` | always true |
/// | `Never` | always false |
/// | everything else | runtime tag test |
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    BigInt,
    Symbol,
}

impl IntrinsicKind {
    /// All intrinsic kinds, in pre-registration order.
    pub const ALL: [Self; 10] = [
        Self::Any,
        Self::Unknown,
        Self::Never,
        Self::Undefined,
        Self::Null,
        Self::Boolean,
        Self::Number,
        Self::String,
        Self::BigInt,
        Self::Symbol,
    ];

    /// The fixed `TypeId` this intrinsic is registered at.
    pub const fn type_id(self) -> TypeId {
        match self {
            Self::Any => TypeId::ANY,
            Self::Unknown => TypeId::UNKNOWN,
            Self::Never => TypeId::NEVER,
            Self::Undefined => TypeId::UNDEFINED,
            Self::Null => TypeId::NULL,
            Self::Boolean => TypeId::BOOLEAN,
            Self::Number => TypeId::NUMBER,
            Self::String => TypeId::STRING,
            Self::BigInt => TypeId::BIGINT,
            Self::Symbol => TypeId::SYMBOL,
        }
    }
}

// =============================================================================
// Literal Values
// =============================================================================

/// `f64` wrapper with bit-pattern equality and hashing so number literals
/// can key the interner. Under bit equality `NaN == NaN`, which is what
/// interning wants; the synthesized literal check uses IEEE equality and
/// therefore never matches `NaN`, which is what strict equality wants.
#[derive(Copy, Clone, Debug)]
pub struct OrderedFloat(pub f64);

impl PartialEq for OrderedFloat {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for OrderedFloat {}

impl std::hash::Hash for OrderedFloat {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// A literal descriptor's value. Checked with strict equality.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LiteralValue {
    String(Atom),
    Number(OrderedFloat),
    Boolean(bool),
    /// Decimal digits, interned. Kept textual because the source of truth
    /// is arbitrary-precision.
    BigInt(Atom),
}

// =============================================================================
// Side-Table Ids
// =============================================================================

/// Interned list of descriptor ids (union/intersection branches, tuple
/// elements). Lists are deduplicated; equal contents share one id.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

/// Interned object shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectShapeId(pub u32);

/// Interned instantiation identity: declaration site plus resolved generic
/// arguments. This is the key the cache & cycle registry is indexed by,
/// and the payload of a back-reference placeholder.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRefId(pub u32);

// =============================================================================
// Object Shapes
// =============================================================================

/// One named member of an object shape.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyInfo {
    pub name: Atom,
    /// Descriptor the member's value must satisfy. For a method member
    /// this is always [`TypeId::FUNCTION`]: return values are not invoked
    /// during checking and asynchronous results are never resolved, so
    /// callability is the entire runtime contract.
    pub type_id: TypeId,
    pub optional: bool,
    pub is_method: bool,
}

impl PropertyInfo {
    /// Required property member.
    pub const fn new(name: Atom, type_id: TypeId) -> Self {
        Self {
            name,
            type_id,
            optional: false,
            is_method: false,
        }
    }

    /// Optional property member.
    pub const fn opt(name: Atom, type_id: TypeId) -> Self {
        Self {
            name,
            type_id,
            optional: true,
            is_method: false,
        }
    }

    /// Method member. The descriptor is the callable shape regardless of
    /// the declared signature.
    pub const fn method(name: Atom) -> Self {
        Self {
            name,
            type_id: TypeId::FUNCTION,
            optional: false,
            is_method: true,
        }
    }
}

/// The member set an object-shape descriptor requires.
///
/// Properties are canonically sorted by name atom before interning, so
/// member declaration order never affects descriptor identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectShape {
    pub properties: Vec<PropertyInfo>,
}

impl ObjectShape {
    /// Look up a member by name.
    pub fn property(&self, name: Atom) -> Option<&PropertyInfo> {
        self.properties
            .binary_search_by_key(&name, |p| p.name)
            .ok()
            .map(|idx| &self.properties[idx])
    }
}

// =============================================================================
// Instantiation Identities
// =============================================================================

/// Resolved generic argument list. Inline up to [`TYPE_ARGS_INLINE`].
pub type TypeArgs = SmallVec<[TypeId; TYPE_ARGS_INLINE]>;

/// A fully-instantiated reference to a declaration: the declaration site
/// plus the concrete descriptors substituted for its type parameters.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub def: DefId,
    pub args: TypeArgs,
}

// =============================================================================
// TypeKey - Descriptor Structure
// =============================================================================

/// The structural key of a descriptor, one variant per descriptor kind.
///
/// `Param` only exists while a generic body is being lowered; a finished
/// descriptor never contains one (that is a construction error, see
/// [`crate::error::BuildError::UnresolvedInDescriptor`]). `Ref` is the
/// back-reference placeholder for an identity that was in progress when
/// it was referenced; it resolves through the registry at evaluation
/// time, which is how cyclic shapes terminate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKey {
    Intrinsic(IntrinsicKind),
    Literal(LiteralValue),
    /// Homogeneous array; the element descriptor applies to every element.
    Array(TypeId),
    /// Fixed-length positional elements.
    Tuple(TypeListId),
    Object(ObjectShapeId),
    /// Callable, independent of arity and return type.
    Function,
    /// Satisfied when at least one branch is satisfied; branch order is
    /// declaration order.
    Union(TypeListId),
    /// Satisfied when every branch is satisfied.
    Intersection(TypeListId),
    /// Open generic parameter (construction-time only).
    Param(Atom),
    /// Back-reference to an identity still under construction.
    Ref(TypeRefId),
}
