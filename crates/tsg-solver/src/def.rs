//! Definition identifiers and storage.
//!
//! The collaborator front-end registers every declaration it extracts
//! (classes, interfaces, type aliases) in a [`DefinitionStore`] and refers
//! to them by [`DefId`] afterwards. The builder resolves `DefId`s back to
//! declarations on demand, so descriptor construction never depends on the
//! front-end's own symbol representation.

use crate::expr::{MemberDecl, TypeExpr};
use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use tracing::trace;

/// Global counter for assigning unique instance IDs to `DefinitionStore`
/// instances. Used for debugging `DefId` collision issues.
static NEXT_INSTANCE_ID: AtomicU64 = AtomicU64::new(1);

// =============================================================================
// DefId - Declaration-Site Identifier
// =============================================================================

/// Declaration-site identifier, allocated by the [`DefinitionStore`].
///
/// A `DefId` plus a resolved argument list is the identity of an
/// instantiation (see [`crate::types::TypeRef`]); the cache & cycle
/// registry keys on that identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DefId(pub u32);

impl DefId {
    /// Sentinel value for invalid `DefId`.
    pub const INVALID: Self = Self(0);

    /// First valid `DefId`.
    pub const FIRST_VALID: u32 = 1;

    /// Check if this `DefId` is valid.
    pub const fn is_valid(self) -> bool {
        self.0 >= Self::FIRST_VALID
    }
}

// =============================================================================
// DefKind - Declaration Kind
// =============================================================================

/// Kind of type declaration.
///
/// | Kind | Descriptor | Example |
/// |------|------------|---------|
/// | TypeAlias | its body, substituted | `type Foo<T> = T \| null` |
/// | Interface | object-shape of public members | `interface Point { x: number }` |
/// | Class | object-shape of public members | `class User { name: string }` |
///
/// Classes and interfaces build identically: the structural contract is
/// the public member set, and nominal identity is out of scope.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DefKind {
    /// Type alias: transparent, always expands to its body.
    TypeAlias,

    /// Interface declaration.
    Interface,

    /// Class declaration. Only the instance side participates; private
    /// and protected members never reach the descriptor.
    Class,
}

// =============================================================================
// Definition Info - Stored Declaration Data
// =============================================================================

/// Base-class reference: the parent declaration plus the type arguments
/// the child supplies for it (themselves expressions over the child's own
/// parameters).
#[derive(Clone, Debug, PartialEq)]
pub struct Extends {
    pub def: DefId,
    pub args: Vec<TypeExpr>,
}

/// Complete information about a type declaration, as handed over by the
/// front-end. Stored in [`DefinitionStore`] and retrieved by [`DefId`].
#[derive(Clone, Debug, PartialEq)]
pub struct DefinitionInfo {
    /// Kind of declaration (selects the build strategy)
    pub kind: DefKind,

    /// Name of the declaration (for diagnostics)
    pub name: String,

    /// Generic parameter names, declaration order
    pub type_params: Vec<String>,

    /// Alias body (`TypeAlias` only)
    pub body: Option<TypeExpr>,

    /// Own members (`Interface`/`Class` only), all visibilities; the
    /// builder filters to public
    pub members: Vec<MemberDecl>,

    /// Base class/interface, if any
    pub extends: Option<Extends>,
}

impl DefinitionInfo {
    /// Create a new type alias declaration.
    pub fn type_alias(
        name: impl Into<String>,
        type_params: Vec<&str>,
        body: TypeExpr,
    ) -> Self {
        Self {
            kind: DefKind::TypeAlias,
            name: name.into(),
            type_params: type_params.into_iter().map(String::from).collect(),
            body: Some(body),
            members: Vec::new(),
            extends: None,
        }
    }

    /// Create a new interface declaration.
    pub fn interface(
        name: impl Into<String>,
        type_params: Vec<&str>,
        members: Vec<MemberDecl>,
    ) -> Self {
        Self {
            kind: DefKind::Interface,
            name: name.into(),
            type_params: type_params.into_iter().map(String::from).collect(),
            body: None,
            members,
            extends: None,
        }
    }

    /// Create a new class declaration. `members` covers constructor-assigned
    /// properties, declared properties, property initializers, and methods
    /// alike; the front-end does not distinguish how a member came to exist.
    pub fn class(
        name: impl Into<String>,
        type_params: Vec<&str>,
        members: Vec<MemberDecl>,
    ) -> Self {
        Self {
            kind: DefKind::Class,
            name: name.into(),
            type_params: type_params.into_iter().map(String::from).collect(),
            body: None,
            members,
            extends: None,
        }
    }

    /// Set the base class/interface.
    pub fn with_extends(mut self, def: DefId, args: Vec<TypeExpr>) -> Self {
        self.extends = Some(Extends { def, args });
        self
    }
}

// =============================================================================
// DefinitionStore - Storage for Declarations
// =============================================================================

/// Thread-safe storage for type declarations.
///
/// ## Usage
///
/// ```ignore
/// let store = DefinitionStore::new();
///
/// let def_id = store.register(DefinitionInfo::type_alias(
///     "Maybe",
///     vec!["T"],
///     TypeExpr::union(vec![TypeExpr::param("T"), TypeExpr::null()]),
/// ));
///
/// let info = store.get(def_id).expect("definition exists");
/// ```
pub struct DefinitionStore {
    /// Unique instance ID for debugging (tracks which store instance this is)
    instance_id: u64,

    /// `DefId` -> `DefinitionInfo` mapping
    definitions: DashMap<DefId, DefinitionInfo>,

    /// Next available `DefId`
    next_id: AtomicU32,
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DefinitionStore {
    /// Create a new definition store.
    pub fn new() -> Self {
        let instance_id = NEXT_INSTANCE_ID.fetch_add(1, Ordering::SeqCst);
        trace!(instance_id, "DefinitionStore::new - creating new instance");
        Self {
            instance_id,
            definitions: DashMap::new(),
            next_id: AtomicU32::new(DefId::FIRST_VALID),
        }
    }

    /// Allocate a fresh `DefId`.
    fn allocate(&self) -> DefId {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        DefId(id)
    }

    /// Register a new declaration and return its `DefId`.
    pub fn register(&self, info: DefinitionInfo) -> DefId {
        let id = self.allocate();
        trace!(
            instance_id = self.instance_id,
            def_id = %id.0,
            kind = ?info.kind,
            name = %info.name,
            "DefinitionStore::register"
        );
        self.definitions.insert(id, info);
        id
    }

    /// Get declaration info by `DefId`.
    pub fn get(&self, id: DefId) -> Option<DefinitionInfo> {
        self.definitions.get(&id).map(|r| r.clone())
    }

    /// Check if a `DefId` exists.
    pub fn contains(&self, id: DefId) -> bool {
        self.definitions.contains_key(&id)
    }

    /// Get the kind of a declaration.
    pub fn get_kind(&self, id: DefId) -> Option<DefKind> {
        self.definitions.get(&id).map(|r| r.kind)
    }

    /// Get the name of a declaration.
    pub fn get_name(&self, id: DefId) -> Option<String> {
        self.definitions.get(&id).map(|r| r.name.clone())
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Get all `DefIds` (for debugging/testing).
    pub fn all_ids(&self) -> Vec<DefId> {
        self.definitions.iter().map(|r| *r.key()).collect()
    }
}

#[cfg(test)]
#[path = "../tests/def_tests.rs"]
mod tests;
