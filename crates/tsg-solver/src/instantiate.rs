//! Generic type-argument substitution.
//!
//! Instantiation is a compile-time pass: a generic declaration is lowered
//! once per distinct argument list, with every parameter occurrence
//! replaced by the concrete argument descriptor while the body is built.
//! An open parameter never survives past construction; there is no
//! runtime generic mechanism to fall back on.

use rustc_hash::FxHashMap;
use tsg_common::Atom;

use crate::types::TypeId;

/// Mapping from generic parameter names to the concrete descriptors
/// substituted for them during one instantiation.
#[derive(Clone, Debug, Default)]
pub struct TypeSubstitution {
    map: FxHashMap<Atom, TypeId>,
}

impl TypeSubstitution {
    /// Empty substitution (for non-generic contexts).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a substitution from parallel parameter and argument lists.
    ///
    /// Callers check arity first; a surplus on either side is ignored
    /// here.
    pub fn from_args(params: &[Atom], args: &[TypeId]) -> Self {
        let mut subst = Self::new();
        for (param, arg) in params.iter().zip(args) {
            subst.insert(*param, *arg);
        }
        subst
    }

    /// Bind a parameter to a descriptor.
    pub fn insert(&mut self, param: Atom, ty: TypeId) {
        self.map.insert(param, ty);
    }

    /// Look up the descriptor bound to a parameter.
    pub fn get(&self, param: Atom) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    /// Number of bound parameters.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Check if no parameters are bound.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

#[cfg(test)]
#[path = "../tests/instantiate_tests.rs"]
mod tests;
