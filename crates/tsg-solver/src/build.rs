//! Descriptor building: lowering the front-end's type graph to interned
//! descriptors.
//!
//! The builder owns the hard cases:
//!
//! - **Generic instantiation**: a `Named` reference's arguments are built
//!   first, then the declaration body is lowered under the resulting
//!   [`TypeSubstitution`]. Every instantiation compiles independently; an
//!   unbound parameter is a fatal construction error, never a descriptor.
//! - **Cycles**: a reference whose identity is already in progress in the
//!   registry becomes a back-reference placeholder instead of recursing.
//! - **Inheritance**: classes and interfaces flatten to the object-shape
//!   of their own and inherited public members, child members shadowing
//!   parents by name.
//! - **Runtime-shape collapse**: methods and function types build to the
//!   callable shape, however they were declared. Nothing else about a
//!   signature is observable by a structural check.
//! - **Permissive fallback**: unknown declarations and ambient types
//!   build to the always-pass descriptor. Rejecting everything breaks
//!   more programs than it protects.

use rustc_hash::FxHashSet;
use std::cell::Cell;
use tracing::trace;
use tsg_common::Atom;
use tsg_common::limits::{MAX_INSTANTIATION_DEPTH, MAX_TYPE_EXPR_DEPTH};

use crate::def::{DefId, DefKind, DefinitionStore};
use crate::error::BuildError;
use crate::expr::{LiteralExpr, MemberKind, TypeExpr, Visibility};
use crate::instantiate::TypeSubstitution;
use crate::intern::TypeInterner;
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::registry::DescriptorRegistry;
use crate::types::{PropertyInfo, TypeId, TypeKey, TypeRefId};

/// Lowers [`TypeExpr`] graphs to descriptors, consulting the registry for
/// caching and cycle detection throughout.
pub struct DescriptorBuilder<'a> {
    interner: &'a TypeInterner,
    defs: &'a DefinitionStore,
    registry: &'a DescriptorRegistry,
    /// Nesting depth of in-flight instantiations. Identity-level cycles
    /// are caught by the registry; this catches the expanding kind, where
    /// every step has a fresh identity.
    instantiations: Cell<u32>,
}

impl<'a> DescriptorBuilder<'a> {
    pub fn new(
        interner: &'a TypeInterner,
        defs: &'a DefinitionStore,
        registry: &'a DescriptorRegistry,
    ) -> Self {
        Self {
            interner,
            defs,
            registry,
            instantiations: Cell::new(0),
        }
    }

    /// Build the descriptor for a fully-instantiated type reference.
    ///
    /// Any generic parameter occurring in `expr` must already be bound;
    /// top-level requests have no substitution in scope.
    pub fn build(&self, expr: &TypeExpr) -> Result<TypeId, BuildError> {
        self.lower(expr, &TypeSubstitution::new(), 0)
    }

    /// Build the descriptor for an instantiated declaration reference.
    ///
    /// Cached per identity: the first request builds, every later request
    /// for the same `(def, args)` is a lookup. If the identity is already
    /// being built (a structural or mutual cycle), the result is a
    /// back-reference placeholder that resolves through the registry at
    /// evaluation time.
    pub fn build_ref(&self, def: DefId, args: &[TypeId]) -> Result<TypeId, BuildError> {
        let key = self.interner.type_ref(def, args);
        if let Some(existing) = self.registry.resolved(key) {
            return Ok(existing);
        }
        if self.registry.is_in_progress(key) {
            trace!(key = key.0, def = def.0, "cycle detected; emitting back-reference");
            return Ok(self.interner.backref(key));
        }
        if self.instantiations.get() >= MAX_INSTANTIATION_DEPTH {
            // An expanding self-instantiation (`Foo<T>` referencing
            // `Foo<T[]>`) never revisits an identity, so it is cut off by
            // depth instead. The remainder degrades rather than erroring:
            // the shallow structure already built stays checkable.
            trace!(def = def.0, "instantiation depth exceeded; degrading to unknown");
            return Ok(TypeId::UNKNOWN);
        }
        self.instantiations.set(self.instantiations.get() + 1);
        let result = self
            .registry
            .get_or_build(key, || self.build_definition(def, args, key));
        self.instantiations.set(self.instantiations.get() - 1);
        result
    }

    // -------------------------------------------------------------------------
    // Lowering
    // -------------------------------------------------------------------------

    fn lower(
        &self,
        expr: &TypeExpr,
        subst: &TypeSubstitution,
        depth: u32,
    ) -> Result<TypeId, BuildError> {
        if depth > MAX_TYPE_EXPR_DEPTH {
            trace!("type expression exceeds depth limit; degrading to unknown");
            return Ok(TypeId::UNKNOWN);
        }
        match expr {
            TypeExpr::Intrinsic(kind) => Ok(kind.type_id()),

            TypeExpr::Literal(lit) => Ok(match lit {
                LiteralExpr::String(value) => self.interner.literal_string(value),
                LiteralExpr::Number(value) => self.interner.literal_number(*value),
                LiteralExpr::Boolean(value) => self.interner.literal_boolean(*value),
                LiteralExpr::BigInt(digits) => self.interner.literal_bigint(digits),
            }),

            TypeExpr::Array(element) => {
                let element = self.lower(element, subst, depth + 1)?;
                Ok(self.interner.array(element))
            }

            TypeExpr::Tuple(elements) => {
                let elements = elements
                    .iter()
                    .map(|e| self.lower(e, subst, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.interner.tuple(elements))
            }

            TypeExpr::Object(members) => {
                let mut props = Vec::with_capacity(members.len());
                for member in members {
                    if member.visibility != Visibility::Public {
                        continue;
                    }
                    let name = self.interner.intern_string(&member.name);
                    let type_id = match member.kind {
                        MemberKind::Method => TypeId::FUNCTION,
                        MemberKind::Property => self.lower(&member.ty, subst, depth + 1)?,
                    };
                    props.push(PropertyInfo {
                        name,
                        type_id,
                        optional: member.optional,
                        is_method: member.kind == MemberKind::Method,
                    });
                }
                Ok(self.interner.object(props))
            }

            // Callability is the entire runtime contract of a function
            // type; nothing else about the signature survives.
            TypeExpr::Function { .. } => Ok(TypeId::FUNCTION),

            TypeExpr::Union(branches) => {
                let branches = branches
                    .iter()
                    .map(|b| self.lower(b, subst, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.interner.union(branches))
            }

            TypeExpr::Intersection(branches) => {
                let branches = branches
                    .iter()
                    .map(|b| self.lower(b, subst, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(self.interner.intersection(branches))
            }

            TypeExpr::Named { def, args } => {
                let args = args
                    .iter()
                    .map(|a| self.lower(a, subst, depth + 1))
                    .collect::<Result<Vec<_>, _>>()?;
                self.build_ref(*def, &args)
            }

            TypeExpr::Param(name) => {
                let atom = self.interner.intern_string(name);
                subst
                    .get(atom)
                    .ok_or_else(|| BuildError::UnresolvedTypeParameter { name: name.clone() })
            }

            TypeExpr::Opaque(name) => {
                trace!(name = %name, "ambient type without structure; degrading to unknown");
                Ok(TypeId::UNKNOWN)
            }
        }
    }

    // -------------------------------------------------------------------------
    // Declaration building
    // -------------------------------------------------------------------------

    fn build_definition(
        &self,
        def: DefId,
        args: &[TypeId],
        key: TypeRefId,
    ) -> Result<TypeId, BuildError> {
        let Some(info) = self.defs.get(def) else {
            trace!(def = def.0, "unknown definition; degrading to unknown");
            return Ok(TypeId::UNKNOWN);
        };
        if info.type_params.len() != args.len() {
            return Err(BuildError::TypeArgumentCountMismatch {
                name: info.name.clone(),
                expected: info.type_params.len(),
                got: args.len(),
            });
        }
        let params: Vec<Atom> = info
            .type_params
            .iter()
            .map(|p| self.interner.intern_string(p))
            .collect();
        let subst = TypeSubstitution::from_args(&params, args);

        let ty = match info.kind {
            DefKind::TypeAlias => match &info.body {
                Some(body) => {
                    let built = self.lower(body, &subst, 0)?;
                    // An alias that resolves directly to its own
                    // placeholder (`type Loop = Loop`) is vacuous; the
                    // permissive fallback beats a self-deferring check.
                    if self.interner.lookup(built) == Some(TypeKey::Ref(key)) {
                        TypeId::UNKNOWN
                    } else {
                        built
                    }
                }
                None => TypeId::UNKNOWN,
            },
            DefKind::Interface | DefKind::Class => {
                let mut props = Vec::new();
                let mut seen = FxHashSet::default();
                let mut guard = RecursionGuard::with_profile(RecursionProfile::InheritanceWalk);
                self.collect_members(def, &subst, &mut props, &mut seen, &mut guard)?;
                self.interner.object(props)
            }
        };

        // Invariant: no open parameter survives into a finished
        // descriptor. Hitting this is a bug in the builder, not input.
        if self.interner.contains_param(ty) {
            return Err(BuildError::UnresolvedInDescriptor {
                name: info.name.clone(),
            });
        }
        Ok(ty)
    }

    /// Collect own and inherited public members of `def`, child members
    /// shadowing parents by name. Inheritance cycles and pathological
    /// chain depth stop the walk with whatever was collected.
    fn collect_members(
        &self,
        def: DefId,
        subst: &TypeSubstitution,
        props: &mut Vec<PropertyInfo>,
        seen: &mut FxHashSet<Atom>,
        guard: &mut RecursionGuard<DefId>,
    ) -> Result<(), BuildError> {
        let Some(info) = self.defs.get(def) else {
            // Unknown base: members it would contribute are unknowable,
            // which the permissive model treats as no requirement.
            return Ok(());
        };
        match guard.enter(def) {
            RecursionResult::Entered => {}
            denied => {
                trace!(def = def.0, ?denied, "inheritance walk stopped");
                return Ok(());
            }
        }

        let result = (|| {
            for member in &info.members {
                if member.visibility != Visibility::Public {
                    continue;
                }
                let name = self.interner.intern_string(&member.name);
                if !seen.insert(name) {
                    continue;
                }
                let type_id = match member.kind {
                    MemberKind::Method => TypeId::FUNCTION,
                    MemberKind::Property => self.lower(&member.ty, subst, 0)?,
                };
                props.push(PropertyInfo {
                    name,
                    type_id,
                    optional: member.optional,
                    is_method: member.kind == MemberKind::Method,
                });
            }

            if let Some(extends) = &info.extends
                && let Some(parent) = self.defs.get(extends.def)
            {
                if parent.type_params.len() != extends.args.len() {
                    return Err(BuildError::TypeArgumentCountMismatch {
                        name: parent.name.clone(),
                        expected: parent.type_params.len(),
                        got: extends.args.len(),
                    });
                }
                // Base arguments are expressions over the child's own
                // parameters; build them under the child's substitution.
                let parent_args = extends
                    .args
                    .iter()
                    .map(|a| self.lower(a, subst, 0))
                    .collect::<Result<Vec<_>, _>>()?;
                let parent_params: Vec<Atom> = parent
                    .type_params
                    .iter()
                    .map(|p| self.interner.intern_string(p))
                    .collect();
                let parent_subst = TypeSubstitution::from_args(&parent_params, &parent_args);
                self.collect_members(extends.def, &parent_subst, props, seen, guard)?;
            }
            Ok(())
        })();

        guard.leave(def);
        result
    }
}

#[cfg(test)]
#[path = "../tests/build_tests.rs"]
mod tests;
