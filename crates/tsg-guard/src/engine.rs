//! The public entry points.
//!
//! [`GuardCompiler`] wires the pieces together: the definition store the
//! front-end registers declarations in, the descriptor interner, the
//! cache & cycle registry, and the guard cache. One compiler instance is
//! one compilation universe; [`GuardCompiler::global`] is the
//! process-wide instance for hosts that want the memo tables to span the
//! whole process, matching their compile-once lifecycle.

use crate::synth::{Guard, GuardCache, GuardSynthesizer};
use crate::value::Value;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tsg_solver::{
    BuildError, DescriptorBuilder, DescriptorRegistry, DefinitionStore, TypeExpr, TypeId,
    TypeInterner,
};

static GLOBAL: Lazy<GuardCompiler> = Lazy::new(GuardCompiler::new);

/// Compiles static type references into runtime structural predicates.
pub struct GuardCompiler {
    defs: Arc<DefinitionStore>,
    interner: Arc<TypeInterner>,
    descriptors: Arc<DescriptorRegistry>,
    guards: Arc<GuardCache>,
}

impl Default for GuardCompiler {
    fn default() -> Self {
        Self::new()
    }
}

impl GuardCompiler {
    /// Create a fresh compiler with empty memo tables.
    pub fn new() -> Self {
        Self {
            defs: Arc::new(DefinitionStore::new()),
            interner: Arc::new(TypeInterner::new()),
            descriptors: Arc::new(DescriptorRegistry::new()),
            guards: Arc::new(GuardCache::new()),
        }
    }

    /// The process-wide compiler instance.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// The store the front-end registers declarations in.
    pub fn definitions(&self) -> &DefinitionStore {
        &self.defs
    }

    /// The descriptor interner (descriptor-level introspection).
    pub fn interner(&self) -> &TypeInterner {
        &self.interner
    }

    /// The descriptor cache & cycle registry.
    pub fn descriptors(&self) -> &DescriptorRegistry {
        &self.descriptors
    }

    /// The synthesized-guard cache.
    pub fn guards(&self) -> &GuardCache {
        &self.guards
    }

    /// Build (or look up) the descriptor for a type reference without
    /// synthesizing a guard.
    pub fn compile_descriptor(&self, ty: &TypeExpr) -> Result<TypeId, BuildError> {
        DescriptorBuilder::new(&self.interner, &self.defs, &self.descriptors).build(ty)
    }

    /// Compile a reusable predicate for a fully-instantiated type
    /// reference.
    pub fn type_check_for(&self, ty: &TypeExpr) -> Result<Guard, BuildError> {
        let descriptor = self.compile_descriptor(ty)?;
        let synthesizer = GuardSynthesizer::new(
            Arc::clone(&self.interner),
            Arc::clone(&self.descriptors),
            Arc::clone(&self.guards),
        );
        Ok(synthesizer.synthesize(descriptor))
    }

    /// Compile-if-absent, then apply to `value`. Observably equivalent to
    /// [`type_check_for`](Self::type_check_for) followed by application.
    pub fn is_a(&self, ty: &TypeExpr, value: &Value) -> Result<bool, BuildError> {
        let guard = self.type_check_for(ty)?;
        Ok(guard(value))
    }
}
