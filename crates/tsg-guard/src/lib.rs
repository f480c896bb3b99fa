//! Runtime side of the structural guard compiler.
//!
//! `tsg-solver` turns static type references into canonical descriptors;
//! this crate turns descriptors into executable predicates over dynamic
//! [`Value`]s and exposes the two public entry points:
//!
//! - [`GuardCompiler::type_check_for`]: compile a reusable predicate
//! - [`GuardCompiler::is_a`]: compile-if-absent, then apply to a value
//!
//! Both are observably equivalent for the same `(type, value)` pair; the
//! second is literally the first plus an application.
//!
//! Generated predicates are pure, never panic, and may be invoked
//! concurrently without coordination.

pub mod engine;
pub mod synth;
pub mod value;

pub use engine::GuardCompiler;
pub use synth::{Guard, GuardCache, GuardSynthesizer};
pub use value::{ObjectValue, Value};

// The solver vocabulary callers need to describe types
pub use tsg_solver::{
    BuildError, DefId, DefinitionInfo, DefinitionStore, DescriptorRegistry, IntrinsicKind,
    LiteralExpr, MemberDecl, MemberKind, TypeExpr, TypeId, TypeInterner, Visibility,
};
