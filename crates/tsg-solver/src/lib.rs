//! Structural Type Descriptor Solver
//!
//! This crate normalizes static type references into canonical, interned
//! **type descriptors** and owns everything the descriptor side needs:
//!
//! - **Interning**: O(1) descriptor equality via `TypeId` comparison
//! - **Building**: lowering the front-end's type graph to descriptors,
//!   with generic arguments substituted at build time
//! - **Cycle handling**: self-referential and mutually-referential types
//!   become back-reference placeholders through the registry, never
//!   unbounded recursion
//!
//! The runtime half (value model, predicate synthesis) lives in
//! `tsg-guard`; the front-end that extracts type information from source
//! text is an external collaborator that talks to this crate through
//! [`DefinitionStore`] and [`expr::TypeExpr`].

pub mod build;
pub mod def;
pub mod error;
pub mod expr;
pub mod instantiate;
pub mod intern;
pub mod recursion;
pub mod registry;
pub mod types;

pub use build::DescriptorBuilder;
pub use def::{DefId, DefKind, DefinitionInfo, DefinitionStore, Extends};
pub use error::BuildError;
pub use expr::{LiteralExpr, MemberDecl, MemberKind, TypeExpr, Visibility};
pub use instantiate::TypeSubstitution;
pub use intern::TypeInterner;
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
pub use registry::DescriptorRegistry;
pub use types::{
    IntrinsicKind, LiteralValue, ObjectShape, ObjectShapeId, OrderedFloat, PropertyInfo, TypeId,
    TypeKey, TypeListId, TypeRef, TypeRefId,
};
