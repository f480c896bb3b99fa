//! Centralized limits and thresholds for the guard compiler.
//!
//! This module provides shared constants for recursion depths and capacity
//! limits used throughout the workspace. Centralizing these values:
//! - Prevents duplicate definitions with inconsistent values
//! - Documents the rationale for each limit
//!
//! # Solver recursion limits
//!
//! Recursion limits for descriptor building (inheritance walks, descriptor
//! walks) are centralized in `tsg_solver::recursion::RecursionProfile`
//! rather than here. The profiles are the single source of truth for
//! solver recursion.

/// Maximum size of a recursion guard's visiting set.
///
/// A visiting set larger than this indicates a pathological type graph
/// (tens of thousands of identities in flight at once); the guard reports
/// the entry as denied rather than growing without bound.
pub const MAX_VISITING_SET_SIZE: u32 = 10_000;

/// Maximum depth for generic type instantiation.
///
/// A self-referential generic whose arguments grow on every step
/// (`Foo<T>` containing `Foo<T[]>`) produces infinitely many distinct
/// instantiation identities, so the in-progress cycle marker never
/// fires. Past this depth the builder degrades the remainder to the
/// always-pass descriptor instead of expanding forever.
pub const MAX_INSTANTIATION_DEPTH: u32 = 50;

/// Maximum nesting depth of an inbound type expression.
///
/// Type expressions arrive as finite trees from the front-end; a tree
/// nested beyond this is pathological input, and the builder degrades the
/// remainder to the always-pass descriptor rather than risking stack
/// overflow.
pub const MAX_TYPE_EXPR_DEPTH: u32 = 256;

/// Inline capacity for generic type-argument lists.
///
/// Instantiation identities are keyed by `(definition, arguments)`. Almost
/// every generic instantiation in real code has one or two arguments, so
/// argument lists are collected into a `SmallVec` with this inline
/// capacity before interning and only spill to the heap beyond it.
pub const TYPE_ARGS_INLINE: usize = 2;
