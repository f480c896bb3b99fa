//! Fatal construction errors.
//!
//! The split matters: anything a front-end might plausibly hand over in a
//! degraded form (unknown declarations, ambient types) falls back to the
//! always-pass descriptor and is **not** an error. `BuildError` covers
//! only contract violations: an unbound generic parameter at a call
//! site, a wrong-arity instantiation, or a parameter leaking into a
//! finished descriptor (a bug in the builder itself).

use thiserror::Error;

/// Error produced while building a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// A generic parameter occurred with no binding in scope. The caller
    /// must instantiate the declaration before requesting a descriptor.
    #[error("generic type parameter `{name}` is not bound at this call site")]
    UnresolvedTypeParameter { name: String },

    /// An instantiation supplied the wrong number of type arguments.
    #[error("`{name}` expects {expected} type argument(s), got {got}")]
    TypeArgumentCountMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// A finished descriptor still contained an open parameter. This is a
    /// programmer error in the core, not a malformed input.
    #[error("finished descriptor for `{name}` still contains an unresolved type parameter")]
    UnresolvedInDescriptor { name: String },
}
