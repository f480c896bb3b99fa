//! The inbound type expression graph.
//!
//! [`TypeExpr`] is the handoff format between the collaborator front-end
//! and this crate: a fully-resolved static type reference, with generic
//! instantiations expressed as [`TypeExpr::Named`] (declaration + argument
//! expressions) and open parameters as [`TypeExpr::Param`]. The builder
//! lowers this graph to interned descriptors; nothing here is interned or
//! canonical.

use crate::def::DefId;
use crate::types::IntrinsicKind;

/// Literal type in source form.
#[derive(Clone, Debug, PartialEq)]
pub enum LiteralExpr {
    String(String),
    Number(f64),
    Boolean(bool),
    /// Decimal digits of a bigint literal.
    BigInt(String),
}

/// Member visibility as declared. Only `Public` members participate in
/// the structural contract.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// Property vs. method member.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Property,
    Method,
}

/// One declared member of a class, interface, or object literal type.
#[derive(Clone, Debug, PartialEq)]
pub struct MemberDecl {
    pub name: String,
    /// Declared type. For a method this is the declared signature; the
    /// builder collapses it to the callable shape regardless.
    pub ty: TypeExpr,
    pub kind: MemberKind,
    pub optional: bool,
    pub visibility: Visibility,
}

impl MemberDecl {
    /// Public required property.
    pub fn property(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty,
            kind: MemberKind::Property,
            optional: false,
            visibility: Visibility::Public,
        }
    }

    /// Public method with the given declared signature.
    pub fn method(name: impl Into<String>, signature: TypeExpr) -> Self {
        Self {
            name: name.into(),
            ty: signature,
            kind: MemberKind::Method,
            optional: false,
            visibility: Visibility::Public,
        }
    }

    /// Mark the member optional.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Set the member's declared visibility.
    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }
}

/// A static type reference as handed over by the front-end.
#[derive(Clone, Debug, PartialEq)]
pub enum TypeExpr {
    /// Primitive tag, `any`/`unknown`, or `never`.
    Intrinsic(IntrinsicKind),
    Literal(LiteralExpr),
    Array(Box<TypeExpr>),
    Tuple(Vec<TypeExpr>),
    /// Anonymous object literal type.
    Object(Vec<MemberDecl>),
    /// Function type. Parameters, return type, and asyncness are carried
    /// for completeness but do not survive into the descriptor: a
    /// function's runtime contract is callability alone.
    Function {
        params: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
        is_async: bool,
    },
    Union(Vec<TypeExpr>),
    Intersection(Vec<TypeExpr>),
    /// Reference to a registered declaration, generic arguments included.
    Named { def: DefId, args: Vec<TypeExpr> },
    /// Occurrence of a generic parameter inside a generic body. Must be
    /// bound by the instantiation at the call site.
    Param(String),
    /// Ambient/foreign type without static member disclosure. Builds to
    /// the always-pass descriptor.
    Opaque(String),
}

impl TypeExpr {
    pub fn any() -> Self {
        Self::Intrinsic(IntrinsicKind::Any)
    }

    pub fn unknown() -> Self {
        Self::Intrinsic(IntrinsicKind::Unknown)
    }

    pub fn never() -> Self {
        Self::Intrinsic(IntrinsicKind::Never)
    }

    pub fn undefined() -> Self {
        Self::Intrinsic(IntrinsicKind::Undefined)
    }

    pub fn null() -> Self {
        Self::Intrinsic(IntrinsicKind::Null)
    }

    pub fn boolean() -> Self {
        Self::Intrinsic(IntrinsicKind::Boolean)
    }

    pub fn number() -> Self {
        Self::Intrinsic(IntrinsicKind::Number)
    }

    pub fn string() -> Self {
        Self::Intrinsic(IntrinsicKind::String)
    }

    pub fn bigint() -> Self {
        Self::Intrinsic(IntrinsicKind::BigInt)
    }

    pub fn symbol() -> Self {
        Self::Intrinsic(IntrinsicKind::Symbol)
    }

    pub fn literal_string(value: impl Into<String>) -> Self {
        Self::Literal(LiteralExpr::String(value.into()))
    }

    pub fn literal_number(value: f64) -> Self {
        Self::Literal(LiteralExpr::Number(value))
    }

    pub fn literal_boolean(value: bool) -> Self {
        Self::Literal(LiteralExpr::Boolean(value))
    }

    pub fn array_of(element: TypeExpr) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn object(members: Vec<MemberDecl>) -> Self {
        Self::Object(members)
    }

    /// Synchronous function type.
    pub fn function(params: Vec<TypeExpr>, ret: TypeExpr) -> Self {
        Self::Function {
            params,
            ret: Box::new(ret),
            is_async: false,
        }
    }

    /// Asynchronous function type. Checked identically to a synchronous
    /// one: the result of an asynchronous call is never resolved during
    /// checking.
    pub fn async_function(params: Vec<TypeExpr>, ret: TypeExpr) -> Self {
        Self::Function {
            params,
            ret: Box::new(ret),
            is_async: true,
        }
    }

    pub fn union(branches: Vec<TypeExpr>) -> Self {
        Self::Union(branches)
    }

    pub fn intersection(branches: Vec<TypeExpr>) -> Self {
        Self::Intersection(branches)
    }

    /// Reference to a non-generic declaration.
    pub fn named(def: DefId) -> Self {
        Self::Named { def, args: Vec::new() }
    }

    /// Reference to a generic declaration with concrete arguments.
    pub fn instantiated(def: DefId, args: Vec<TypeExpr>) -> Self {
        Self::Named { def, args }
    }

    pub fn param(name: impl Into<String>) -> Self {
        Self::Param(name.into())
    }

    pub fn opaque(name: impl Into<String>) -> Self {
        Self::Opaque(name.into())
    }
}
