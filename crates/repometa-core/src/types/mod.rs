//! Module: types
//! Responsibility: the declared type graph that stands in for runtime generic
//! metadata: tokens, generic references, and per-type declarations.
//! Does not own: argument resolution (see `resolve`) or repository policy.
//!
//! Invariants:
//! - A `TypeToken` is an immutable, `Copy` handle; equality is identity.
//! - A `GenericRef` with no arguments on a generic raw type is raw usage.
//! - Type variables are only meaningful inside the declaration that names them.

mod registry;

pub use registry::{RegistryError, TypeHost, TypeRegistry};

use crate::traits::Path;
use derive_more::Display;
use repometa_primitives::Primitive;
use std::fmt;

///
/// TypeToken
///
/// Opaque handle to one runtime type.
/// Named types are keyed by their fully-qualified path.
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TypeToken {
    Primitive(Primitive),
    Named(&'static str),
}

impl TypeToken {
    #[must_use]
    pub const fn named(path: &'static str) -> Self {
        Self::Named(path)
    }

    #[must_use]
    pub const fn primitive(kind: Primitive) -> Self {
        Self::Primitive(kind)
    }

    /// Token for a type carrying a static schema path.
    #[must_use]
    pub const fn of<T: Path + ?Sized>() -> Self {
        Self::Named(T::PATH)
    }

    #[must_use]
    pub const fn is_primitive(self) -> bool {
        matches!(self, Self::Primitive(_))
    }

    #[must_use]
    pub const fn as_primitive(self) -> Option<Primitive> {
        match self {
            Self::Primitive(kind) => Some(kind),
            Self::Named(_) => None,
        }
    }

    /// Path used for diagnostics, lookups, and per-type metrics.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Primitive(kind) => kind.name(),
            Self::Named(path) => path,
        }
    }
}

impl fmt::Display for TypeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl From<Primitive> for TypeToken {
    fn from(kind: Primitive) -> Self {
        Self::Primitive(kind)
    }
}

///
/// TypeArg
///
/// One argument position of a generic reference: either a concrete type
/// or a type variable declared by the referencing type.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TypeArg {
    Concrete(TypeToken),
    Var(&'static str),
}

impl fmt::Display for TypeArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Concrete(ty) => write!(f, "{ty}"),
            Self::Var(name) => f.write_str(name),
        }
    }
}

impl From<TypeToken> for TypeArg {
    fn from(ty: TypeToken) -> Self {
        Self::Concrete(ty)
    }
}

impl From<Primitive> for TypeArg {
    fn from(kind: Primitive) -> Self {
        Self::Concrete(TypeToken::Primitive(kind))
    }
}

///
/// GenericRef
///
/// A (possibly parameterized) reference to a supertype, as written in the
/// declaration of a subtype.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GenericRef {
    pub raw: TypeToken,
    pub args: Vec<TypeArg>,
}

impl GenericRef {
    /// Reference without arguments. On a generic type this is raw usage.
    #[must_use]
    pub const fn raw(raw: TypeToken) -> Self {
        Self {
            raw,
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<TypeArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Pass one of the declaring type's own variables through.
    #[must_use]
    pub fn var(mut self, name: &'static str) -> Self {
        self.args.push(TypeArg::Var(name));
        self
    }

    #[must_use]
    pub fn is_raw(&self) -> bool {
        self.args.is_empty()
    }
}

impl fmt::Display for GenericRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)?;
        if self.args.is_empty() {
            return Ok(());
        }

        f.write_str("<")?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(">")
    }
}

///
/// DeclKind
///

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum DeclKind {
    #[display("interface")]
    Interface,
    #[display("concrete")]
    Concrete,
}

///
/// TypeDecl
///
/// Declaration of one named type: its own type variables and the
/// parameterized supertypes it extends or implements, in declaration order.
///

#[derive(Clone, Debug)]
pub struct TypeDecl {
    token: TypeToken,
    kind: DeclKind,
    params: Vec<&'static str>,
    supertypes: Vec<GenericRef>,
}

impl TypeDecl {
    #[must_use]
    pub const fn interface(path: &'static str) -> Self {
        Self::new(TypeToken::Named(path), DeclKind::Interface)
    }

    #[must_use]
    pub const fn concrete(path: &'static str) -> Self {
        Self::new(TypeToken::Named(path), DeclKind::Concrete)
    }

    #[must_use]
    pub const fn new(token: TypeToken, kind: DeclKind) -> Self {
        Self {
            token,
            kind,
            params: Vec::new(),
            supertypes: Vec::new(),
        }
    }

    /// Declare one type variable (order is significant).
    #[must_use]
    pub fn param(mut self, name: &'static str) -> Self {
        self.params.push(name);
        self
    }

    #[must_use]
    pub fn extends(mut self, supertype: GenericRef) -> Self {
        self.supertypes.push(supertype);
        self
    }

    #[must_use]
    pub const fn token(&self) -> TypeToken {
        self.token
    }

    #[must_use]
    pub const fn kind(&self) -> DeclKind {
        self.kind
    }

    #[must_use]
    pub fn params(&self) -> &[&'static str] {
        &self.params
    }

    #[must_use]
    pub fn supertypes(&self) -> &[GenericRef] {
        &self.supertypes
    }

    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.params.is_empty()
    }
}
