//! Primitive kinds shared by the repometa type model.
//!
//! A primitive is a value type that always carries a value: it has no
//! "absent" state, so an unset primitive field holds its zero default.

#[macro_use]
mod macros;

use std::fmt;

///
/// Primitive
///
/// Canonical primitive kind. Names follow the Rust spelling of the
/// corresponding built-in type (`i64`, `u32`, `f64`, ...).
///

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Primitive {
    Bool,
    Char,
    Float32,
    Float64,
    Int8,
    Int16,
    Int32,
    Int64,
    Int128,
    Nat8,
    Nat16,
    Nat32,
    Nat64,
    Nat128,
}

impl Primitive {
    /// Return the full metadata descriptor for one primitive kind.
    #[must_use]
    pub const fn metadata(self) -> PrimitiveMetadata {
        primitive_registry!(metadata_from_registry, self)
    }

    #[must_use]
    pub const fn family(self) -> PrimitiveFamily {
        self.metadata().family
    }

    /// Rust spelling of the primitive (`"i64"`, `"bool"`, ...).
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.metadata().name
    }

    #[must_use]
    pub const fn bits(self) -> u16 {
        self.metadata().bits
    }

    /// Return whether values of this kind can be read as a number.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self.family(),
            PrimitiveFamily::Int | PrimitiveFamily::Nat | PrimitiveFamily::Float
        )
    }

    #[must_use]
    pub const fn is_integer(self) -> bool {
        matches!(self.family(), PrimitiveFamily::Int | PrimitiveFamily::Nat)
    }

    #[must_use]
    pub const fn is_signed(self) -> bool {
        matches!(self.family(), PrimitiveFamily::Int | PrimitiveFamily::Float)
    }

    /// Look up a primitive by its Rust spelling.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        ALL_PRIMITIVES.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

///
/// PrimitiveMetadata
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct PrimitiveMetadata {
    pub family: PrimitiveFamily,
    pub name: &'static str,
    pub bits: u16,
}

///
/// PrimitiveFamily
///
/// Coarse grouping used for numeric classification.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum PrimitiveFamily {
    Bool,
    Char,
    Float,
    Int,
    Nat,
}

/// Ordered list of all primitive kinds in registry order.
pub const ALL_PRIMITIVES: [Primitive; 14] = primitive_registry!(all_primitives_from_registry);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_every_kind_once() {
        let mut seen = ALL_PRIMITIVES.to_vec();
        seen.sort();
        seen.dedup();

        assert_eq!(seen.len(), ALL_PRIMITIVES.len());
    }

    #[test]
    fn numeric_classification_excludes_bool_and_char() {
        assert!(!Primitive::Bool.is_numeric());
        assert!(!Primitive::Char.is_numeric());

        for kind in ALL_PRIMITIVES {
            if kind.is_integer() {
                assert!(kind.is_numeric(), "{kind} is an integer");
            }
        }
        assert!(Primitive::Float64.is_numeric());
        assert!(!Primitive::Float64.is_integer());
    }

    #[test]
    fn names_round_trip() {
        for kind in ALL_PRIMITIVES {
            assert_eq!(Primitive::from_name(kind.name()), Some(kind));
        }
        assert_eq!(Primitive::from_name("Long"), None);
        assert_eq!(Primitive::Nat64.to_string(), "u64");
    }

    #[test]
    fn signedness_and_width() {
        assert!(Primitive::Int32.is_signed());
        assert!(!Primitive::Nat32.is_signed());
        assert_eq!(Primitive::Int128.bits(), 128);
        assert_eq!(Primitive::Char.bits(), 32);
    }
}
