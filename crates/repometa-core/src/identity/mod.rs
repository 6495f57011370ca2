//! Module: identity
//! Responsibility: entity identity capability and the "is new" heuristic.
//! Does not own: how identifiers are stored or generated.
//!
//! Invariants:
//! - An absent id always means "new".
//! - A present id is "new" only when the declared id type is a primitive
//!   numeric type and the value, read as a number, is below 1.
//! - The primitive-id flag is computed at most once per identity instance
//!   barring benign concurrent recomputation.

mod delegate;
mod metadata;
mod reflect;
#[cfg(test)]
mod tests;

pub use delegate::DelegatingIdentity;
pub use metadata::{MetadataEntityIdentity, PersistentEntity};
pub use reflect::ReflectionEntityIdentity;

use crate::types::TypeToken;
use num_traits::ToPrimitive;
use repometa_primitives::Primitive;
use std::sync::{
    Arc,
    atomic::{AtomicU8, Ordering},
};

///
/// IdValue
///
/// An identifier value that may be read as a number.
/// Text and other non-numeric ids return `None`.
///

pub trait IdValue {
    fn as_number(&self) -> Option<f64>;
}

macro_rules! impl_numeric_id {
    ($($t:ty),* $(,)?) => {
        $(
            impl IdValue for $t {
                fn as_number(&self) -> Option<f64> {
                    self.to_f64()
                }
            }
        )*
    };
}

impl_numeric_id!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64
);

macro_rules! impl_opaque_id {
    ($($t:ty),* $(,)?) => {
        $(
            impl IdValue for $t {
                fn as_number(&self) -> Option<f64> {
                    None
                }
            }
        )*
    };
}

impl_opaque_id!(bool, char, str, String);

impl<T: IdValue + ?Sized> IdValue for &T {
    fn as_number(&self) -> Option<f64> {
        (**self).as_number()
    }
}

///
/// EntityIdentity
///
/// Capability set describing the identity of one domain type.
///
/// `Error` is the collaborator's own failure type; it is propagated
/// unchanged by every operation here.
///

pub trait EntityIdentity<E: ?Sized> {
    type Id: IdValue;
    type Error;

    /// The domain type this identity was built for.
    fn domain_type(&self) -> TypeToken;

    /// Declared identifier type, when it can be determined.
    fn id_type(&self) -> Option<TypeToken>;

    fn id(&self, entity: &E) -> Result<Option<Self::Id>, Self::Error>;

    /// Whether the declared id type is a primitive numeric type.
    ///
    /// Implementations holding a `PrimitiveIdFlag` answer from it.
    fn id_type_is_primitive(&self) -> bool {
        is_numeric_primitive(self.id_type())
    }

    fn is_new(&self, entity: &E) -> Result<bool, Self::Error> {
        let id = self.id(entity)?;

        Ok(is_new_id(id.as_ref(), || self.id_type_is_primitive()))
    }
}

/// Decide "new" for an optional id value.
///
/// `primitive` is only consulted when an id is present.
/// Non-primitive ids never get the numeric check, even when numeric.
pub fn is_new_id<I: IdValue + ?Sized>(id: Option<&I>, primitive: impl FnOnce() -> bool) -> bool {
    match id {
        None => true,
        Some(id) => primitive() && id.as_number().is_some_and(|n| n < 1.0),
    }
}

/// Whether `id_type` is declared as a primitive numeric type.
///
/// `bool` and `char` are primitive but never numeric.
#[must_use]
pub fn is_numeric_primitive(id_type: Option<TypeToken>) -> bool {
    id_type
        .and_then(TypeToken::as_primitive)
        .is_some_and(Primitive::is_numeric)
}

///
/// PrimitiveIdFlag
///
/// Lazily computed, memoized "id type is primitive" bit.
/// Concurrent first use may run the probe more than once; every run
/// stores the same value, so a relaxed load/store is sufficient.
///

#[derive(Debug, Default)]
pub struct PrimitiveIdFlag(AtomicU8);

impl PrimitiveIdFlag {
    const UNKNOWN: u8 = 0;
    const NO: u8 = 1;
    const YES: u8 = 2;

    #[must_use]
    pub const fn new() -> Self {
        Self(AtomicU8::new(Self::UNKNOWN))
    }

    /// Cached value, if already computed.
    #[must_use]
    pub fn get(&self) -> Option<bool> {
        match self.0.load(Ordering::Relaxed) {
            Self::NO => Some(false),
            Self::YES => Some(true),
            _ => None,
        }
    }

    pub fn get_or_init(&self, probe: impl FnOnce() -> bool) -> bool {
        if let Some(primitive) = self.get() {
            return primitive;
        }

        let primitive = probe();
        let state = if primitive { Self::YES } else { Self::NO };
        self.0.store(state, Ordering::Relaxed);

        tracing::trace!(primitive, "computed primitive id flag");

        primitive
    }
}

impl Clone for PrimitiveIdFlag {
    fn clone(&self) -> Self {
        Self(AtomicU8::new(self.0.load(Ordering::Relaxed)))
    }
}

///
/// Forwarding impls
///

impl<E: ?Sized, I: EntityIdentity<E> + ?Sized> EntityIdentity<E> for &I {
    type Id = I::Id;
    type Error = I::Error;

    fn domain_type(&self) -> TypeToken {
        (**self).domain_type()
    }

    fn id_type(&self) -> Option<TypeToken> {
        (**self).id_type()
    }

    fn id(&self, entity: &E) -> Result<Option<Self::Id>, Self::Error> {
        (**self).id(entity)
    }

    fn id_type_is_primitive(&self) -> bool {
        (**self).id_type_is_primitive()
    }

    fn is_new(&self, entity: &E) -> Result<bool, Self::Error> {
        (**self).is_new(entity)
    }
}

impl<E: ?Sized, I: EntityIdentity<E> + ?Sized> EntityIdentity<E> for Arc<I> {
    type Id = I::Id;
    type Error = I::Error;

    fn domain_type(&self) -> TypeToken {
        (**self).domain_type()
    }

    fn id_type(&self) -> Option<TypeToken> {
        (**self).id_type()
    }

    fn id(&self, entity: &E) -> Result<Option<Self::Id>, Self::Error> {
        (**self).id(entity)
    }

    fn id_type_is_primitive(&self) -> bool {
        (**self).id_type_is_primitive()
    }

    fn is_new(&self, entity: &E) -> Result<bool, Self::Error> {
        (**self).is_new(entity)
    }
}
