//! Module: target
//! Responsibility: the target capability consumed by method-interception
//! layers, which ask for the current target on every intercepted call.
//!
//! Invariants:
//! - `DynamicTarget` never caches; every lookup re-invokes its supplier.
//! - Supplier failures reach the caller unchanged.


use crate::types::TypeToken;
use std::{convert::Infallible, fmt, marker::PhantomData};

///
/// TargetSource
///
/// Where an interception layer obtains the object it forwards to.
/// When `is_static()` is false the layer must not hold a target across
/// separate invocations.
///

pub trait TargetSource {
    type Target;
    type Error;

    fn target_type(&self) -> TypeToken;

    fn is_static(&self) -> bool;

    fn target(&self) -> Result<Self::Target, Self::Error>;
}

///
/// DynamicTarget
///
/// Resolves its target afresh on each access by calling a supplier.
/// The supplier is responsible for its own thread safety.
///

pub struct DynamicTarget<T, E, F> {
    target_type: TypeToken,
    supplier: F,
    _marker: PhantomData<fn() -> Result<T, E>>,
}

impl<T, E, F> DynamicTarget<T, E, F>
where
    F: Fn() -> Result<T, E>,
{
    #[must_use]
    pub const fn new(target_type: TypeToken, supplier: F) -> Self {
        Self {
            target_type,
            supplier,
            _marker: PhantomData,
        }
    }
}

impl<T, E, F> fmt::Debug for DynamicTarget<T, E, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicTarget")
            .field("target_type", &self.target_type)
            .finish_non_exhaustive()
    }
}

impl<T, E, F> TargetSource for DynamicTarget<T, E, F>
where
    F: Fn() -> Result<T, E>,
{
    type Target = T;
    type Error = E;

    fn target_type(&self) -> TypeToken {
        self.target_type
    }

    fn is_static(&self) -> bool {
        false
    }

    fn target(&self) -> Result<T, E> {
        tracing::trace!(target_type = %self.target_type, "looking up dynamic target");

        (self.supplier)()
    }
}

///
/// StaticTarget
/// Always hands out the same instance.
///

#[derive(Clone, Debug)]
pub struct StaticTarget<T> {
    target_type: TypeToken,
    target: T,
}

impl<T: Clone> StaticTarget<T> {
    #[must_use]
    pub const fn new(target_type: TypeToken, target: T) -> Self {
        Self {
            target_type,
            target,
        }
    }
}

impl<T: Clone> TargetSource for StaticTarget<T> {
    type Target = T;
    type Error = Infallible;

    fn target_type(&self) -> TypeToken {
        self.target_type
    }

    fn is_static(&self) -> bool {
        true
    }

    fn target(&self) -> Result<T, Infallible> {
        Ok(self.target.clone())
    }
}
