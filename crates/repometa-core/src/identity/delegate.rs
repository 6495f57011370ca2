use crate::{error::ConfigurationError, identity::EntityIdentity, types::TypeToken};

///
/// DelegatingIdentity
///
/// Forwards every identity operation to an inner identity, unchanged.
/// Wrap it to intercept identity behavior without re-deriving it.
///

#[derive(Clone, Debug)]
pub struct DelegatingIdentity<D> {
    delegate: D,
}

impl<D> DelegatingIdentity<D> {
    #[must_use]
    pub const fn new(delegate: D) -> Self {
        Self { delegate }
    }

    /// Build from an optional delegate, failing when it is absent.
    pub fn try_new(delegate: Option<D>) -> Result<Self, ConfigurationError> {
        delegate
            .map(Self::new)
            .ok_or(ConfigurationError::MissingDelegate)
    }

    #[must_use]
    pub const fn delegate(&self) -> &D {
        &self.delegate
    }

    #[must_use]
    pub fn into_inner(self) -> D {
        self.delegate
    }
}

impl<E: ?Sized, D: EntityIdentity<E>> EntityIdentity<E> for DelegatingIdentity<D> {
    type Id = D::Id;
    type Error = D::Error;

    fn domain_type(&self) -> TypeToken {
        self.delegate.domain_type()
    }

    fn id_type(&self) -> Option<TypeToken> {
        self.delegate.id_type()
    }

    fn id(&self, entity: &E) -> Result<Option<Self::Id>, Self::Error> {
        self.delegate.id(entity)
    }

    fn id_type_is_primitive(&self) -> bool {
        self.delegate.id_type_is_primitive()
    }

    fn is_new(&self, entity: &E) -> Result<bool, Self::Error> {
        self.delegate.is_new(entity)
    }
}
