use crate::{
    identity::{EntityIdentity, IdValue, PrimitiveIdFlag, is_numeric_primitive},
    model::EntityFieldModel,
    types::TypeToken,
};
use std::{fmt, marker::PhantomData};

///
/// PersistentEntity
///
/// External persistence metadata for one entity type, including the
/// identifier accessor. Failures belong to the collaborator.
///

pub trait PersistentEntity<E: ?Sized> {
    type Id: IdValue;
    type Error;

    fn entity_type(&self) -> TypeToken;

    fn id_type(&self) -> Option<TypeToken>;

    fn id_field(&self) -> Option<&EntityFieldModel> {
        None
    }

    fn get_identifier(&self, entity: &E) -> Result<Option<Self::Id>, Self::Error>;
}

///
/// MetadataEntityIdentity
/// Identity backed by a `PersistentEntity` descriptor.
///

pub struct MetadataEntityIdentity<E: ?Sized, M> {
    metadata: M,
    primitive: PrimitiveIdFlag,
    _marker: PhantomData<fn(&E)>,
}

impl<E: ?Sized, M: PersistentEntity<E>> MetadataEntityIdentity<E, M> {
    #[must_use]
    pub const fn new(metadata: M) -> Self {
        Self {
            metadata,
            primitive: PrimitiveIdFlag::new(),
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub const fn metadata(&self) -> &M {
        &self.metadata
    }

    #[must_use]
    pub fn id_field(&self) -> Option<&EntityFieldModel> {
        self.metadata.id_field()
    }
}

impl<E: ?Sized, M: fmt::Debug> fmt::Debug for MetadataEntityIdentity<E, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataEntityIdentity")
            .field("metadata", &self.metadata)
            .field("primitive", &self.primitive.get())
            .finish()
    }
}

impl<E: ?Sized, M: PersistentEntity<E>> EntityIdentity<E> for MetadataEntityIdentity<E, M> {
    type Id = M::Id;
    type Error = M::Error;

    fn domain_type(&self) -> TypeToken {
        self.metadata.entity_type()
    }

    fn id_type(&self) -> Option<TypeToken> {
        self.metadata.id_type()
    }

    fn id(&self, entity: &E) -> Result<Option<Self::Id>, Self::Error> {
        self.metadata.get_identifier(entity)
    }

    fn id_type_is_primitive(&self) -> bool {
        self.primitive
            .get_or_init(|| is_numeric_primitive(self.id_type()))
    }
}
