use crate::{
    identity::{EntityIdentity, PrimitiveIdFlag, is_numeric_primitive},
    model::EntityFieldModel,
    traits::EntityKey,
    types::TypeToken,
};
use std::{convert::Infallible, fmt, marker::PhantomData};

///
/// ReflectionEntityIdentity
///
/// Identity read from the entity's own static model and key accessor.
/// Reading a key cannot fail, so `Error` is `Infallible`.
///

pub struct ReflectionEntityIdentity<E: EntityKey> {
    primitive: PrimitiveIdFlag,
    _marker: PhantomData<fn(&E)>,
}

impl<E: EntityKey> ReflectionEntityIdentity<E> {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            primitive: PrimitiveIdFlag::new(),
            _marker: PhantomData,
        }
    }

    /// The designated identifier field, if the model names one.
    #[must_use]
    pub const fn id_field(&self) -> Option<&'static EntityFieldModel> {
        E::MODEL.primary_key
    }
}

impl<E: EntityKey> Default for ReflectionEntityIdentity<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: EntityKey> fmt::Debug for ReflectionEntityIdentity<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReflectionEntityIdentity")
            .field("entity", &E::MODEL.entity_name)
            .field("primitive", &self.primitive.get())
            .finish()
    }
}

impl<E: EntityKey> EntityIdentity<E> for ReflectionEntityIdentity<E> {
    type Id = E::Key;
    type Error = Infallible;

    fn domain_type(&self) -> TypeToken {
        E::MODEL.domain_type()
    }

    fn id_type(&self) -> Option<TypeToken> {
        E::MODEL.id_type()
    }

    fn id(&self, entity: &E) -> Result<Option<Self::Id>, Self::Error> {
        Ok(entity.key())
    }

    fn id_type_is_primitive(&self) -> bool {
        self.primitive
            .get_or_init(|| is_numeric_primitive(self.id_type()))
    }
}
