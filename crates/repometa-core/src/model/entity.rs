use crate::{model::field::EntityFieldModel, types::TypeToken};

///
/// EntityModel
/// Static runtime model for one entity type.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Fully-qualified Rust type path (for dispatch and diagnostics).
    pub path: &'static str,
    /// Stable external name.
    pub entity_name: &'static str,
    /// Designated identifier field (points at an entry in `fields`).
    pub primary_key: Option<&'static EntityFieldModel>,
    /// Ordered field list.
    pub fields: &'static [EntityFieldModel],
}

impl EntityModel {
    #[must_use]
    pub const fn domain_type(&self) -> TypeToken {
        TypeToken::Named(self.path)
    }

    /// Declared type of the identifier field, if the entity has one.
    #[must_use]
    pub const fn id_type(&self) -> Option<TypeToken> {
        match self.primary_key {
            Some(field) => Some(field.ty),
            None => None,
        }
    }

    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static EntityFieldModel> {
        let fields: &'static [EntityFieldModel] = self.fields;
        fields.iter().find(|field| field.name == name)
    }
}
