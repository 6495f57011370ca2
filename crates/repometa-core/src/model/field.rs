use crate::types::TypeToken;

///
/// EntityFieldModel
/// Runtime field metadata: name and declared type.
///

#[derive(Debug)]
pub struct EntityFieldModel {
    /// Field name as declared on the entity.
    pub name: &'static str,
    /// Declared type. A primitive here means the field can never be absent.
    pub ty: TypeToken,
}

impl EntityFieldModel {
    #[must_use]
    pub const fn new(name: &'static str, ty: TypeToken) -> Self {
        Self { name, ty }
    }
}
