//! Foundational traits shared by entities, factories, and customizers.

use crate::{identity::IdValue, model::EntityModel, types::TypeToken};

///
/// Path
/// Fully-qualified type path.
///

pub trait Path {
    const PATH: &'static str;
}

///
/// Typed
///
/// Exposes the runtime type of a value so the type host can answer
/// "is instance of" without language-level reflection.
///

pub trait Typed {
    fn type_token(&self) -> TypeToken;
}

///
/// EntityKey
///
/// Associates an entity with its static model and its primary-key accessor.
///
/// ## Semantics
/// - `MODEL.primary_key` names the designated identifier field, if any
/// - `key()` returns `None` when the identifier is unset
///

pub trait EntityKey: Path {
    type Key: IdValue;

    const MODEL: &'static EntityModel;

    fn key(&self) -> Option<Self::Key>;
}
