//! Runtime entity models.
//!
//! A model is the static description an entity type carries about itself:
//! its path, its fields, and which field is the designated identifier.
//! Reflection-backed identity reads these instead of inspecting the value.
pub mod entity;
pub mod field;

pub use entity::EntityModel;
pub use field::EntityFieldModel;
