//! Core runtime for repometa: recovering the concrete domain and identifier
//! types bound to a generic repository contract, entity identity and the
//! "is new" heuristic, dynamic targets, and typed factory customizers.
#![warn(unreachable_pub)]

pub mod config;
pub mod customize;
pub mod error;
pub mod identity;
pub mod model;
pub mod obs;
pub mod repository;
pub mod resolve;
pub mod target;
pub mod traits;
pub mod types;

use crate::types::TypeToken;

///
/// CONSTANTS
///

/// Built-in repository marker, `Repository<T, ID>`.
pub const REPOSITORY_MARKER: TypeToken = TypeToken::named("repometa::Repository");

/// Built-in customizer marker, `RepositoryFactoryCustomizer<F>`.
pub const CUSTOMIZER_MARKER: TypeToken = TypeToken::named("repometa::RepositoryFactoryCustomizer");

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, sinks, or config loaders are re-exported here.
///

pub mod prelude {
    pub use crate::{
        customize::{FactoryCustomizer, TypedCustomizer, TypedCustomizerMatcher},
        identity::{DelegatingIdentity, EntityIdentity, IdValue},
        model::{EntityFieldModel, EntityModel},
        repository::RepositoryDescriptor,
        resolve::TypeArgumentResolver,
        target::{DynamicTarget, TargetSource},
        traits::{EntityKey, Path, Typed},
        types::{GenericRef, TypeDecl, TypeHost, TypeRegistry, TypeToken},
    };
    pub use repometa_primitives::Primitive;
}
