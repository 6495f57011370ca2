use crate::{
    config::ConfigError, resolve::TypeResolutionError, types::RegistryError, types::TypeToken,
};
use std::fmt;
use thiserror::Error as ThisError;

///
/// Error
///
/// Crate-level error for callers that wire several stages together.
/// Each stage returns its own error type; this only unifies them.
///

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    TypeResolution(#[from] TypeResolutionError),
}

impl Error {
    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Config(_) | Self::Configuration(_) => ErrorClass::Configuration,
            Self::Registry(_) => ErrorClass::Registry,
            Self::TypeResolution(_) => ErrorClass::TypeResolution,
        }
    }
}

///
/// ConfigurationError
///
/// A declared contract is malformed with respect to the fixed-arity
/// expectations of descriptors and matchers. Raised at wiring time.
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum ConfigurationError {
    #[error("customizer '{customizer}' must bind exactly one type parameter of '{marker}', found {found}")]
    CustomizerArity {
        customizer: TypeToken,
        marker: TypeToken,
        found: usize,
    },

    #[error("marker '{marker}' must declare {expected} type parameter(s), found {found}")]
    MarkerArity {
        marker: TypeToken,
        expected: usize,
        found: usize,
    },

    #[error("delegating identity requires a delegate")]
    MissingDelegate,

    #[error("type '{ty}' must be a subtype of '{marker}'")]
    MissingMarker { ty: TypeToken, marker: TypeToken },

    #[error("could not resolve the bound type of customizer '{customizer}'")]
    UnboundCustomizer {
        customizer: TypeToken,
        #[source]
        source: TypeResolutionError,
    },

    #[error("marker type '{path}' is not declared")]
    UnknownMarker { path: String },

    #[error("could not resolve domain type of '{repository}'")]
    UnresolvedDomainType {
        repository: TypeToken,
        #[source]
        source: TypeResolutionError,
    },

    #[error("could not resolve id type of '{repository}'")]
    UnresolvedIdType {
        repository: TypeToken,
        #[source]
        source: TypeResolutionError,
    },
}

///
/// ErrorClass
/// Coarse error taxonomy for callers that only need to branch on kind.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    Configuration,
    Registry,
    TypeResolution,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Configuration => "configuration",
            Self::Registry => "registry",
            Self::TypeResolution => "type_resolution",
        };
        write!(f, "{label}")
    }
}
