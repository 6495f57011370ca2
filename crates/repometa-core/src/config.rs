//! Module: config
//! Responsibility: load wiring configuration from TOML and resolve the
//! configured marker paths against a type host.
//! Does not own: marker semantics (see `repository`, `customize`).

use crate::{
    CUSTOMIZER_MARKER, REPOSITORY_MARKER, error::ConfigurationError,
    types::{TypeHost, TypeToken},
};
use serde::Deserialize;
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid repometa config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// CoreConfig
///
/// Marker type paths used when building descriptors and customizer
/// bindings. Both default to the built-in markers.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct CoreConfig {
    pub repository_marker: String,
    pub customizer_marker: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            repository_marker: REPOSITORY_MARKER.path().to_string(),
            customizer_marker: CUSTOMIZER_MARKER.path().to_string(),
        }
    }
}

impl CoreConfig {
    /// Parse a config document. Missing keys take their defaults.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config = toml::from_str(source)?;

        Ok(config)
    }

    /// Resolve both marker paths against `host`.
    pub fn markers(&self, host: &(impl TypeHost + ?Sized)) -> Result<Markers, ConfigurationError> {
        Ok(Markers {
            repository: lookup_marker(host, &self.repository_marker)?,
            customizer: lookup_marker(host, &self.customizer_marker)?,
        })
    }
}

fn lookup_marker(
    host: &(impl TypeHost + ?Sized),
    path: &str,
) -> Result<TypeToken, ConfigurationError> {
    host.lookup(path)
        .ok_or_else(|| ConfigurationError::UnknownMarker {
            path: path.to_string(),
        })
}

///
/// Markers
/// Resolved marker tokens.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Markers {
    pub repository: TypeToken,
    pub customizer: TypeToken,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            repository: REPOSITORY_MARKER,
            customizer: CUSTOMIZER_MARKER,
        }
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::Error,
        types::{TypeDecl, TypeRegistry},
    };

    #[test]
    fn empty_document_uses_builtin_markers() {
        let config = CoreConfig::from_toml_str("").unwrap();
        assert_eq!(config, CoreConfig::default());

        let markers = config.markers(&TypeRegistry::with_markers()).unwrap();
        assert_eq!(markers, Markers::default());
    }

    #[test]
    fn custom_markers_resolve_through_host() {
        let mut registry = TypeRegistry::with_markers();
        registry
            .declare(TypeDecl::interface("app::Store").param("T").param("K"))
            .unwrap();

        let config = CoreConfig::from_toml_str(r#"repository_marker = "app::Store""#).unwrap();
        let markers = config.markers(&registry).unwrap();

        assert_eq!(markers.repository, TypeToken::named("app::Store"));
        assert_eq!(markers.customizer, CUSTOMIZER_MARKER);
    }

    #[test]
    fn undeclared_marker_is_rejected() {
        let config = CoreConfig::from_toml_str(r#"customizer_marker = "app::Nope""#).unwrap();

        let err = config.markers(&TypeRegistry::with_markers()).unwrap_err();
        assert!(matches!(err, ConfigurationError::UnknownMarker { ref path } if path == "app::Nope"));
    }

    #[test]
    fn unknown_keys_fail_to_parse() {
        let err = CoreConfig::from_toml_str("marker = 1").unwrap_err();
        assert_eq!(Error::from(err).class(), crate::error::ErrorClass::Configuration);
    }
}
