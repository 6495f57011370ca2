//! Module: repository
//! Responsibility: derive the domain and identifier types of a declared
//! repository contract.
//! Does not own: descriptor caching; callers key descriptors by interface.
//!
//! Invariants:
//! - A constructed descriptor always carries both resolved types.
//! - Descriptors are immutable and `Copy`.


use crate::{
    REPOSITORY_MARKER,
    error::ConfigurationError,
    obs::sink::{self, MetricsEvent},
    resolve::{TypeArgumentResolver, TypeResolutionError},
    types::{TypeHost, TypeToken},
};

// Repository<T, ID>
const MARKER_ARITY: usize = 2;
const ID_POSITION: usize = 1;

///
/// RepositoryDescriptor
///
/// Resolved metadata for one repository contract: the contract itself, the
/// domain type it manages, and that type's identifier type.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RepositoryDescriptor {
    repository_interface: TypeToken,
    domain_type: TypeToken,
    id_type: TypeToken,
}

impl RepositoryDescriptor {
    /// Build a descriptor against the built-in `Repository<T, ID>` marker.
    pub fn create<H: TypeHost + ?Sized>(
        host: &H,
        repository_interface: TypeToken,
    ) -> Result<Self, ConfigurationError> {
        Self::create_with_marker(host, repository_interface, REPOSITORY_MARKER)
    }

    /// Build a descriptor against a caller-chosen two-parameter marker.
    pub fn create_with_marker<H: TypeHost + ?Sized>(
        host: &H,
        repository_interface: TypeToken,
        marker: TypeToken,
    ) -> Result<Self, ConfigurationError> {
        let found = host.declaration(marker).map_or(0, |decl| decl.params().len());
        if found != MARKER_ARITY {
            return Err(ConfigurationError::MarkerArity {
                marker,
                expected: MARKER_ARITY,
                found,
            });
        }

        // hierarchy test only; arguments are checked by resolution below
        if !host.is_assignable(repository_interface, marker) {
            return Err(ConfigurationError::MissingMarker {
                ty: repository_interface,
                marker,
            });
        }

        let args = TypeArgumentResolver::new(host)
            .resolve(repository_interface, marker)
            .map_err(|source| unresolved(repository_interface, source))?;

        let descriptor = match args.as_slice() {
            [domain_type, id_type] => Self {
                repository_interface,
                domain_type: *domain_type,
                id_type: *id_type,
            },
            _ => {
                return Err(unresolved(
                    repository_interface,
                    TypeResolutionError::ArityMismatch {
                        ty: repository_interface,
                        marker,
                        expected: MARKER_ARITY,
                        found: args.len(),
                    },
                ));
            }
        };

        tracing::debug!(
            repository = %repository_interface,
            domain = %descriptor.domain_type,
            id = %descriptor.id_type,
            "created repository descriptor"
        );
        sink::record(MetricsEvent::DescriptorCreated {
            repository: repository_interface,
        });

        Ok(descriptor)
    }

    #[must_use]
    pub const fn repository_interface(&self) -> TypeToken {
        self.repository_interface
    }

    #[must_use]
    pub const fn domain_type(&self) -> TypeToken {
        self.domain_type
    }

    #[must_use]
    pub const fn id_type(&self) -> TypeToken {
        self.id_type
    }
}

// Name the argument that failed; anything not pinned to the id slot is
// reported against the domain type.
fn unresolved(repository: TypeToken, source: TypeResolutionError) -> ConfigurationError {
    let id_failed = match &source {
        TypeResolutionError::Unbound { position, .. } => *position == ID_POSITION,
        // occurrences that agree on the domain type only disagree on the id
        TypeResolutionError::Divergent { first, second, .. } => first.first() == second.first(),
        _ => false,
    };

    if id_failed {
        ConfigurationError::UnresolvedIdType { repository, source }
    } else {
        ConfigurationError::UnresolvedDomainType { repository, source }
    }
}
