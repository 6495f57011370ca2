//! Module: customize
//! Responsibility: let factory customizers declare, through their own
//! generic signature, which factory type they apply to.
//! Does not own: factory construction beyond running eligible customizers.
//!
//! Invariants:
//! - A binding resolves exactly one concrete bound type, or fails at
//!   construction time.
//! - Matching is a runtime assignability check against that bound type.


use crate::{
    CUSTOMIZER_MARKER,
    error::ConfigurationError,
    obs::sink::{self, MetricsEvent},
    resolve::TypeArgumentResolver,
    traits::Typed,
    types::{TypeHost, TypeToken},
};
use std::{fmt, sync::Arc};

///
/// FactoryCustomizer
///
/// Hook invoked by the factory-construction pipeline, once per candidate
/// customizer per repository being built.
///

pub trait FactoryCustomizer<F: ?Sized> {
    fn can_customize(&self, _factory: &F, _repository_interface: TypeToken) -> bool {
        true
    }

    fn customize(&self, factory: &mut F);
}

///
/// CustomizerBinding
/// A customizer type paired with the single factory type it is bound to.
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct CustomizerBinding {
    customizer: TypeToken,
    bound: TypeToken,
}

impl CustomizerBinding {
    /// Resolve the one type argument `customizer` binds to `marker`.
    pub fn resolve<H: TypeHost + ?Sized>(
        host: &H,
        customizer: TypeToken,
        marker: TypeToken,
    ) -> Result<Self, ConfigurationError> {
        let found = host.declaration(marker).map_or(0, |decl| decl.params().len());
        if found != 1 {
            return Err(ConfigurationError::CustomizerArity {
                customizer,
                marker,
                found,
            });
        }

        let bound = TypeArgumentResolver::new(host)
            .resolve_single(customizer, marker)
            .map_err(|source| ConfigurationError::UnboundCustomizer { customizer, source })?;

        tracing::debug!(%customizer, %bound, "bound customizer");

        Ok(Self { customizer, bound })
    }

    #[must_use]
    pub const fn customizer(&self) -> TypeToken {
        self.customizer
    }

    #[must_use]
    pub const fn bound(&self) -> TypeToken {
        self.bound
    }
}

///
/// TypedCustomizerMatcher
///
/// Answers whether a candidate factory is an instance of the type a
/// customizer bound itself to. Immutable and shareable across threads.
///

#[derive(Clone)]
pub struct TypedCustomizerMatcher {
    binding: CustomizerBinding,
    host: Arc<dyn TypeHost>,
}

impl TypedCustomizerMatcher {
    /// Bind against the built-in `RepositoryFactoryCustomizer<F>` marker.
    pub fn new(host: Arc<dyn TypeHost>, customizer: TypeToken) -> Result<Self, ConfigurationError> {
        Self::with_marker(host, customizer, CUSTOMIZER_MARKER)
    }

    pub fn with_marker(
        host: Arc<dyn TypeHost>,
        customizer: TypeToken,
        marker: TypeToken,
    ) -> Result<Self, ConfigurationError> {
        let binding = CustomizerBinding::resolve(host.as_ref(), customizer, marker)?;

        Ok(Self { binding, host })
    }

    #[must_use]
    pub const fn binding(&self) -> CustomizerBinding {
        self.binding
    }

    /// `repository_interface` does not take part in the decision.
    #[must_use]
    pub fn can_customize(&self, candidate: &dyn Typed, repository_interface: TypeToken) -> bool {
        let matched = self.host.is_instance(candidate, self.binding.bound);
        tracing::trace!(
            customizer = %self.binding.customizer,
            candidate = %candidate.type_token(),
            repository = %repository_interface,
            matched,
            "matched customizer"
        );

        matched
    }
}

impl fmt::Debug for TypedCustomizerMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedCustomizerMatcher")
            .field("binding", &self.binding)
            .finish_non_exhaustive()
    }
}

///
/// TypedCustomizer
///
/// A user customizer filtered by its declared factory type.
/// Eligible only when the matcher and the inner customizer both agree.
///

#[derive(Debug)]
pub struct TypedCustomizer<C> {
    matcher: TypedCustomizerMatcher,
    inner: C,
}

impl<C> TypedCustomizer<C> {
    #[must_use]
    pub const fn new(matcher: TypedCustomizerMatcher, inner: C) -> Self {
        Self { matcher, inner }
    }

    #[must_use]
    pub const fn matcher(&self) -> &TypedCustomizerMatcher {
        &self.matcher
    }

    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.inner
    }
}

impl<F: Typed, C: FactoryCustomizer<F>> FactoryCustomizer<F> for TypedCustomizer<C> {
    fn can_customize(&self, factory: &F, repository_interface: TypeToken) -> bool {
        self.matcher.can_customize(factory, repository_interface)
            && self.inner.can_customize(factory, repository_interface)
    }

    fn customize(&self, factory: &mut F) {
        self.inner.customize(factory);
    }
}

/// Apply every eligible customizer to `factory`, in order.
///
/// Returns how many customizers ran.
pub fn customize_factory<F: ?Sized>(
    factory: &mut F,
    repository_interface: TypeToken,
    customizers: &[&dyn FactoryCustomizer<F>],
) -> usize {
    let mut applied = 0;

    for customizer in customizers {
        if customizer.can_customize(factory, repository_interface) {
            customizer.customize(factory);
            applied += 1;
            sink::record(MetricsEvent::CustomizerApplied {
                repository: repository_interface,
            });
        } else {
            sink::record(MetricsEvent::CustomizerSkipped {
                repository: repository_interface,
            });
        }
    }

    tracing::debug!(
        repository = %repository_interface,
        applied,
        skipped = customizers.len() - applied,
        "customized repository factory"
    );

    applied
}
