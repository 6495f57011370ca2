//! Module: resolve
//! Responsibility: recover the concrete arguments a type binds to a generic
//! marker, by walking its declared hierarchy with a substitution map.
//! Does not own: the meaning of argument positions (see `repository`,
//! `customize`).
//!
//! Invariants:
//! - Resolution is all-or-nothing per argument list.
//! - The nearest fully concrete occurrence of the marker wins; a second
//!   concrete occurrence with different arguments is an error.
//! - The walk terminates on cyclic declarations.


use crate::{
    obs::sink::{self, MetricsEvent},
    types::{TypeArg, TypeHost, TypeToken},
};
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error as ThisError;

///
/// TypeResolutionError
///
/// A generic argument could not be resolved to a concrete type.
/// These are static declaration defects; retrying never helps.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
#[remain::sorted]
pub enum TypeResolutionError {
    #[error("type '{ty}' binds {found} argument(s) to '{marker}', expected {expected}")]
    ArityMismatch {
        ty: TypeToken,
        marker: TypeToken,
        expected: usize,
        found: usize,
    },

    #[error(
        "type '{ty}' binds '{marker}' divergently: <{}> vs <{}>",
        join_tokens(.first),
        join_tokens(.second)
    )]
    Divergent {
        ty: TypeToken,
        marker: TypeToken,
        first: Vec<TypeToken>,
        second: Vec<TypeToken>,
    },

    #[error("marker '{marker}' declares {found} type parameter(s), expected {expected}")]
    MarkerArity {
        marker: TypeToken,
        expected: usize,
        found: usize,
    },

    #[error("marker '{marker}' declares no type parameters")]
    NotGeneric { marker: TypeToken },

    #[error("type '{ty}' does not implement '{marker}'")]
    NotImplemented { ty: TypeToken, marker: TypeToken },

    #[error("type '{ty}' implements '{marker}' raw, without type arguments")]
    Raw { ty: TypeToken, marker: TypeToken },

    #[error(
        "type '{ty}' leaves argument {position} of '{marker}' bound to unresolved variable '{variable}'"
    )]
    Unbound {
        ty: TypeToken,
        marker: TypeToken,
        position: usize,
        variable: &'static str,
    },

    #[error("type '{ty}' is not declared")]
    UnknownType { ty: TypeToken },
}

fn join_tokens(tokens: &[TypeToken]) -> String {
    tokens
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

// variable -> concrete type, for the declaration currently being visited
type Bindings = HashMap<&'static str, TypeToken>;

// one argument after substitution: concrete, or still a named variable
type Substituted = Result<TypeToken, &'static str>;

///
/// TypeArgumentResolver
///
/// Borrowing view over a type host that answers "which concrete types does
/// `ty` bind to `marker`?".
///

pub struct TypeArgumentResolver<'a, H: TypeHost + ?Sized> {
    host: &'a H,
}

impl<'a, H: TypeHost + ?Sized> TypeArgumentResolver<'a, H> {
    #[must_use]
    pub const fn new(host: &'a H) -> Self {
        Self { host }
    }

    /// Resolve the ordered argument list `ty` binds to `marker`.
    pub fn resolve(
        &self,
        ty: TypeToken,
        marker: TypeToken,
    ) -> Result<Vec<TypeToken>, TypeResolutionError> {
        let result = self.resolve_inner(ty, marker);

        match &result {
            Ok(args) => {
                tracing::debug!(%ty, %marker, args = %join_tokens(args), "resolved type arguments");
            }
            Err(err) => {
                tracing::debug!(%ty, %marker, error = %err, "type argument resolution failed");
            }
        }
        sink::record(MetricsEvent::Resolution {
            ty,
            resolved: result.is_ok(),
        });

        result
    }

    /// Resolve the single argument `ty` binds to a one-parameter `marker`.
    pub fn resolve_single(
        &self,
        ty: TypeToken,
        marker: TypeToken,
    ) -> Result<TypeToken, TypeResolutionError> {
        let found = self.marker_arity(marker)?;
        if found != 1 {
            return Err(TypeResolutionError::MarkerArity {
                marker,
                expected: 1,
                found,
            });
        }

        let args = self.resolve(ty, marker)?;
        match args.as_slice() {
            [arg] => Ok(*arg),
            _ => Err(TypeResolutionError::ArityMismatch {
                ty,
                marker,
                expected: 1,
                found: args.len(),
            }),
        }
    }

    fn marker_arity(&self, marker: TypeToken) -> Result<usize, TypeResolutionError> {
        let decl = self
            .host
            .declaration(marker)
            .ok_or(TypeResolutionError::UnknownType { ty: marker })?;

        match decl.params().len() {
            0 => Err(TypeResolutionError::NotGeneric { marker }),
            n => Ok(n),
        }
    }

    fn resolve_inner(
        &self,
        ty: TypeToken,
        marker: TypeToken,
    ) -> Result<Vec<TypeToken>, TypeResolutionError> {
        let expected = self.marker_arity(marker)?;
        let occurrences = self.collect_occurrences(ty, marker);

        let mut chosen: Option<Vec<TypeToken>> = None;
        let mut first_defect: Option<TypeResolutionError> = None;

        for args in occurrences {
            match classify(&args, expected, ty, marker) {
                Ok(concrete) => {
                    if let Some(found) = &chosen {
                        if *found != concrete {
                            return Err(TypeResolutionError::Divergent {
                                ty,
                                marker,
                                first: found.clone(),
                                second: concrete,
                            });
                        }
                    } else {
                        chosen = Some(concrete);
                    }
                }
                Err(defect) => {
                    first_defect.get_or_insert(defect);
                }
            }
        }

        chosen.ok_or_else(|| {
            first_defect.unwrap_or(TypeResolutionError::NotImplemented { ty, marker })
        })
    }

    // Breadth-first walk from `ty`. Returns the substituted argument list of
    // every reference to `marker`, nearest level first, declaration order
    // within a level.
    fn collect_occurrences(&self, ty: TypeToken, marker: TypeToken) -> Vec<Vec<Substituted>> {
        let mut occurrences = Vec::new();
        let mut visited: HashSet<(TypeToken, Vec<Option<TypeToken>>)> = HashSet::new();
        let mut queue: VecDeque<(TypeToken, Bindings)> = VecDeque::from([(ty, Bindings::new())]);

        while let Some((current, bindings)) = queue.pop_front() {
            let Some(decl) = self.host.declaration(current) else {
                continue;
            };

            let key = (
                current,
                decl.params()
                    .iter()
                    .map(|param| bindings.get(param).copied())
                    .collect(),
            );
            if !visited.insert(key) {
                continue;
            }

            for supertype in decl.supertypes() {
                let args: Vec<Substituted> = supertype
                    .args
                    .iter()
                    .map(|arg| substitute(*arg, &bindings))
                    .collect();

                tracing::trace!(from = %current, to = %supertype, "hierarchy step");

                if supertype.raw == marker {
                    occurrences.push(args);
                    continue;
                }

                let parent_bindings: Bindings = self
                    .host
                    .declaration(supertype.raw)
                    .map(|parent| {
                        parent
                            .params()
                            .iter()
                            .zip(&args)
                            .filter_map(|(param, arg)| arg.ok().map(|t| (*param, t)))
                            .collect()
                    })
                    .unwrap_or_default();

                queue.push_back((supertype.raw, parent_bindings));
            }
        }

        occurrences
    }
}

/// Resolve the ordered argument list `ty` binds to `marker` against `host`.
pub fn resolve_type_arguments<H: TypeHost + ?Sized>(
    host: &H,
    ty: TypeToken,
    marker: TypeToken,
) -> Result<Vec<TypeToken>, TypeResolutionError> {
    TypeArgumentResolver::new(host).resolve(ty, marker)
}

/// Resolve the single argument `ty` binds to a one-parameter `marker`.
pub fn resolve_type_argument<H: TypeHost + ?Sized>(
    host: &H,
    ty: TypeToken,
    marker: TypeToken,
) -> Result<TypeToken, TypeResolutionError> {
    TypeArgumentResolver::new(host).resolve_single(ty, marker)
}

fn substitute(arg: TypeArg, bindings: &Bindings) -> Substituted {
    match arg {
        TypeArg::Concrete(ty) => Ok(ty),
        TypeArg::Var(name) => bindings.get(name).copied().ok_or(name),
    }
}

// Turn one occurrence into a concrete argument list, or name its defect.
fn classify(
    args: &[Substituted],
    expected: usize,
    ty: TypeToken,
    marker: TypeToken,
) -> Result<Vec<TypeToken>, TypeResolutionError> {
    if args.is_empty() {
        return Err(TypeResolutionError::Raw { ty, marker });
    }
    if args.len() != expected {
        return Err(TypeResolutionError::ArityMismatch {
            ty,
            marker,
            expected,
            found: args.len(),
        });
    }

    args.iter()
        .enumerate()
        .map(|(position, arg)| {
            arg.map_err(|variable| TypeResolutionError::Unbound {
                ty,
                marker,
                position,
                variable,
            })
        })
        .collect()
}
