use crate::{
    CUSTOMIZER_MARKER, REPOSITORY_MARKER,
    traits::Typed,
    types::{DeclKind, GenericRef, TypeArg, TypeDecl, TypeToken},
};
use repometa_primitives::Primitive;
use std::collections::{HashMap, HashSet, VecDeque};
use thiserror::Error as ThisError;

///
/// TypeHost
///
/// Type-introspection capability: declared supertypes with their generic
/// parameterizations, plus assignability and "is instance of" predicates.
///

pub trait TypeHost: Send + Sync {
    /// Declaration of one named type, if known. Primitives have none.
    fn declaration(&self, ty: TypeToken) -> Option<&TypeDecl>;

    /// Resolve a path (or primitive spelling) to its token.
    fn lookup(&self, path: &str) -> Option<TypeToken>;

    /// Whether `from` is `to` or transitively extends it.
    ///
    /// This is a plain hierarchy test; it never looks at type arguments.
    fn is_assignable(&self, from: TypeToken, to: TypeToken) -> bool {
        if from == to {
            return true;
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([from]);

        while let Some(ty) = queue.pop_front() {
            if !seen.insert(ty) {
                continue;
            }
            let Some(decl) = self.declaration(ty) else {
                continue;
            };
            for supertype in decl.supertypes() {
                if supertype.raw == to {
                    return true;
                }
                queue.push_back(supertype.raw);
            }
        }

        false
    }

    /// Whether the runtime type of `value` is assignable to `ty`.
    fn is_instance(&self, value: &dyn Typed, ty: TypeToken) -> bool {
        self.is_assignable(value.type_token(), ty)
    }
}

///
/// RegistryError
///

#[derive(Debug, ThisError)]
#[remain::sorted]
pub enum RegistryError {
    #[error("type '{0}' already declared")]
    AlreadyDeclared(TypeToken),

    #[error("type '{ty}' passes {found} argument(s) to '{supertype}', which declares {expected}")]
    ArityMismatch {
        ty: TypeToken,
        supertype: TypeToken,
        expected: usize,
        found: usize,
    },

    #[error("type '{ty}' declares type variable '{variable}' more than once")]
    DuplicateVariable {
        ty: TypeToken,
        variable: &'static str,
    },

    #[error("primitive '{0}' cannot be declared or extended")]
    Primitive(Primitive),

    #[error("type '{ty}' references undeclared type variable '{variable}'")]
    UnknownVariable {
        ty: TypeToken,
        variable: &'static str,
    },
}

///
/// TypeRegistry
///
/// The default `TypeHost`: an in-memory table of type declarations.
/// Built once at wiring time, then shared read-only.
///

#[derive(Clone, Debug, Default)]
pub struct TypeRegistry {
    decls: HashMap<&'static str, TypeDecl>,
}

impl TypeRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in markers:
    /// `Repository<T, ID>` and `RepositoryFactoryCustomizer<F>`.
    #[must_use]
    pub fn with_markers() -> Self {
        let mut registry = Self::new();
        registry.insert(
            TypeDecl::new(REPOSITORY_MARKER, DeclKind::Interface)
                .param("T")
                .param("ID"),
        );
        registry.insert(
            TypeDecl::new(CUSTOMIZER_MARKER, DeclKind::Interface).param("F"),
        );

        registry
    }

    /// Validate and register one declaration.
    ///
    /// Supertypes need not be declared yet; argument counts are only checked
    /// against supertypes that are.
    pub fn declare(&mut self, decl: TypeDecl) -> Result<TypeToken, RegistryError> {
        let token = decl.token();
        let path = match token {
            TypeToken::Named(path) => path,
            TypeToken::Primitive(kind) => return Err(RegistryError::Primitive(kind)),
        };
        if self.decls.contains_key(path) {
            return Err(RegistryError::AlreadyDeclared(token));
        }

        let mut params = HashSet::new();
        for &variable in decl.params() {
            if !params.insert(variable) {
                return Err(RegistryError::DuplicateVariable {
                    ty: token,
                    variable,
                });
            }
        }

        for supertype in decl.supertypes() {
            self.validate_supertype(token, &params, supertype)?;
        }

        tracing::trace!(ty = %token, supertypes = decl.supertypes().len(), "declared type");
        self.insert(decl);

        Ok(token)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Iterate registered declarations in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &TypeDecl> {
        self.decls.values()
    }

    fn validate_supertype(
        &self,
        ty: TypeToken,
        params: &HashSet<&'static str>,
        supertype: &GenericRef,
    ) -> Result<(), RegistryError> {
        if let TypeToken::Primitive(kind) = supertype.raw {
            return Err(RegistryError::Primitive(kind));
        }

        for arg in &supertype.args {
            if let TypeArg::Var(variable) = *arg
                && !params.contains(variable)
            {
                return Err(RegistryError::UnknownVariable { ty, variable });
            }
        }

        // raw usage is always allowed
        if let Some(parent) = self.declaration(supertype.raw)
            && !supertype.is_raw()
            && supertype.args.len() != parent.params().len()
        {
            return Err(RegistryError::ArityMismatch {
                ty,
                supertype: supertype.raw,
                expected: parent.params().len(),
                found: supertype.args.len(),
            });
        }

        Ok(())
    }

    fn insert(&mut self, decl: TypeDecl) {
        self.decls.insert(decl.token().path(), decl);
    }
}

impl TypeHost for TypeRegistry {
    fn declaration(&self, ty: TypeToken) -> Option<&TypeDecl> {
        match ty {
            TypeToken::Named(path) => self.decls.get(path),
            TypeToken::Primitive(_) => None,
        }
    }

    fn lookup(&self, path: &str) -> Option<TypeToken> {
        Primitive::from_name(path)
            .map(TypeToken::Primitive)
            .or_else(|| self.decls.get(path).map(TypeDecl::token))
    }
}
