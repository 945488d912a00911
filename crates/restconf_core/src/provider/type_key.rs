//! Type identity keys for deduplication and typed dispatch tables.
//!
//! # Invariants
//! - `TypeKey::of::<T>()` is equal for every call with the same `T`.
//! - `TypeKey::Wildcard` never equals an exact key.

use crate::provider::capability::Role;
use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};

/// Identity of a concrete type, or the universal wildcard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TypeKey {
    Exact {
        id: TypeId,
        name: &'static str,
    },
    /// Used when a typed role carries no resolvable type argument.
    Wildcard,
}

impl TypeKey {
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Exact {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    pub fn wildcard() -> Self {
        Self::Wildcard
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Wildcard)
    }

    /// Human-readable type name, `*` for the wildcard.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Exact { name, .. } => name,
            Self::Wildcard => "*",
        }
    }
}

impl Display for TypeKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolves the type argument a concrete provider type binds for a typed role.
///
/// Returns `None` when the argument is unknown; the registry then files the
/// provider under [`TypeKey::Wildcard`].
pub trait TypeArgumentResolver: Send + Sync {
    fn resolve(&self, concrete: TypeKey, role: Role) -> Option<TypeKey>;
}

/// Resolver that never knows anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnresolvedTypeArguments;

impl TypeArgumentResolver for UnresolvedTypeArguments {
    fn resolve(&self, _concrete: TypeKey, _role: Role) -> Option<TypeKey> {
        None
    }
}

/// Lookup table of `(concrete type, role) -> type argument` bindings.
#[derive(Debug, Clone, Default)]
pub struct StaticTypeArguments {
    bindings: BTreeMap<(TypeKey, Role), TypeKey>,
}

impl StaticTypeArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares that provider type `P` binds `A` for `role`.
    pub fn bind<P: 'static, A: ?Sized + 'static>(mut self, role: Role) -> Self {
        self.bindings
            .insert((TypeKey::of::<P>(), role), TypeKey::of::<A>());
        self
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl TypeArgumentResolver for StaticTypeArguments {
    fn resolve(&self, concrete: TypeKey, role: Role) -> Option<TypeKey> {
        self.bindings.get(&(concrete, role)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::{StaticTypeArguments, TypeArgumentResolver, TypeKey, UnresolvedTypeArguments};
    use crate::provider::capability::Role;

    struct JsonReader;

    #[test]
    fn keys_compare_by_type_identity() {
        assert_eq!(TypeKey::of::<String>(), TypeKey::of::<String>());
        assert_ne!(TypeKey::of::<String>(), TypeKey::of::<u32>());
        assert_ne!(TypeKey::of::<String>(), TypeKey::wildcard());
        assert!(TypeKey::wildcard().is_wildcard());
        assert_eq!(TypeKey::wildcard().name(), "*");
        assert!(TypeKey::of::<String>().name().ends_with("String"));
    }

    #[test]
    fn static_table_resolves_only_declared_bindings() {
        let table = StaticTypeArguments::new().bind::<JsonReader, String>(Role::BodyReader);
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.resolve(TypeKey::of::<JsonReader>(), Role::BodyReader),
            Some(TypeKey::of::<String>())
        );
        assert_eq!(
            table.resolve(TypeKey::of::<JsonReader>(), Role::BodyWriter),
            None
        );
        assert_eq!(
            UnresolvedTypeArguments.resolve(TypeKey::of::<JsonReader>(), Role::BodyReader),
            None
        );
    }
}
