//! Class references: zero-argument factories for providers.

use crate::provider::roles::Provider;
use crate::provider::type_key::TypeKey;
use crate::registry::error::{RegistryError, RegistryResult};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

type Constructor = Arc<dyn Fn() -> Result<Arc<dyn Provider>, String> + Send + Sync>;

/// Reference to a provider type that the registry instantiates on demand.
#[derive(Clone)]
pub struct ProviderClass {
    key: TypeKey,
    constructor: Constructor,
}

impl ProviderClass {
    /// Class whose zero-argument constructor is `Default`.
    pub fn of<T: Provider + Default>() -> Self {
        Self {
            key: TypeKey::of::<T>(),
            constructor: Arc::new(|| Ok(Arc::new(T::default()) as Arc<dyn Provider>)),
        }
    }

    /// Class with a fallible zero-argument constructor.
    pub fn from_fn<T, F>(constructor: F) -> Self
    where
        T: Provider,
        F: Fn() -> Result<T, String> + Send + Sync + 'static,
    {
        Self {
            key: TypeKey::of::<T>(),
            constructor: Arc::new(move || {
                constructor().map(|instance| Arc::new(instance) as Arc<dyn Provider>)
            }),
        }
    }

    pub fn type_key(&self) -> TypeKey {
        self.key
    }

    /// Runs the constructor.
    ///
    /// # Errors
    /// - `RegistryError::Instantiation` when the constructor fails.
    pub fn instantiate(&self) -> RegistryResult<Arc<dyn Provider>> {
        (self.constructor)().map_err(|reason| {
            log::error!(
                "event=provider_instantiate module=registry status=error type={} reason={}",
                self.key,
                reason
            );
            RegistryError::Instantiation {
                type_name: self.key.name(),
                reason,
            }
        })
    }
}

impl Debug for ProviderClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderClass")
            .field("key", &self.key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::ProviderClass;
    use crate::provider::roles::Provider;
    use crate::provider::type_key::TypeKey;
    use crate::registry::error::RegistryError;

    #[derive(Default)]
    struct Plain;
    impl Provider for Plain {}

    struct NeedsArgs;
    impl Provider for NeedsArgs {}

    #[test]
    fn default_class_instantiates_concrete_type() {
        let class = ProviderClass::of::<Plain>();
        let instance = class.instantiate().expect("default constructor");
        assert_eq!(instance.type_key(), TypeKey::of::<Plain>());
        assert_eq!(class.type_key(), TypeKey::of::<Plain>());
    }

    #[test]
    fn failing_constructor_reports_instantiation_error() {
        let class = ProviderClass::from_fn::<NeedsArgs, _>(|| Err("no default".to_string()));
        let err = class.instantiate().err().expect("constructor must fail");
        match err {
            RegistryError::Instantiation { type_name, reason } => {
                assert!(type_name.ends_with("NeedsArgs"));
                assert_eq!(reason, "no default");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
