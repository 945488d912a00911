//! Read surface shared by registries and foreign configurations.

use crate::provider::capability::Role;
use crate::provider::metadata::Scope;
use crate::provider::roles::Provider;
use crate::provider::type_key::TypeKey;
use serde_json::Value;
use std::any::Any;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Minimal view of a configuration.
///
/// Foreign implementations only need the first four methods; the defaults
/// derive the rest from the flat instance set.
pub trait Configuration {
    fn scope(&self) -> Scope;

    fn properties(&self) -> BTreeMap<String, Value>;

    fn instances(&self) -> Vec<Arc<dyn Provider>>;

    /// Enables same-kind detection when deriving a registry.
    fn as_any(&self) -> &dyn Any;

    fn get_property(&self, name: &str) -> Option<Value> {
        self.properties().get(name).cloned()
    }

    fn property_names(&self) -> Vec<String> {
        self.properties().into_keys().collect()
    }

    fn classes(&self) -> Vec<TypeKey> {
        self.instances()
            .iter()
            .map(|instance| instance.type_key())
            .collect()
    }

    /// Identity check against the stored instance of `provider`'s type.
    fn is_registered(&self, provider: &dyn Provider) -> bool {
        self.instances()
            .iter()
            .any(|instance| crate::provider::roles::same_instance(instance.as_ref(), provider))
    }

    fn is_type_registered(&self, key: TypeKey) -> bool {
        self.classes().contains(&key)
    }

    /// Contract map persisted for `key`; empty when none was supplied.
    fn contracts(&self, _key: TypeKey) -> BTreeMap<Role, i32> {
        BTreeMap::new()
    }

    fn is_enabled(&self, _feature: &dyn Provider) -> bool {
        false
    }

    fn is_feature_enabled(&self, _key: TypeKey) -> bool {
        false
    }
}
