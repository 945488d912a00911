//! Forwarding context handed to a feature during activation.

use crate::provider::capability::Role;
use crate::provider::class::ProviderClass;
use crate::provider::roles::Provider;
use crate::registry::error::RegistryResult;
use crate::registry::provider_registry::ProviderRegistry;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Mutating view of one registry, valid while a feature configures itself.
///
/// Every method forwards to the identically named registry method and
/// returns the context for chaining. It holds no state of its own.
pub struct FeatureContext<'a> {
    registry: &'a mut ProviderRegistry,
}

impl<'a> FeatureContext<'a> {
    pub(crate) fn new(registry: &'a mut ProviderRegistry) -> Self {
        Self { registry }
    }

    /// The registry being configured, including registrations made so far.
    pub fn configuration(&self) -> &ProviderRegistry {
        self.registry
    }

    pub fn property(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.registry.property(name, value);
        self
    }

    pub fn register(&mut self, provider: Arc<dyn Provider>) -> RegistryResult<&mut Self> {
        self.registry.register(provider)?;
        Ok(self)
    }

    pub fn register_with_priority(
        &mut self,
        provider: Arc<dyn Provider>,
        priority: i32,
    ) -> RegistryResult<&mut Self> {
        self.registry.register_with_priority(provider, priority)?;
        Ok(self)
    }

    pub fn register_with_roles(
        &mut self,
        provider: Arc<dyn Provider>,
        roles: &[Role],
    ) -> RegistryResult<&mut Self> {
        self.registry.register_with_roles(provider, roles)?;
        Ok(self)
    }

    pub fn register_with_contracts(
        &mut self,
        provider: Arc<dyn Provider>,
        contracts: &BTreeMap<Role, i32>,
    ) -> RegistryResult<&mut Self> {
        self.registry.register_with_contracts(provider, contracts)?;
        Ok(self)
    }

    pub fn register_class(&mut self, class: &ProviderClass) -> RegistryResult<&mut Self> {
        self.registry.register_class(class)?;
        Ok(self)
    }

    pub fn register_class_with_priority(
        &mut self,
        class: &ProviderClass,
        priority: i32,
    ) -> RegistryResult<&mut Self> {
        self.registry.register_class_with_priority(class, priority)?;
        Ok(self)
    }

    pub fn register_class_with_roles(
        &mut self,
        class: &ProviderClass,
        roles: &[Role],
    ) -> RegistryResult<&mut Self> {
        self.registry.register_class_with_roles(class, roles)?;
        Ok(self)
    }

    pub fn register_class_with_contracts(
        &mut self,
        class: &ProviderClass,
        contracts: &BTreeMap<Role, i32>,
    ) -> RegistryResult<&mut Self> {
        self.registry
            .register_class_with_contracts(class, contracts)?;
        Ok(self)
    }
}
