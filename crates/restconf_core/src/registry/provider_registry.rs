//! Capability-typed, priority-ordered provider registry.
//!
//! # Responsibility
//! - Classify registered providers by declared role and file each role into
//!   its own ordered chain or typed table.
//! - Activate features in place, letting them register more providers.
//! - Derive independent snapshots for callers that need to diverge.
//!
//! # Invariants
//! - One registration per concrete type; repeats are silent no-ops.
//! - Response filters and writer interceptors flatten in descending priority,
//!   request filters and reader interceptors in ascending priority.
//! - A clone never observes mutations of its source, and vice versa.
//! - Mutation is single-threaded; concurrent reads after assembly are safe.

use crate::collections::priority_map::PriorityOrderedMultiMap;
use crate::collections::typed_table::CapabilityTypedTable;
use crate::media_type::wildcard_list;
use crate::options::RegistryOptions;
use crate::provider::capability::{Role, Typed};
use crate::provider::class::ProviderClass;
use crate::provider::metadata::Scope;
use crate::provider::priority::resolve_declared_priority;
use crate::provider::roles::{
    same_instance, Feature, Provider, ReactiveInvokerProvider, ReaderInterceptor, RequestFilter,
    ResponseFilter, WriterInterceptor,
};
use crate::provider::type_key::{TypeArgumentResolver, TypeKey, UnresolvedTypeArguments};
use crate::registry::configuration::Configuration;
use crate::registry::description::{RegistryDescription, TypedEntryDescription};
use crate::registry::entry::{ResourceReader, ResourceWriter};
use crate::registry::error::RegistryResult;
use crate::registry::feature_context::FeatureContext;
use log::{debug, info, trace};
use serde_json::Value;
use std::any::Any;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

#[derive(Clone)]
struct EnabledFeature {
    key: TypeKey,
    feature: Arc<dyn Feature>,
}

/// Which roles a registration call files, and at what priority.
#[derive(Clone, Copy)]
enum Selection<'c> {
    /// Every declared role; `None` resolves the provider's own priority.
    All(Option<i32>),
    /// Only roles present in the map, at the mapped priority.
    Contracts(&'c BTreeMap<Role, i32>),
}

impl Selection<'_> {
    fn priority(self, role: Role, declared: i32) -> Option<i32> {
        match self {
            Self::All(explicit) => Some(explicit.unwrap_or(declared)),
            Self::Contracts(contracts) => contracts.get(&role).copied(),
        }
    }
}

/// Provider registry for one client or server configuration.
pub struct ProviderRegistry {
    scope: Scope,
    properties: BTreeMap<String, Value>,
    instances: BTreeMap<TypeKey, Arc<dyn Provider>>,
    enabled_features: Vec<EnabledFeature>,
    contracts: BTreeMap<TypeKey, BTreeMap<Role, i32>>,
    request_filters: PriorityOrderedMultiMap<Arc<dyn RequestFilter>>,
    response_filters: PriorityOrderedMultiMap<Arc<dyn ResponseFilter>>,
    writer_interceptors: PriorityOrderedMultiMap<Arc<dyn WriterInterceptor>>,
    reader_interceptors: PriorityOrderedMultiMap<Arc<dyn ReaderInterceptor>>,
    resource_readers: CapabilityTypedTable<ResourceReader>,
    resource_writers: CapabilityTypedTable<ResourceWriter>,
    reactive_invokers: CapabilityTypedTable<Arc<dyn ReactiveInvokerProvider>>,
    type_arguments: Arc<dyn TypeArgumentResolver>,
    // Types whose feature activation is on the stack. Never cloned.
    activating: BTreeSet<TypeKey>,
}

impl Clone for ProviderRegistry {
    /// Snapshot of every registration. Activations still running on the
    /// source belong to the source's call stack, so the copy starts idle.
    fn clone(&self) -> Self {
        Self {
            scope: self.scope,
            properties: self.properties.clone(),
            instances: self.instances.clone(),
            enabled_features: self.enabled_features.clone(),
            contracts: self.contracts.clone(),
            request_filters: self.request_filters.clone(),
            response_filters: self.response_filters.clone(),
            writer_interceptors: self.writer_interceptors.clone(),
            reader_interceptors: self.reader_interceptors.clone(),
            resource_readers: self.resource_readers.clone(),
            resource_writers: self.resource_writers.clone(),
            reactive_invokers: self.reactive_invokers.clone(),
            type_arguments: Arc::clone(&self.type_arguments),
            activating: BTreeSet::new(),
        }
    }
}

impl ProviderRegistry {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            properties: BTreeMap::new(),
            instances: BTreeMap::new(),
            enabled_features: Vec::new(),
            contracts: BTreeMap::new(),
            request_filters: PriorityOrderedMultiMap::ascending(),
            response_filters: PriorityOrderedMultiMap::descending(),
            writer_interceptors: PriorityOrderedMultiMap::descending(),
            reader_interceptors: PriorityOrderedMultiMap::ascending(),
            resource_readers: CapabilityTypedTable::new(),
            resource_writers: CapabilityTypedTable::new(),
            reactive_invokers: CapabilityTypedTable::new(),
            type_arguments: Arc::new(UnresolvedTypeArguments),
            activating: BTreeSet::new(),
        }
    }

    /// Empty registry seeded from parsed options.
    pub fn with_options(options: RegistryOptions) -> Self {
        let mut registry = Self::new(options.scope);
        registry.properties = options.properties;
        registry
    }

    /// Replaces the resolver consulted for typed roles declared without a key.
    ///
    /// Only affects registrations made afterwards.
    pub fn with_type_arguments(mut self, resolver: Arc<dyn TypeArgumentResolver>) -> Self {
        self.type_arguments = resolver;
        self
    }

    /// Builds an independent registry from `source`.
    ///
    /// A `ProviderRegistry` source is snapshotted with all registration
    /// metadata. Any other configuration only exposes its instances, which
    /// are re-registered with default priorities and no contract maps.
    ///
    /// # Errors
    /// - Propagates feature activation failures from re-registration.
    pub fn derive_from(source: &dyn Configuration) -> RegistryResult<Self> {
        if let Some(registry) = source.as_any().downcast_ref::<ProviderRegistry>() {
            debug!(
                "event=registry_derive module=registry status=ok source=registry scope={} providers={}",
                registry.scope,
                registry.instances.len()
            );
            return Ok(registry.clone());
        }

        let mut registry = Self::new(source.scope());
        registry.properties = source.properties();
        let instances = source.instances();
        debug!(
            "event=registry_derive module=registry status=ok source=foreign scope={} providers={}",
            registry.scope,
            instances.len()
        );
        for instance in instances {
            registry.register(instance)?;
        }
        Ok(registry)
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    /// Inserts or replaces one property.
    pub fn property(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.properties.insert(name.into(), value.into());
    }

    pub fn properties(&self) -> &BTreeMap<String, Value> {
        &self.properties
    }

    pub fn get_property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Registers every role `provider` declares at its resolved priority.
    ///
    /// # Errors
    /// - Propagates feature activation failures.
    pub fn register(&mut self, provider: Arc<dyn Provider>) -> RegistryResult<()> {
        self.register_selected(provider, Selection::All(None))
    }

    /// Registers every declared role at `priority`.
    pub fn register_with_priority(
        &mut self,
        provider: Arc<dyn Provider>,
        priority: i32,
    ) -> RegistryResult<()> {
        self.register_selected(provider, Selection::All(Some(priority)))
    }

    /// Registers only `roles`, each at the provider's resolved priority.
    ///
    /// An empty list registers nothing.
    pub fn register_with_roles(
        &mut self,
        provider: Arc<dyn Provider>,
        roles: &[Role],
    ) -> RegistryResult<()> {
        if roles.is_empty() {
            return Ok(());
        }
        let priority = resolve_declared_priority(&provider.metadata());
        let contracts: BTreeMap<Role, i32> = roles.iter().map(|role| (*role, priority)).collect();
        self.register_with_contracts(provider, &contracts)
    }

    /// Registers only the roles keyed in `contracts`, at the mapped priority,
    /// and persists the map for `contracts()`.
    ///
    /// An empty map registers nothing.
    pub fn register_with_contracts(
        &mut self,
        provider: Arc<dyn Provider>,
        contracts: &BTreeMap<Role, i32>,
    ) -> RegistryResult<()> {
        if contracts.is_empty() {
            return Ok(());
        }
        self.register_selected(provider, Selection::Contracts(contracts))
    }

    /// # Errors
    /// - `RegistryError::Instantiation` when `class` cannot be constructed.
    pub fn register_class(&mut self, class: &ProviderClass) -> RegistryResult<()> {
        let instance = class.instantiate()?;
        self.register(instance)
    }

    pub fn register_class_with_priority(
        &mut self,
        class: &ProviderClass,
        priority: i32,
    ) -> RegistryResult<()> {
        let instance = class.instantiate()?;
        self.register_with_priority(instance, priority)
    }

    pub fn register_class_with_roles(
        &mut self,
        class: &ProviderClass,
        roles: &[Role],
    ) -> RegistryResult<()> {
        let instance = class.instantiate()?;
        self.register_with_roles(instance, roles)
    }

    pub fn register_class_with_contracts(
        &mut self,
        class: &ProviderClass,
        contracts: &BTreeMap<Role, i32>,
    ) -> RegistryResult<()> {
        let instance = class.instantiate()?;
        self.register_with_contracts(instance, contracts)
    }

    /// Appends `feature` to the enabled list without activating it.
    pub fn add_enabled_feature(&mut self, feature: Arc<dyn Feature>) {
        self.enabled_features.push(EnabledFeature {
            key: feature.type_key(),
            feature,
        });
    }

    fn register_selected(
        &mut self,
        provider: Arc<dyn Provider>,
        selection: Selection<'_>,
    ) -> RegistryResult<()> {
        let key = provider.type_key();
        if self.instances.contains_key(&key) || self.activating.contains(&key) {
            trace!(
                "event=provider_skip module=registry status=skip type={} reason=duplicate",
                key
            );
            return Ok(());
        }

        let metadata = provider.metadata();
        let declared = resolve_declared_priority(&metadata);
        let capabilities = Arc::clone(&provider).capabilities();
        debug_assert!(
            capabilities.handles_are(provider.as_ref()),
            "capability handles of {key} must be the registered instance"
        );
        let mut filed = BTreeSet::new();

        if let Some(feature) = capabilities.feature {
            if let Some(priority) = selection.priority(Role::Feature, declared) {
                filed.insert(Role::Feature);
                self.activate_feature(key, feature, selection, priority)?;
            }
        }
        if let Some(filter) = capabilities.request_filter {
            if let Some(priority) = selection.priority(Role::RequestFilter, declared) {
                filed.insert(Role::RequestFilter);
                self.request_filters.add(priority, filter);
            }
        }
        if let Some(filter) = capabilities.response_filter {
            if let Some(priority) = selection.priority(Role::ResponseFilter, declared) {
                filed.insert(Role::ResponseFilter);
                self.response_filters.add(priority, filter);
            }
        }
        if let Some(interceptor) = capabilities.writer_interceptor {
            if let Some(priority) = selection.priority(Role::WriterInterceptor, declared) {
                filed.insert(Role::WriterInterceptor);
                self.writer_interceptors.add(priority, interceptor);
            }
        }
        if let Some(interceptor) = capabilities.reader_interceptor {
            if let Some(priority) = selection.priority(Role::ReaderInterceptor, declared) {
                filed.insert(Role::ReaderInterceptor);
                self.reader_interceptors.add(priority, interceptor);
            }
        }
        if let Some(reader) = capabilities.body_reader {
            if selection.priority(Role::BodyReader, declared).is_some() {
                filed.insert(Role::BodyReader);
                if metadata.allows_scope(self.scope) {
                    let type_key = self.resolve_type_key(key, Role::BodyReader, &reader);
                    let media_types = if metadata.consumes.is_empty() {
                        wildcard_list()
                    } else {
                        metadata.consumes.clone()
                    };
                    self.resource_readers
                        .add(type_key, ResourceReader::new(key, reader.handle, media_types));
                } else {
                    self.log_scope_excluded(key, Role::BodyReader);
                }
            }
        }
        if let Some(writer) = capabilities.body_writer {
            if selection.priority(Role::BodyWriter, declared).is_some() {
                filed.insert(Role::BodyWriter);
                if metadata.allows_scope(self.scope) {
                    let type_key = self.resolve_type_key(key, Role::BodyWriter, &writer);
                    let media_types = if metadata.produces.is_empty() {
                        wildcard_list()
                    } else {
                        metadata.produces.clone()
                    };
                    self.resource_writers
                        .add(type_key, ResourceWriter::new(key, writer.handle, media_types));
                } else {
                    self.log_scope_excluded(key, Role::BodyWriter);
                }
            }
        }
        if let Some(invoker) = capabilities.reactive_invoker {
            if selection
                .priority(Role::ReactiveInvokerProvider, declared)
                .is_some()
            {
                filed.insert(Role::ReactiveInvokerProvider);
                let type_key = self.resolve_type_key(key, Role::ReactiveInvokerProvider, &invoker);
                self.reactive_invokers.add(type_key, invoker.handle);
            }
        }

        if filed.is_empty() {
            trace!(
                "event=provider_skip module=registry status=skip type={} reason=no_roles",
                key
            );
            return Ok(());
        }

        self.instances.insert(key, provider);
        if let Selection::Contracts(contracts) = selection {
            self.contracts.insert(key, contracts.clone());
        }
        debug!(
            "event=provider_register module=registry status=ok scope={} type={} roles={}",
            self.scope,
            key,
            filed
                .iter()
                .map(|role| role.as_str())
                .collect::<Vec<_>>()
                .join(",")
        );
        Ok(())
    }

    fn activate_feature(
        &mut self,
        key: TypeKey,
        feature: Arc<dyn Feature>,
        selection: Selection<'_>,
        priority: i32,
    ) -> RegistryResult<()> {
        self.activating.insert(key);
        let outcome = feature.configure(&mut FeatureContext::new(self));
        self.activating.remove(&key);

        if !outcome? {
            debug!(
                "event=feature_decline module=registry status=skip type={}",
                key
            );
            return Ok(());
        }

        let entry = EnabledFeature { key, feature };
        match selection {
            Selection::All(_) => self.enabled_features.push(entry),
            Selection::Contracts(_) => {
                let index = usize::try_from(priority)
                    .unwrap_or(0)
                    .min(self.enabled_features.len());
                self.enabled_features.insert(index, entry);
            }
        }
        info!(
            "event=feature_enable module=registry status=ok scope={} type={}",
            self.scope, key
        );
        Ok(())
    }

    fn resolve_type_key<T: ?Sized>(&self, concrete: TypeKey, role: Role, typed: &Typed<T>) -> TypeKey {
        typed
            .type_argument
            .or_else(|| self.type_arguments.resolve(concrete, role))
            .unwrap_or(TypeKey::Wildcard)
    }

    fn log_scope_excluded(&self, key: TypeKey, role: Role) {
        debug!(
            "event=scope_excluded module=registry status=skip scope={} type={} role={}",
            self.scope, key, role
        );
    }

    /// Request filters, lowest priority first.
    pub fn request_filters(&self) -> Vec<Arc<dyn RequestFilter>> {
        self.request_filters.flatten()
    }

    /// Response filters, highest priority first.
    pub fn response_filters(&self) -> Vec<Arc<dyn ResponseFilter>> {
        self.response_filters.flatten()
    }

    /// Writer interceptors, highest priority first.
    pub fn writer_interceptors(&self) -> Vec<Arc<dyn WriterInterceptor>> {
        self.writer_interceptors.flatten()
    }

    /// Reader interceptors, lowest priority first.
    pub fn reader_interceptors(&self) -> Vec<Arc<dyn ReaderInterceptor>> {
        self.reader_interceptors.flatten()
    }

    pub fn resource_readers(&self) -> &CapabilityTypedTable<ResourceReader> {
        &self.resource_readers
    }

    pub fn resource_writers(&self) -> &CapabilityTypedTable<ResourceWriter> {
        &self.resource_writers
    }

    /// First provider filed under `invoker` whose own check accepts it.
    pub fn reactive_invoker_provider(
        &self,
        invoker: &TypeKey,
    ) -> Option<Arc<dyn ReactiveInvokerProvider>> {
        self.reactive_invokers
            .get(invoker)
            .iter()
            .find(|candidate| candidate.is_provider_for(invoker))
            .cloned()
    }

    pub fn enabled_features(&self) -> Vec<Arc<dyn Feature>> {
        self.enabled_features
            .iter()
            .map(|entry| Arc::clone(&entry.feature))
            .collect()
    }

    /// Whether this exact feature instance is enabled.
    pub fn is_enabled(&self, feature: &dyn Provider) -> bool {
        self.enabled_features
            .iter()
            .any(|entry| same_instance(entry.feature.as_ref(), feature))
    }

    /// Whether any enabled feature has concrete type `key`.
    pub fn is_feature_enabled(&self, key: TypeKey) -> bool {
        self.enabled_features.iter().any(|entry| entry.key == key)
    }

    /// Whether `provider` is the instance stored for its concrete type.
    pub fn is_registered(&self, provider: &dyn Provider) -> bool {
        self.instances
            .get(&provider.type_key())
            .is_some_and(|stored| same_instance(stored.as_ref(), provider))
    }

    pub fn is_type_registered(&self, key: TypeKey) -> bool {
        self.instances.contains_key(&key)
    }

    /// Contract map persisted by `register_with_contracts`, empty otherwise.
    pub fn contracts(&self, key: TypeKey) -> BTreeMap<Role, i32> {
        self.contracts.get(&key).cloned().unwrap_or_default()
    }

    pub fn classes(&self) -> Vec<TypeKey> {
        self.instances.keys().copied().collect()
    }

    pub fn instances(&self) -> Vec<Arc<dyn Provider>> {
        self.instances.values().cloned().collect()
    }

    /// Serializable snapshot of every ordered chain and typed table.
    pub fn describe(&self) -> RegistryDescription {
        let mut registered: Vec<String> = self
            .instances
            .keys()
            .map(|key| key.name().to_string())
            .collect();
        registered.sort();

        RegistryDescription {
            scope: self.scope,
            properties: self.properties.clone(),
            registered,
            enabled_features: self
                .enabled_features
                .iter()
                .map(|entry| entry.key.name().to_string())
                .collect(),
            request_filters: names(self.request_filters.iter().map(|(_, f)| f.type_key())),
            response_filters: names(self.response_filters.iter().map(|(_, f)| f.type_key())),
            writer_interceptors: names(
                self.writer_interceptors
                    .iter()
                    .map(|(_, i)| i.type_key()),
            ),
            reader_interceptors: names(
                self.reader_interceptors
                    .iter()
                    .map(|(_, i)| i.type_key()),
            ),
            resource_readers: self
                .resource_readers
                .iter()
                .flat_map(|(key, entries)| {
                    entries.iter().map(move |entry| TypedEntryDescription {
                        type_key: key.name().to_string(),
                        provider: entry.provider_type().name().to_string(),
                        media_types: entry.media_types().to_vec(),
                    })
                })
                .collect(),
            resource_writers: self
                .resource_writers
                .iter()
                .flat_map(|(key, entries)| {
                    entries.iter().map(move |entry| TypedEntryDescription {
                        type_key: key.name().to_string(),
                        provider: entry.provider_type().name().to_string(),
                        media_types: entry.media_types().to_vec(),
                    })
                })
                .collect(),
            reactive_invokers: self
                .reactive_invokers
                .iter()
                .flat_map(|(key, entries)| {
                    entries.iter().map(move |entry| TypedEntryDescription {
                        type_key: key.name().to_string(),
                        provider: entry.type_key().name().to_string(),
                        media_types: Vec::new(),
                    })
                })
                .collect(),
        }
    }
}

fn names(keys: impl Iterator<Item = TypeKey>) -> Vec<String> {
    keys.map(|key| key.name().to_string()).collect()
}

impl Debug for ProviderRegistry {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("scope", &self.scope)
            .field("properties", &self.properties.len())
            .field("providers", &self.instances.len())
            .field("enabled_features", &self.enabled_features.len())
            .field("request_filters", &self.request_filters.len())
            .field("response_filters", &self.response_filters.len())
            .field("writer_interceptors", &self.writer_interceptors.len())
            .field("reader_interceptors", &self.reader_interceptors.len())
            .field("resource_readers", &self.resource_readers.entry_count())
            .field("resource_writers", &self.resource_writers.entry_count())
            .field("reactive_invokers", &self.reactive_invokers.entry_count())
            .finish()
    }
}

impl Configuration for ProviderRegistry {
    fn scope(&self) -> Scope {
        self.scope
    }

    fn properties(&self) -> BTreeMap<String, Value> {
        self.properties.clone()
    }

    fn instances(&self) -> Vec<Arc<dyn Provider>> {
        ProviderRegistry::instances(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn get_property(&self, name: &str) -> Option<Value> {
        self.properties.get(name).cloned()
    }

    fn classes(&self) -> Vec<TypeKey> {
        ProviderRegistry::classes(self)
    }

    fn is_registered(&self, provider: &dyn Provider) -> bool {
        ProviderRegistry::is_registered(self, provider)
    }

    fn is_type_registered(&self, key: TypeKey) -> bool {
        ProviderRegistry::is_type_registered(self, key)
    }

    fn contracts(&self, key: TypeKey) -> BTreeMap<Role, i32> {
        ProviderRegistry::contracts(self, key)
    }

    fn is_enabled(&self, feature: &dyn Provider) -> bool {
        ProviderRegistry::is_enabled(self, feature)
    }

    fn is_feature_enabled(&self, key: TypeKey) -> bool {
        ProviderRegistry::is_feature_enabled(self, key)
    }
}
