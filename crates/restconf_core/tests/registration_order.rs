use restconf_core::{
    priorities, Capabilities, Provider, ProviderMetadata, ProviderRegistry, ReaderInterceptor,
    RequestFilter, ResponseFilter, Scope, TypeKey, WriterInterceptor,
};
use std::sync::Arc;

/// Declares a provider type filed under all four ordered roles.
macro_rules! chain_provider {
    ($name:ident) => {
        chain_provider!($name, None);
    };
    ($name:ident, $priority:expr) => {
        #[derive(Default)]
        struct $name;

        impl Provider for $name {
            fn metadata(&self) -> ProviderMetadata {
                let priority: Option<i32> = $priority;
                ProviderMetadata {
                    priority,
                    ..ProviderMetadata::default()
                }
            }

            fn capabilities(self: Arc<Self>) -> Capabilities {
                Capabilities::new()
                    .request_filter(self.clone())
                    .response_filter(self.clone())
                    .reader_interceptor(self.clone())
                    .writer_interceptor(self)
            }
        }

        impl RequestFilter for $name {}
        impl ResponseFilter for $name {}
        impl ReaderInterceptor for $name {}
        impl WriterInterceptor for $name {}
    };
}

chain_provider!(Alpha);
chain_provider!(Beta);
chain_provider!(Gamma);
chain_provider!(Auth, Some(priorities::AUTHENTICATION));
chain_provider!(Coder, Some(priorities::ENTITY_CODER));

fn request_order(registry: &ProviderRegistry) -> Vec<TypeKey> {
    registry
        .request_filters()
        .iter()
        .map(|filter| filter.type_key())
        .collect()
}

fn response_order(registry: &ProviderRegistry) -> Vec<TypeKey> {
    registry
        .response_filters()
        .iter()
        .map(|filter| filter.type_key())
        .collect()
}

fn reader_order(registry: &ProviderRegistry) -> Vec<TypeKey> {
    registry
        .reader_interceptors()
        .iter()
        .map(|interceptor| interceptor.type_key())
        .collect()
}

fn writer_order(registry: &ProviderRegistry) -> Vec<TypeKey> {
    registry
        .writer_interceptors()
        .iter()
        .map(|interceptor| interceptor.type_key())
        .collect()
}

#[test]
fn empty_registry_exposes_empty_chains() {
    let registry = ProviderRegistry::new(Scope::Client);
    assert!(registry.request_filters().is_empty());
    assert!(registry.response_filters().is_empty());
    assert!(registry.reader_interceptors().is_empty());
    assert!(registry.writer_interceptors().is_empty());
    assert!(registry.classes().is_empty());
}

#[test]
fn explicit_priorities_order_inbound_ascending_and_outbound_descending() {
    let mut registry = ProviderRegistry::new(Scope::Client);
    registry
        .register_with_priority(Arc::new(Beta), 200)
        .expect("beta registers");
    registry
        .register_with_priority(Arc::new(Alpha), 100)
        .expect("alpha registers");
    registry
        .register_with_priority(Arc::new(Gamma), 300)
        .expect("gamma registers");

    let inbound = vec![
        TypeKey::of::<Alpha>(),
        TypeKey::of::<Beta>(),
        TypeKey::of::<Gamma>(),
    ];
    let outbound: Vec<TypeKey> = inbound.iter().rev().copied().collect();

    assert_eq!(request_order(&registry), inbound);
    assert_eq!(reader_order(&registry), inbound);
    assert_eq!(response_order(&registry), outbound);
    assert_eq!(writer_order(&registry), outbound);
}

#[test]
fn equal_priorities_keep_registration_order() {
    let mut registry = ProviderRegistry::new(Scope::Server);
    registry.register(Arc::new(Gamma)).expect("gamma registers");
    registry.register(Arc::new(Alpha)).expect("alpha registers");
    registry.register(Arc::new(Beta)).expect("beta registers");

    let registered = vec![
        TypeKey::of::<Gamma>(),
        TypeKey::of::<Alpha>(),
        TypeKey::of::<Beta>(),
    ];
    assert_eq!(request_order(&registry), registered);
    assert_eq!(reader_order(&registry), registered);
    // Within one bucket the outbound chains keep insertion order as well.
    assert_eq!(response_order(&registry), registered);
    assert_eq!(writer_order(&registry), registered);
}

#[test]
fn declared_priority_marker_is_used_when_no_override() {
    let mut registry = ProviderRegistry::new(Scope::Client);
    registry.register(Arc::new(Alpha)).expect("alpha registers");
    registry.register(Arc::new(Coder)).expect("coder registers");
    registry.register(Arc::new(Auth)).expect("auth registers");

    assert_eq!(
        request_order(&registry),
        vec![
            TypeKey::of::<Auth>(),
            TypeKey::of::<Coder>(),
            TypeKey::of::<Alpha>()
        ]
    );
    assert_eq!(
        response_order(&registry),
        vec![
            TypeKey::of::<Alpha>(),
            TypeKey::of::<Coder>(),
            TypeKey::of::<Auth>()
        ]
    );
}

#[test]
fn explicit_priority_overrides_declared_marker() {
    let mut registry = ProviderRegistry::new(Scope::Client);
    registry.register(Arc::new(Alpha)).expect("alpha registers");
    registry
        .register_with_priority(Arc::new(Auth), priorities::USER + 1)
        .expect("auth registers");

    assert_eq!(
        request_order(&registry),
        vec![TypeKey::of::<Alpha>(), TypeKey::of::<Auth>()]
    );
}

#[test]
fn reregistering_a_concrete_type_changes_nothing() {
    let mut registry = ProviderRegistry::new(Scope::Client);
    let first = Arc::new(Alpha);
    registry.register(first.clone()).expect("alpha registers");
    registry
        .register_with_priority(Arc::new(Beta), 10)
        .expect("beta registers");
    let before = registry.describe();

    registry.register(Arc::new(Alpha)).expect("duplicate is a no-op");
    registry
        .register_with_priority(Arc::new(Alpha), 1)
        .expect("duplicate with priority is a no-op");
    registry.register(first.clone()).expect("same instance is a no-op");

    assert_eq!(registry.describe(), before);
    assert_eq!(registry.request_filters().len(), 2);
    assert!(registry.is_registered(first.as_ref()));
}

#[test]
fn identity_check_distinguishes_instances_of_one_type() {
    let mut registry = ProviderRegistry::new(Scope::Client);
    let stored = Arc::new(Alpha);
    let other = Arc::new(Alpha);
    registry.register(stored.clone()).expect("alpha registers");

    assert!(registry.is_registered(stored.as_ref()));
    assert!(!registry.is_registered(other.as_ref()));
    assert!(registry.is_type_registered(TypeKey::of::<Alpha>()));
    assert!(!registry.is_type_registered(TypeKey::of::<Beta>()));
}

#[test]
fn one_object_is_filed_under_every_declared_role() {
    let mut registry = ProviderRegistry::new(Scope::Client);
    let provider = Arc::new(Alpha);
    registry.register(provider.clone()).expect("alpha registers");

    let description = registry.describe();
    let name = TypeKey::of::<Alpha>().name().to_string();
    assert_eq!(description.request_filters, vec![name.clone()]);
    assert_eq!(description.response_filters, vec![name.clone()]);
    assert_eq!(description.reader_interceptors, vec![name.clone()]);
    assert_eq!(description.writer_interceptors, vec![name.clone()]);
    assert_eq!(description.registered, vec![name]);
    assert_eq!(registry.instances().len(), 1);
}
