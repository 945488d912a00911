//! Capability-typed, priority-ordered provider registry.
//!
//! Providers declare the roles they satisfy; the registry files each role
//! into an ordered chain or a type-keyed table for a request pipeline to read.

pub mod collections;
pub mod logging;
pub mod media_type;
pub mod options;
pub mod provider;
pub mod registry;

pub use collections::priority_map::{Direction, PriorityOrderedMultiMap};
pub use collections::typed_table::CapabilityTypedTable;
pub use logging::{default_log_level, init_logging, logging_status, LogTarget};
pub use media_type::{MediaType, MediaTypeError};
pub use options::{OptionsError, RegistryOptions};
pub use provider::capability::{parse_role, Capabilities, Role, RoleParseError};
pub use provider::class::ProviderClass;
pub use provider::metadata::{ProviderMetadata, Scope};
pub use provider::priority::{self as priorities, resolve_priority};
pub use provider::roles::{
    BodyReader, BodyWriter, Feature, Provider, ReactiveInvokerProvider, ReaderInterceptor,
    RequestFilter, ResponseFilter, WriterInterceptor,
};
pub use provider::type_key::{
    StaticTypeArguments, TypeArgumentResolver, TypeKey, UnresolvedTypeArguments,
};
pub use registry::configuration::Configuration;
pub use registry::description::{RegistryDescription, TypedEntryDescription};
pub use registry::entry::{InstanceFactory, ResourceReader, ResourceWriter};
pub use registry::error::{RegistryError, RegistryResult};
pub use registry::feature_context::FeatureContext;
pub use registry::provider_registry::ProviderRegistry;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
