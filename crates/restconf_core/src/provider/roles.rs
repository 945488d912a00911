//! Provider contract and the per-role traits the registry files.
//!
//! Role traits only carry what the registry itself needs to call. How a
//! pipeline invokes filters and interceptors lives outside this crate.

use crate::media_type::MediaType;
use crate::provider::capability::Capabilities;
use crate::provider::metadata::ProviderMetadata;
use crate::provider::type_key::TypeKey;
use crate::registry::error::RegistryResult;
use crate::registry::feature_context::FeatureContext;
use std::any::Any;
use std::sync::Arc;

/// Any object that can be registered.
pub trait Provider: Any + Send + Sync {
    /// Concrete type identity used for deduplication. Do not override.
    fn type_key(&self) -> TypeKey {
        TypeKey::of::<Self>()
    }

    /// Declared priority, scope constraint and media types.
    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata::default()
    }

    /// Roles this instance satisfies. Empty by default.
    ///
    /// Every handle passed to the builder must be `self`. The registry keys
    /// each filed handle by this provider's type and identity.
    fn capabilities(self: Arc<Self>) -> Capabilities {
        Capabilities::new()
    }
}

/// One-time bulk configuration step run at registration.
pub trait Feature: Provider {
    /// Returns `Ok(true)` when the feature should be recorded as enabled.
    fn configure(&self, context: &mut FeatureContext<'_>) -> RegistryResult<bool>;
}

pub trait RequestFilter: Provider {}

pub trait ResponseFilter: Provider {}

pub trait ReaderInterceptor: Provider {}

pub trait WriterInterceptor: Provider {}

/// Entity body deserializer.
pub trait BodyReader: Provider {
    fn is_readable(&self, _type_key: &TypeKey, _media_type: &MediaType) -> bool {
        true
    }
}

/// Entity body serializer.
pub trait BodyWriter: Provider {
    fn is_writeable(&self, _type_key: &TypeKey, _media_type: &MediaType) -> bool {
        true
    }
}

/// Supplier of reactive invokers for one invoker type.
pub trait ReactiveInvokerProvider: Provider {
    /// Authoritative applicability check; the typed table is only a pre-filter.
    fn is_provider_for(&self, invoker: &TypeKey) -> bool;
}

/// Identity of the object behind two references, ignoring vtables.
pub(crate) fn same_instance<A: ?Sized, B: ?Sized>(left: &A, right: &B) -> bool {
    std::ptr::eq(left as *const A as *const (), right as *const B as *const ())
}
