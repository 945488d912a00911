//! Typed-table entries for body readers and writers.

use crate::media_type::MediaType;
use crate::provider::roles::{BodyReader, BodyWriter};
use crate::provider::type_key::TypeKey;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

/// Lazy handle that yields the provider instance filed with an entry.
///
/// Registered instances are unmanaged: every call returns the same object.
pub struct InstanceFactory<T: ?Sized> {
    instance: Arc<T>,
}

impl<T: ?Sized> InstanceFactory<T> {
    pub fn new(instance: Arc<T>) -> Self {
        Self { instance }
    }

    pub fn create_instance(&self) -> Arc<T> {
        Arc::clone(&self.instance)
    }
}

impl<T: ?Sized> Clone for InstanceFactory<T> {
    fn clone(&self) -> Self {
        Self::new(Arc::clone(&self.instance))
    }
}

/// Body reader filed under a type key.
#[derive(Clone)]
pub struct ResourceReader {
    provider_type: TypeKey,
    factory: InstanceFactory<dyn BodyReader>,
    media_types: Vec<MediaType>,
}

impl ResourceReader {
    pub fn new(
        provider_type: TypeKey,
        reader: Arc<dyn BodyReader>,
        media_types: Vec<MediaType>,
    ) -> Self {
        Self {
            provider_type,
            factory: InstanceFactory::new(reader),
            media_types,
        }
    }

    pub fn provider_type(&self) -> TypeKey {
        self.provider_type
    }

    pub fn factory(&self) -> &InstanceFactory<dyn BodyReader> {
        &self.factory
    }

    /// Declared `consumes` list, `*/*` when undeclared.
    pub fn media_types(&self) -> &[MediaType] {
        &self.media_types
    }
}

impl Debug for ResourceReader {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceReader")
            .field("provider_type", &self.provider_type)
            .field("media_types", &self.media_types)
            .finish()
    }
}

/// Body writer filed under a type key.
#[derive(Clone)]
pub struct ResourceWriter {
    provider_type: TypeKey,
    factory: InstanceFactory<dyn BodyWriter>,
    media_types: Vec<MediaType>,
}

impl ResourceWriter {
    pub fn new(
        provider_type: TypeKey,
        writer: Arc<dyn BodyWriter>,
        media_types: Vec<MediaType>,
    ) -> Self {
        Self {
            provider_type,
            factory: InstanceFactory::new(writer),
            media_types,
        }
    }

    pub fn provider_type(&self) -> TypeKey {
        self.provider_type
    }

    pub fn factory(&self) -> &InstanceFactory<dyn BodyWriter> {
        &self.factory
    }

    /// Declared `produces` list, `*/*` when undeclared.
    pub fn media_types(&self) -> &[MediaType] {
        &self.media_types
    }
}

impl Debug for ResourceWriter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceWriter")
            .field("provider_type", &self.provider_type)
            .field("media_types", &self.media_types)
            .finish()
    }
}
