//! Serializable registry snapshot for diagnostics.

use crate::media_type::MediaType;
use crate::provider::metadata::Scope;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Point-in-time view of a registry, keyed by type names.
///
/// Ordered chains are listed in the order a pipeline applies them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryDescription {
    pub scope: Scope,
    pub properties: BTreeMap<String, Value>,
    /// Registered concrete types, sorted by name.
    pub registered: Vec<String>,
    pub enabled_features: Vec<String>,
    pub request_filters: Vec<String>,
    pub response_filters: Vec<String>,
    pub writer_interceptors: Vec<String>,
    pub reader_interceptors: Vec<String>,
    pub resource_readers: Vec<TypedEntryDescription>,
    pub resource_writers: Vec<TypedEntryDescription>,
    pub reactive_invokers: Vec<TypedEntryDescription>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedEntryDescription {
    /// `*` for wildcard-filed entries.
    pub type_key: String,
    pub provider: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub media_types: Vec<MediaType>,
}
