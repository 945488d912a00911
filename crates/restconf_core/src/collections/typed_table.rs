//! Type-keyed dispatch table.

use crate::provider::type_key::TypeKey;
use std::collections::BTreeMap;

/// Maps a type key to an insertion-ordered sequence of entries.
///
/// Lookup is exact: no subtype or wildcard expansion happens here.
#[derive(Debug, Clone)]
pub struct CapabilityTypedTable<V> {
    entries: BTreeMap<TypeKey, Vec<V>>,
}

impl<V> Default for CapabilityTypedTable<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> CapabilityTypedTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, key: TypeKey, value: V) {
        self.entries.entry(key).or_default().push(value);
    }

    /// Entries filed under exactly `key`, empty when absent.
    pub fn get(&self, key: &TypeKey) -> &[V] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    pub fn contains_key(&self, key: &TypeKey) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &TypeKey> {
        self.entries.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeKey, &[V])> {
        self.entries
            .iter()
            .map(|(key, values)| (key, values.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries across all keys.
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
