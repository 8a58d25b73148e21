use std::collections::BTreeMap;
use std::fmt;

use flake_types::{FlakeId, Namespace};

use crate::error::{RegistryError, RegistryResult};

/// Two-level table: namespace -> identifier -> value.
///
/// Both levels are ordered maps, so enumeration is deterministic. Lookups
/// take plain `&str` keys.
///
/// `Registry::new` is a `const fn`, which lets a registry live in a `static`
/// without lazy initialization.
#[derive(Clone)]
pub struct Registry<V> {
    namespaces: BTreeMap<Namespace, BTreeMap<FlakeId, V>>,
}

impl<V> Registry<V> {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            namespaces: BTreeMap::new(),
        }
    }

    // ---------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------

    /// The value registered under `(namespace, identifier)`, if any.
    pub fn lookup(&self, namespace: &str, identifier: &str) -> Option<&V> {
        self.namespaces.get(namespace)?.get(identifier)
    }

    /// Lookup with a fallback. Never fails.
    pub fn get(&self, namespace: &str, identifier: &str, default: V) -> V
    where
        V: Clone,
    {
        self.lookup(namespace, identifier)
            .cloned()
            .unwrap_or(default)
    }

    /// Returns `true` if `(namespace, identifier)` is registered.
    pub fn contains(&self, namespace: &str, identifier: &str) -> bool {
        self.lookup(namespace, identifier).is_some()
    }

    /// All populated namespaces, in order.
    pub fn namespaces(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.keys()
    }

    /// Identifiers registered in `namespace`, in order. Empty for an unknown
    /// namespace.
    pub fn identifiers(&self, namespace: &str) -> impl Iterator<Item = &FlakeId> {
        self.namespaces
            .get(namespace)
            .into_iter()
            .flat_map(BTreeMap::keys)
    }

    /// Entries registered in `namespace`, ordered by identifier.
    pub fn entries(&self, namespace: &str) -> impl Iterator<Item = (&FlakeId, &V)> {
        self.namespaces
            .get(namespace)
            .into_iter()
            .flat_map(BTreeMap::iter)
    }

    /// Number of entries in `namespace`.
    pub fn namespace_len(&self, namespace: &str) -> usize {
        self.namespaces.get(namespace).map_or(0, BTreeMap::len)
    }

    /// Total number of entries across all namespaces.
    pub fn len(&self) -> usize {
        self.namespaces.values().map(BTreeMap::len).sum()
    }

    /// Returns `true` if no namespace holds any entry.
    pub fn is_empty(&self) -> bool {
        self.namespaces.is_empty()
    }

    // ---------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------

    /// Insert `value` under `(namespace, identifier)`.
    ///
    /// An existing entry is overwritten silently and returned.
    pub fn register(&mut self, namespace: Namespace, identifier: FlakeId, value: V) -> Option<V> {
        self.namespaces
            .entry(namespace)
            .or_default()
            .insert(identifier, value)
    }

    /// Remove and return the entry under `(namespace, identifier)`.
    ///
    /// Fails with [`RegistryError::KeyNotFound`] if there is no such entry;
    /// the table is left unchanged in that case.
    pub fn delete(&mut self, namespace: &str, identifier: &str) -> RegistryResult<V> {
        let not_found = || RegistryError::KeyNotFound {
            namespace: Namespace::from(namespace),
            identifier: FlakeId::from(identifier),
        };
        let table = self.namespaces.get_mut(namespace).ok_or_else(not_found)?;
        let value = table.remove(identifier).ok_or_else(not_found)?;
        if table.is_empty() {
            self.namespaces.remove(namespace);
        }
        Ok(value)
    }

    /// Remove every entry in `namespace` and return how many were removed.
    ///
    /// Other namespaces are untouched. Clearing a namespace that does not
    /// exist is not an error and returns `0`.
    pub fn clear(&mut self, namespace: &str) -> usize {
        self.namespaces
            .remove(namespace)
            .map_or(0, |table| table.len())
    }
}

impl<V> Default for Registry<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Debug for Registry<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: BTreeMap<&str, usize> = self
            .namespaces
            .iter()
            .map(|(ns, table)| (ns.as_str(), table.len()))
            .collect();
        f.debug_struct("Registry")
            .field("namespaces", &counts)
            .finish()
    }
}
