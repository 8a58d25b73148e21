//! Per-class registries and the construct-or-retrieve path.
//!
//! Every [`Snowflake`] type owns exactly one [`FlakeClass`], held in a
//! `static` and reached through [`Snowflake::class`]. The class bundles the
//! type's [`Registry`] with its creation counter behind one `RwLock`, so a
//! construct-or-retrieve call observes and updates both atomically.
//!
//! # Invariants
//!
//! - `(namespace, identifier)` resolves to at most one live instance per class.
//! - The counter advances only when an instance is minted, never on a hit.
//! - Registries of different types never share entries.

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use flake_registry::{Registry, RegistryResult};
use flake_types::{FlakeId, Namespace, ReconstructionKey};
use tracing::{debug, warn};

use crate::entity::{FlakeCore, Snowflake};
use crate::handle::Flake;

/// Declare the `static` [`FlakeClass`] of a snowflake type and return a
/// reference to it.
///
/// Intended as the body of [`Snowflake::class`]. Pass the concrete type
/// name (not `Self`); an optional second argument overrides the class name
/// used for generated identifiers and reconstruction keys.
///
/// ```ignore
/// impl Snowflake for Compound {
///     type Args = CompoundData;
///
///     fn class() -> &'static FlakeClass<Self> {
///         flake_class!(Compound)
///     }
///     // ...
/// }
/// ```
#[macro_export]
macro_rules! flake_class {
    ($ty:ty) => {
        $crate::flake_class!($ty, ::core::stringify!($ty))
    };
    ($ty:ty, $name:expr) => {{
        static CLASS: $crate::FlakeClass<$ty> =
            $crate::FlakeClass::new($name, ::core::module_path!());
        &CLASS
    }};
}

/// A construct-or-retrieve request: an optional identifier and a namespace.
///
/// A missing or empty identifier means "generate one".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Request {
    pub identifier: Option<FlakeId>,
    pub namespace: Namespace,
}

impl Request {
    /// Request a new instance with a generated identifier in the default
    /// namespace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the instance named `identifier` in the default namespace.
    pub fn named(identifier: impl Into<FlakeId>) -> Self {
        Self {
            identifier: Some(identifier.into()),
            namespace: Namespace::default(),
        }
    }

    /// Move the request into `namespace`.
    pub fn in_namespace(mut self, namespace: impl Into<Namespace>) -> Self {
        self.namespace = namespace.into();
        self
    }
}

impl From<&ReconstructionKey> for Request {
    fn from(key: &ReconstructionKey) -> Self {
        Self {
            identifier: Some(key.identifier.clone()),
            namespace: key.namespace.clone(),
        }
    }
}

/// How a construct-or-retrieve call was satisfied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A new instance was minted and registered.
    Created,
    /// An existing instance was returned; construction arguments were dropped.
    Retrieved,
}

impl Resolution {
    pub fn is_retrieved(self) -> bool {
        self == Self::Retrieved
    }
}

struct ClassState<T> {
    registry: Registry<Arc<T>>,
    counter: u64,
}

impl<T> ClassState<T> {
    fn advance(&mut self) -> u64 {
        let index = self.counter;
        self.counter += 1;
        index
    }

    /// Pick the index and identifier for a new instance.
    ///
    /// Generated identifiers skip names already taken in `namespace`.
    fn next_identity(
        &mut self,
        class: &str,
        namespace: &str,
        requested: Option<FlakeId>,
    ) -> (u64, FlakeId) {
        if let Some(identifier) = requested.filter(|id| !id.is_empty()) {
            return (self.advance(), identifier);
        }
        loop {
            let index = self.advance();
            let identifier = FlakeId::generated(class, index);
            if !self.registry.contains(namespace, identifier.as_str()) {
                return (index, identifier);
            }
        }
    }
}

/// The registry and creation counter of one snowflake type.
///
/// Created by [`flake_class!`](crate::flake_class) as a `static`; it is
/// never dropped, so every registered instance stays alive until it is
/// deleted or its namespace is cleared.
pub struct FlakeClass<T> {
    name: &'static str,
    module: &'static str,
    state: RwLock<ClassState<T>>,
}

impl<T> FlakeClass<T> {
    /// Create an empty class. `module` is only used for debug output.
    pub const fn new(name: &'static str, module: &'static str) -> Self {
        Self {
            name,
            module,
            state: RwLock::new(ClassState {
                registry: Registry::new(),
                counter: 0,
            }),
        }
    }

    /// Class name, used for generated identifiers and reconstruction keys.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Module path of the type that declared this class.
    pub fn module(&self) -> &'static str {
        self.module
    }

    // Every mutation leaves the table consistent, so a poisoned lock is
    // recovered rather than propagated.
    fn read(&self) -> RwLockReadGuard<'_, ClassState<T>> {
        self.state.read().unwrap_or_else(|e| {
            warn!(class = self.name, "recovered poisoned class lock: {e}");
            e.into_inner()
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, ClassState<T>> {
        self.state.write().unwrap_or_else(|e| {
            warn!(class = self.name, "recovered poisoned class lock: {e}");
            e.into_inner()
        })
    }
}

impl<T: Snowflake> FlakeClass<T> {
    // ---------------------------------------------------------------
    // Construct-or-retrieve
    // ---------------------------------------------------------------

    /// Return the instance registered under the request's key, or mint,
    /// register and return a new one.
    ///
    /// On a hit `args` is dropped unused, even if it differs from the
    /// arguments the instance was created with.
    pub fn get_or_create(&self, request: Request, args: T::Args) -> Flake<T> {
        self.resolve(request, args).0
    }

    /// Like [`get_or_create`](Self::get_or_create), also reporting whether
    /// the instance already existed.
    pub fn resolve(&self, request: Request, args: T::Args) -> (Flake<T>, Resolution) {
        let mut guard = self.write();
        let state = &mut *guard;
        let Request {
            identifier,
            namespace,
        } = request;

        if let Some(id) = identifier.as_ref().filter(|id| !id.is_empty()) {
            if let Some(existing) = state.registry.lookup(namespace.as_str(), id.as_str()) {
                return (Flake::from_arc(Arc::clone(existing)), Resolution::Retrieved);
            }
        }

        let (index, identifier) = state.next_identity(self.name, namespace.as_str(), identifier);
        let core = FlakeCore::new(identifier.clone(), namespace.clone(), index);
        let instance = Arc::new(T::create(core, args));

        debug!(
            class = self.name,
            namespace = %namespace,
            identifier = %identifier,
            index,
            "created snowflake"
        );
        state
            .registry
            .register(namespace, identifier, Arc::clone(&instance));

        (Flake::from_arc(instance), Resolution::Created)
    }

    // ---------------------------------------------------------------
    // Registry access
    // ---------------------------------------------------------------

    /// The instance registered under `(namespace, identifier)`, if any.
    pub fn lookup(&self, namespace: &str, identifier: &str) -> Option<Flake<T>> {
        self.read()
            .registry
            .lookup(namespace, identifier)
            .map(|instance| Flake::from_arc(Arc::clone(instance)))
    }

    /// Lookup with a fallback handle.
    pub fn get(&self, namespace: &str, identifier: &str, default: Flake<T>) -> Flake<T> {
        self.lookup(namespace, identifier).unwrap_or(default)
    }

    /// Returns `true` if `(namespace, identifier)` is registered.
    pub fn contains(&self, namespace: &str, identifier: &str) -> bool {
        self.read().registry.contains(namespace, identifier)
    }

    /// Register `flake` under its own key, returning whatever was registered
    /// there before.
    ///
    /// Used to put a deleted instance back. Displacing a different live
    /// instance is allowed but logged, since the displaced instance loses
    /// its identity guarantee.
    pub fn register(&self, flake: &Flake<T>) -> Option<Flake<T>> {
        let core = flake.core();
        let previous = self.write().registry.register(
            core.namespace().clone(),
            core.identifier().clone(),
            Arc::clone(flake.as_arc()),
        )?;
        if !Arc::ptr_eq(&previous, flake.as_arc()) {
            warn!(
                class = self.name,
                namespace = %core.namespace(),
                identifier = %core.identifier(),
                "register displaced a live snowflake"
            );
        }
        Some(Flake::from_arc(previous))
    }

    /// Remove `(namespace, identifier)` from the registry.
    ///
    /// The removed instance stays valid for existing holders, but a later
    /// construct-or-retrieve with the same key mints a new instance.
    pub fn delete(&self, namespace: &str, identifier: &str) -> RegistryResult<Flake<T>> {
        let removed = self.write().registry.delete(namespace, identifier)?;
        debug!(class = self.name, namespace, identifier, "deleted snowflake");
        Ok(Flake::from_arc(removed))
    }

    /// Drop every instance registered in `namespace` and return how many
    /// were removed. A missing namespace is already empty; this never fails.
    pub fn clear(&self, namespace: &str) -> usize {
        let removed = self.write().registry.clear(namespace);
        debug!(class = self.name, namespace, removed, "cleared namespace");
        removed
    }

    // ---------------------------------------------------------------
    // Enumeration
    // ---------------------------------------------------------------

    /// Populated namespaces, in order.
    pub fn namespaces(&self) -> Vec<Namespace> {
        self.read().registry.namespaces().cloned().collect()
    }

    /// Identifiers registered in `namespace`, in order.
    pub fn identifiers(&self, namespace: &str) -> Vec<FlakeId> {
        self.read().registry.identifiers(namespace).cloned().collect()
    }

    /// Instances registered in `namespace`, ordered by identifier.
    pub fn instances(&self, namespace: &str) -> Vec<Flake<T>> {
        self.read()
            .registry
            .entries(namespace)
            .map(|(_, instance)| Flake::from_arc(Arc::clone(instance)))
            .collect()
    }

    /// Number of registered instances across all namespaces.
    pub fn len(&self) -> usize {
        self.read().registry.len()
    }

    /// Returns `true` if no instance is registered.
    pub fn is_empty(&self) -> bool {
        self.read().registry.is_empty()
    }

    /// The index the next minted instance will receive.
    pub fn next_index(&self) -> u64 {
        self.read().counter
    }
}

impl<T> fmt::Debug for FlakeClass<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.read();
        f.debug_struct("FlakeClass")
            .field("name", &self.name)
            .field("module", &self.module)
            .field("registry", &state.registry)
            .field("counter", &state.counter)
            .finish()
    }
}
