use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

use flake_types::{FlakeId, Namespace, ReconstructionKey};

use crate::entity::Snowflake;

/// Shared handle to a registered snowflake instance.
///
/// Cloning a `Flake` clones the handle, not the instance. Equality is
/// identity: two handles are equal when they point at the same instance.
///
/// `Display` prints the identifier. `Debug` prints the module path, class
/// name and the instance address, which is stable for the life of the
/// instance and unique among live instances of the process.
pub struct Flake<T>(Arc<T>);

impl<T> Flake<T> {
    pub(crate) fn from_arc(inner: Arc<T>) -> Self {
        Self(inner)
    }

    pub(crate) fn as_arc(&self) -> &Arc<T> {
        &self.0
    }

    /// Returns `true` if both handles point at the same instance.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: Snowflake> Flake<T> {
    pub fn identifier(&self) -> &FlakeId {
        self.0.core().identifier()
    }

    pub fn namespace(&self) -> &Namespace {
        self.0.core().namespace()
    }

    /// Value of the class creation counter when the instance was minted.
    pub fn index(&self) -> u64 {
        self.0.core().index()
    }

    /// The `(class, identifier, namespace)` triple that resolves back to
    /// this instance.
    pub fn key(&self) -> ReconstructionKey {
        ReconstructionKey::new(
            T::class().name(),
            self.identifier().clone(),
            self.namespace().clone(),
        )
    }

    /// Returns `true` if the class registry currently maps this handle's key
    /// to this very instance. False after `delete`, `clear`, or displacement.
    pub fn is_registered(&self) -> bool {
        T::class()
            .lookup(self.namespace().as_str(), self.identifier().as_str())
            .is_some_and(|current| Self::ptr_eq(&current, self))
    }
}

impl<T> Clone for Flake<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Deref for Flake<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> PartialEq for Flake<T> {
    fn eq(&self, other: &Self) -> bool {
        Self::ptr_eq(self, other)
    }
}

impl<T> Eq for Flake<T> {}

impl<T: Snowflake> fmt::Display for Flake<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self.identifier(), f)
    }
}

impl<T: Snowflake> fmt::Debug for Flake<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let class = T::class();
        write!(
            f,
            "<{}::{} {:p}>",
            class.module(),
            class.name(),
            Arc::as_ptr(&self.0)
        )
    }
}
