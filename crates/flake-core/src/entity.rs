//! The [`Snowflake`] trait and the [`FlakeCore`] header every snowflake
//! embeds.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};

use flake_types::{FlakeId, Namespace};

use crate::class::{FlakeClass, Request};
use crate::handle::Flake;

/// Identity header embedded in every snowflake instance.
///
/// A `FlakeCore` can only be minted by [`FlakeClass`] during
/// construct-or-retrieve, which is what guarantees that every live instance
/// is registered under its own key.
pub struct FlakeCore {
    identifier: FlakeId,
    namespace: Namespace,
    index: u64,
    suppress_next_restore: AtomicBool,
}

impl FlakeCore {
    pub(crate) fn new(identifier: FlakeId, namespace: Namespace, index: u64) -> Self {
        Self {
            identifier,
            namespace,
            index,
            suppress_next_restore: AtomicBool::new(false),
        }
    }

    /// Identifier within the class and namespace.
    pub fn identifier(&self) -> &FlakeId {
        &self.identifier
    }

    /// Namespace the instance is registered in.
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Value of the class creation counter when this instance was minted.
    pub fn index(&self) -> u64 {
        self.index
    }

    /// Returns `true` if the next state restore will be skipped.
    pub fn suppresses_next_restore(&self) -> bool {
        self.suppress_next_restore.load(Ordering::Acquire)
    }

    pub(crate) fn set_suppress_next_restore(&self, suppress: bool) {
        self.suppress_next_restore.store(suppress, Ordering::Release);
    }

    /// Read and reset the flag in one step.
    pub(crate) fn take_suppress_next_restore(&self) -> bool {
        self.suppress_next_restore.swap(false, Ordering::AcqRel)
    }
}

impl fmt::Debug for FlakeCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeCore")
            .field("identifier", &self.identifier)
            .field("namespace", &self.namespace)
            .field("index", &self.index)
            .field("suppress_next_restore", &self.suppresses_next_restore())
            .finish()
    }
}

/// A type whose instances are unique per `(namespace, identifier)`.
///
/// Implementors are concrete types. Each one owns a private
/// [`FlakeClass`], normally declared with [`flake_class!`](crate::flake_class),
/// so registries are never shared between types even when two types wrap the
/// same data.
///
/// Instances are only obtained through [`Snowflake::get_or_create`] (or the
/// equivalent methods on [`FlakeClass`]). When the key already resolves, the
/// existing instance is returned and the construction arguments are dropped
/// without error: the live instance always wins over new arguments.
///
/// Instances are shared behind `Arc`, so any state that should change after
/// construction needs interior mutability.
pub trait Snowflake: Send + Sync + Sized + 'static {
    /// Extra construction arguments, consumed only when a new instance is
    /// minted.
    type Args;

    /// The class registry and creation counter of this type.
    fn class() -> &'static FlakeClass<Self>;

    /// Build a new instance around its freshly minted core.
    ///
    /// Runs while the class registry is locked. It must not request
    /// instances of the same class.
    fn create(core: FlakeCore, args: Self::Args) -> Self;

    /// The identity header passed to [`Snowflake::create`].
    fn core(&self) -> &FlakeCore;

    /// Construct-or-retrieve through this type's class.
    fn get_or_create(request: Request, args: Self::Args) -> Flake<Self> {
        Self::class().get_or_create(request, args)
    }
}
