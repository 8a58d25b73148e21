//! Identity-controlled construction for snowflake types.
//!
//! A snowflake is a value that is unique per class, namespace and
//! identifier: asking for the same `(namespace, identifier)` twice yields the
//! same live instance. This crate provides the machinery:
//!
//! - [`Snowflake`] — implemented by every identity-controlled type
//! - [`FlakeCore`] — identity header embedded in each instance
//! - [`FlakeClass`] — per-type registry and creation counter, declared with
//!   [`flake_class!`]
//! - [`Flake`] — shared handle returned by construct-or-retrieve
//! - [`Snapshot`], [`Restorable`] — serialization that resolves back to live
//!   instances instead of duplicating them
//! - [`SnapshotCodec`] — JSON and binary encodings of snapshots
//!
//! # Construct-or-retrieve
//!
//! [`Snowflake::get_or_create`] is the only way to obtain an instance. If the
//! key already resolves, the existing instance is returned and the
//! construction arguments are dropped without error. Otherwise the class
//! counter advances, an identifier of the form `"{Class}_{index}"` is
//! generated if none was given, and the new instance is registered.
//!
//! # Design Rules
//!
//! 1. Each type has its own registry; types never share entries.
//! 2. Lookup, counter advance and registration happen under one lock.
//! 3. Restoring a snapshot never overwrites an instance that was already
//!    live; state is applied only to instances the restore itself minted.
//! 4. `clear` never fails; `delete` fails only for an absent key.

pub mod class;
pub mod codec;
pub mod config;
pub mod entity;
pub mod error;
pub mod handle;
pub mod snapshot;

#[cfg(test)]
mod testing;

pub use class::{FlakeClass, Request, Resolution};
pub use codec::SnapshotCodec;
pub use config::{SnapshotConfig, SnapshotFormat};
pub use entity::{FlakeCore, Snowflake};
pub use error::{SnapshotError, SnapshotResult};
pub use handle::Flake;
pub use snapshot::{from_snapshot, reconstruct, restore_state, to_snapshot, Restorable, Snapshot};

pub use flake_registry::{RegistryError, RegistryResult};
pub use flake_types::{FlakeId, Namespace, ReconstructionKey};
