//! Snowflake pattern for Rust.
//!
//! Within one class and one namespace, an identifier maps to exactly one live
//! instance. Asking for an instance that already exists returns it; the
//! construction arguments of that request are dropped without error.
//! Snapshots of instances restore through the same path, so deserializing
//! never duplicates a live instance or rolls back its state.
//!
//! This is the main entry point for applications; it re-exports the
//! `flake-*` crates.
//!
//! ```
//! use std::sync::Mutex;
//!
//! use snowflake::prelude::*;
//!
//! struct Compound {
//!     core: FlakeCore,
//!     charge: Mutex<i32>,
//! }
//!
//! impl Snowflake for Compound {
//!     type Args = i32;
//!
//!     fn class() -> &'static FlakeClass<Self> {
//!         flake_class!(Compound)
//!     }
//!
//!     fn create(core: FlakeCore, charge: i32) -> Self {
//!         Self { core, charge: Mutex::new(charge) }
//!     }
//!
//!     fn core(&self) -> &FlakeCore {
//!         &self.core
//!     }
//! }
//!
//! let atp = Compound::get_or_create(Request::named("atp"), -4);
//! let again = Compound::get_or_create(Request::named("atp"), 0);
//! assert!(Flake::ptr_eq(&atp, &again));
//! assert_eq!(*again.charge.lock().unwrap(), -4);
//!
//! let unnamed = Compound::get_or_create(Request::new(), 0);
//! assert_eq!(unnamed.to_string(), "Compound_1");
//! ```

pub use flake_core::{
    flake_class, from_snapshot, reconstruct, restore_state, to_snapshot, Flake, FlakeClass,
    FlakeCore, Request, Resolution, Restorable, Snapshot, SnapshotCodec, SnapshotConfig,
    SnapshotError, SnapshotFormat, SnapshotResult, Snowflake,
};
pub use flake_registry::{Registry, RegistryError, RegistryResult};
pub use flake_types::{FlakeId, Namespace, ReconstructionKey};

/// The traits and types needed to declare and use snowflake types.
pub mod prelude {
    pub use flake_core::{
        flake_class, Flake, FlakeClass, FlakeCore, Request, Resolution, Restorable, Snowflake,
    };
    pub use flake_types::{FlakeId, Namespace};
}

#[cfg(test)]
mod properties;
