//! Foundation types for snowflake registries.
//!
//! Every other flake crate depends on `flake-types`. The types here are plain
//! values: they carry no registry state of their own.
//!
//! # Key Types
//!
//! - [`FlakeId`] — Identifier of an instance within its class and namespace
//! - [`Namespace`] — Named partition of the identifier space within one class
//! - [`ReconstructionKey`] — `(class, identifier, namespace)` triple that is
//!   sufficient to resolve or recreate an instance

pub mod identifier;
pub mod key;
pub mod namespace;

pub use identifier::FlakeId;
pub use key::ReconstructionKey;
pub use namespace::Namespace;
