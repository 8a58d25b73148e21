//! Namespaced identifier tables for snowflake registries.
//!
//! A [`Registry`] maps a [`Namespace`] to a table of [`FlakeId`] to value.
//! The table is deliberately two-level: a namespace can be enumerated and
//! cleared as a unit without scanning the entries of any other namespace.
//!
//! # Design Rules
//!
//! 1. Within one registry, `(namespace, identifier)` resolves to at most one
//!    value.
//! 2. `register` overwrites silently; callers that need uniqueness check
//!    first (construct-or-retrieve does so under a lock).
//! 3. `delete` of an absent key fails and leaves the table unchanged.
//! 4. `clear` never fails: a missing namespace is already empty.
//! 5. Namespaces with no entries are dropped, so enumeration only reports
//!    populated namespaces.
//!
//! [`Namespace`]: flake_types::Namespace
//! [`FlakeId`]: flake_types::FlakeId

pub mod error;
pub mod registry;

pub use error::{RegistryError, RegistryResult};
pub use registry::Registry;
