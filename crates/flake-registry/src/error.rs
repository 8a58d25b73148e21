//! Error types for registry operations.

use flake_types::{FlakeId, Namespace};
use thiserror::Error;

/// Errors that can occur during registry operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// No entry is registered under the key.
    #[error("key not found: {identifier} in namespace {namespace}")]
    KeyNotFound {
        namespace: Namespace,
        identifier: FlakeId,
    },
}

/// Result alias for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;
