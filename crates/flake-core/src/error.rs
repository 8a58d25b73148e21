//! Error types for snapshot operations.

use thiserror::Error;

/// Errors produced while capturing, encoding, or restoring snapshots.
///
/// Identity resolution itself never fails; only the underlying
/// (de)serialization and key validation can.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The snapshot was written for a different class.
    #[error("class mismatch: expected {expected}, found {found}")]
    ClassMismatch { expected: String, found: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result alias for snapshot operations.
pub type SnapshotResult<T> = Result<T, SnapshotError>;
