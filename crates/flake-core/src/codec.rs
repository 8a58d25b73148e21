use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::{SnapshotConfig, SnapshotFormat};
use crate::error::{SnapshotError, SnapshotResult};
use crate::handle::Flake;
use crate::snapshot::{from_snapshot, to_snapshot, Restorable, Snapshot};

/// Encodes handles to snapshot bytes and decodes them back through the
/// identity-preserving restore path.
#[derive(Clone, Debug, Default)]
pub struct SnapshotCodec {
    config: SnapshotConfig,
}

impl SnapshotCodec {
    pub fn new(config: SnapshotConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SnapshotConfig {
        &self.config
    }

    /// Capture `flake` and encode the snapshot.
    pub fn encode<T: Restorable>(&self, flake: &Flake<T>) -> SnapshotResult<Vec<u8>> {
        self.encode_snapshot(&to_snapshot(flake))
    }

    /// Decode a snapshot and restore it.
    ///
    /// If the encoded instance is live, the live instance is returned with
    /// its state untouched.
    pub fn decode<T>(&self, bytes: &[u8]) -> SnapshotResult<Flake<T>>
    where
        T: Restorable,
        T::Args: Default,
    {
        from_snapshot(self.decode_snapshot(bytes)?)
    }

    pub fn encode_snapshot<S: Serialize>(&self, snapshot: &Snapshot<S>) -> SnapshotResult<Vec<u8>> {
        match self.config.format {
            SnapshotFormat::Json if self.config.pretty => serde_json::to_vec_pretty(snapshot)
                .map_err(|e| SnapshotError::Serialization(e.to_string())),
            SnapshotFormat::Json => serde_json::to_vec(snapshot)
                .map_err(|e| SnapshotError::Serialization(e.to_string())),
            SnapshotFormat::Binary => bincode::serialize(snapshot)
                .map_err(|e| SnapshotError::Serialization(e.to_string())),
        }
    }

    /// Decode the raw snapshot without touching any registry.
    pub fn decode_snapshot<S: DeserializeOwned>(&self, bytes: &[u8]) -> SnapshotResult<Snapshot<S>> {
        match self.config.format {
            SnapshotFormat::Json => serde_json::from_slice(bytes)
                .map_err(|e| SnapshotError::Serialization(e.to_string())),
            SnapshotFormat::Binary => bincode::deserialize(bytes)
                .map_err(|e| SnapshotError::Serialization(e.to_string())),
        }
    }
}
