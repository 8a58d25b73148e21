use serde::{Deserialize, Serialize};

/// Wire format used by [`SnapshotCodec`](crate::SnapshotCodec).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotFormat {
    /// `serde_json` text.
    #[default]
    Json,
    /// `bincode` bytes.
    Binary,
}

/// Configuration for snapshot encoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotConfig {
    /// Wire format for encoded snapshots.
    pub format: SnapshotFormat,
    /// Pretty-print JSON output. Ignored for binary snapshots.
    pub pretty: bool,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        Self {
            format: SnapshotFormat::Json,
            pretty: false,
        }
    }
}

impl SnapshotConfig {
    /// Compact JSON snapshots.
    pub fn json() -> Self {
        Self::default()
    }

    /// Binary snapshots.
    pub fn binary() -> Self {
        Self {
            format: SnapshotFormat::Binary,
            ..Default::default()
        }
    }

    /// Enable pretty-printed JSON.
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}
