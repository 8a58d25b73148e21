//! Identity-preserving snapshots.
//!
//! A [`Snapshot`] pairs the [`ReconstructionKey`] of an instance with its
//! captured state. Restoring is a two-phase protocol:
//!
//! 1. [`reconstruct`] replays the key through construct-or-retrieve and arms
//!    the instance's suppression flag if the instance already existed.
//! 2. [`restore_state`] applies the state unless the flag is armed, in which
//!    case it consumes the flag and leaves the live instance untouched.
//!
//! The instance already in memory is authoritative: restoring an old
//! snapshot never rolls back a live instance. [`from_snapshot`] makes the
//! same decision in one call from its own construct-or-retrieve outcome, so
//! it never reads the shared flag and other threads capturing or restoring
//! the same instance cannot change its result. The serde impls on [`Flake`]
//! go through [`from_snapshot`], so a handle nested anywhere in a serde value
//! keeps its identity.

use serde::de::{DeserializeOwned, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use tracing::debug;

use flake_types::ReconstructionKey;

use crate::class::{Request, Resolution};
use crate::entity::Snowflake;
use crate::error::{SnapshotError, SnapshotResult};
use crate::handle::Flake;

/// Reconstruction key plus captured state of one instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<S> {
    pub key: ReconstructionKey,
    pub state: S,
}

/// A snowflake whose state can be captured and restored.
///
/// The state never includes the identity header; the suppression flag in
/// particular is not persisted.
pub trait Restorable: Snowflake {
    type State: Serialize + DeserializeOwned;

    /// Copy out the current state.
    fn capture(&self) -> Self::State;

    /// Overwrite the current state.
    fn restore(&self, state: Self::State);
}

/// Capture `flake` into a snapshot.
///
/// Clears any pending suppression flag on the live instance: the snapshot
/// is headed for a context where its state should be applied.
pub fn to_snapshot<T: Restorable>(flake: &Flake<T>) -> Snapshot<T::State> {
    flake.core().set_suppress_next_restore(false);
    Snapshot {
        key: flake.key(),
        state: flake.capture(),
    }
}

/// First restore phase: resolve `key` to a live or freshly minted instance.
///
/// A new instance is built from `T::Args::default()`. The suppression flag
/// is set exactly when the instance existed before this call.
pub fn reconstruct<T>(key: &ReconstructionKey) -> SnapshotResult<Flake<T>>
where
    T: Snowflake,
    T::Args: Default,
{
    let (flake, resolution) = resolve_key::<T>(key)?;
    flake
        .core()
        .set_suppress_next_restore(resolution.is_retrieved());
    Ok(flake)
}

fn resolve_key<T>(key: &ReconstructionKey) -> SnapshotResult<(Flake<T>, Resolution)>
where
    T: Snowflake,
    T::Args: Default,
{
    let class = T::class();
    if key.class != class.name() {
        return Err(SnapshotError::ClassMismatch {
            expected: class.name().to_string(),
            found: key.class.clone(),
        });
    }
    Ok(class.resolve(Request::from(key), T::Args::default()))
}

/// Second restore phase: apply `state` unless the suppression flag is set.
///
/// Returns `true` if the state was applied. The flag is cleared either way.
pub fn restore_state<T: Restorable>(flake: &Flake<T>, state: T::State) -> bool {
    if flake.core().take_suppress_next_restore() {
        debug!(key = %flake.key(), "snapshot state suppressed by live instance");
        return false;
    }
    flake.restore(state);
    true
}

/// Restore an instance from `snapshot`, preserving identity.
///
/// The state is applied only by the call that minted the instance. The
/// suppression flag is neither read nor written.
pub fn from_snapshot<T>(snapshot: Snapshot<T::State>) -> SnapshotResult<Flake<T>>
where
    T: Restorable,
    T::Args: Default,
{
    apply_snapshot(snapshot).map(|(flake, _)| flake)
}

/// [`from_snapshot`], also reporting whether the state was applied.
pub(crate) fn apply_snapshot<T>(snapshot: Snapshot<T::State>) -> SnapshotResult<(Flake<T>, bool)>
where
    T: Restorable,
    T::Args: Default,
{
    let (flake, resolution) = resolve_key::<T>(&snapshot.key)?;
    if resolution.is_retrieved() {
        debug!(key = %flake.key(), "snapshot state suppressed by live instance");
        return Ok((flake, false));
    }
    flake.restore(snapshot.state);
    Ok((flake, true))
}

impl<T: Restorable> Serialize for Flake<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        to_snapshot(self).serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Flake<T>
where
    T: Restorable,
    T::Args: Default,
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let snapshot = Snapshot::<T::State>::deserialize(deserializer)?;
        from_snapshot(snapshot).map_err(serde::de::Error::custom)
    }
}
