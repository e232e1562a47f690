//! Portable simulator state.
//!
//! A snapshot holds both groups with their ids, so callers can evaluate many
//! candidate continuations from one starting point, each on its own
//! [`Simulator`](crate::simulator::Simulator).

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::error::{Result, SimError};

/// Snapshot format version for compatibility.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Both groups of a simulator plus its frame skip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    /// Snapshot format version.
    pub version: u32,
    /// Frames advanced per step.
    pub frame_skip: i32,
    /// Side A, in group order.
    pub agents_a: Vec<Agent>,
    /// Side B, in group order.
    pub agents_b: Vec<Agent>,
}

impl Snapshot {
    /// Create a snapshot of the current format version.
    #[must_use]
    pub fn new(frame_skip: i32, agents_a: Vec<Agent>, agents_b: Vec<Agent>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            frame_skip,
            agents_a,
            agents_b,
        }
    }

    pub(crate) fn check_version(&self) -> Result<()> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SimError::Snapshot(format!(
                "Snapshot version mismatch: expected {}, got {}",
                SNAPSHOT_VERSION, self.version
            )));
        }
        Ok(())
    }

    /// Encode with bincode.
    ///
    /// # Errors
    /// Fails if an agent carries a custom death reaction, which cannot be
    /// serialized.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| SimError::Snapshot(format!("Failed to serialize snapshot: {}", e)))
    }

    /// Decode from bincode and check the version.
    ///
    /// # Errors
    /// Fails on malformed input or a version mismatch.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let snapshot: Self = bincode::deserialize(bytes)
            .map_err(|e| SimError::Snapshot(format!("Failed to deserialize snapshot: {}", e)))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }

    /// Save the snapshot to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| SimError::Snapshot(format!("Failed to write snapshot file: {}", e)))
    }

    /// Load a snapshot from a file.
    ///
    /// # Errors
    /// Returns an error if file reading or decoding fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| SimError::Snapshot(format!("Failed to read snapshot file: {}", e)))?;
        Self::from_bytes(&bytes)
    }
}
