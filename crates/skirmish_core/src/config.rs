//! Simulator configuration.
//!
//! Configuration comes either from code through [`SimulatorBuilder`] or from
//! a RON document through [`SimConfig`]:
//!
//! ```ron
//! SimConfig(
//!     frame_skip: 3,
//!     player_a: RoleBased((attacker: Retreater)),
//!     player_b: Attacker,
//! )
//! ```
//!
//! Both paths validate in [`SimulatorBuilder::build`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::behavior::Behavior;
use crate::error::{Result, SimError};
use crate::simulator::Simulator;

/// Builder for [`Simulator`].
#[derive(Debug, Clone)]
pub struct SimulatorBuilder {
    frame_skip: i32,
    player_a_behavior: Behavior,
    player_b_behavior: Behavior,
}

impl Default for SimulatorBuilder {
    fn default() -> Self {
        Self {
            frame_skip: 1,
            player_a_behavior: Behavior::default(),
            player_b_behavior: Behavior::default(),
        }
    }
}

impl SimulatorBuilder {
    /// Frames advanced per step. Larger values trade accuracy for speed.
    #[must_use]
    pub fn with_frame_skip(mut self, frame_skip: i32) -> Self {
        self.frame_skip = frame_skip;
        self
    }

    /// Behavior for every agent of side A.
    #[must_use]
    pub fn with_player_a_behavior(mut self, behavior: Behavior) -> Self {
        self.player_a_behavior = behavior;
        self
    }

    /// Behavior for every agent of side B.
    #[must_use]
    pub fn with_player_b_behavior(mut self, behavior: Behavior) -> Self {
        self.player_b_behavior = behavior;
        self
    }

    /// Validate and build an empty simulator.
    ///
    /// # Errors
    /// Returns [`SimError::InvalidFrameSkip`] for a frame skip below 1, or
    /// [`SimError::InvalidBehavior`] for a behavior that cannot run.
    pub fn build(self) -> Result<Simulator> {
        if self.frame_skip < 1 {
            return Err(SimError::InvalidFrameSkip(self.frame_skip));
        }
        self.player_a_behavior.validate()?;
        self.player_b_behavior.validate()?;
        Ok(Simulator::from_parts(
            self.frame_skip,
            self.player_a_behavior,
            self.player_b_behavior,
        ))
    }
}

/// Serializable simulator settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Frames advanced per step.
    pub frame_skip: i32,
    /// Behavior of side A.
    pub player_a: Behavior,
    /// Behavior of side B.
    pub player_b: Behavior,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            frame_skip: 1,
            player_a: Behavior::default(),
            player_b: Behavior::default(),
        }
    }
}

impl SimConfig {
    /// Parse from a RON string. Missing fields take their defaults.
    ///
    /// # Errors
    /// Returns [`SimError::Config`] if the document does not parse.
    pub fn from_ron(ron: &str) -> Result<Self> {
        ron::from_str(ron).map_err(|e| SimError::Config(e.to_string()))
    }

    /// Load from a RON file.
    ///
    /// # Errors
    /// Returns [`SimError::Config`] if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SimError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_ron(&contents)
    }

    /// Turn these settings into a builder.
    #[must_use]
    pub fn into_builder(self) -> SimulatorBuilder {
        SimulatorBuilder::default()
            .with_frame_skip(self.frame_skip)
            .with_player_a_behavior(self.player_a)
            .with_player_b_behavior(self.player_b)
    }
}
