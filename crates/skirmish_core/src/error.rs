//! Error types for the combat simulator.

use thiserror::Error;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Top-level error type for all simulator errors.
///
/// There are no retries anywhere in the crate: a simulation is a pure
/// function of its input, so the recovery for any of these is to fix the
/// input and recompute.
#[derive(Debug, Error)]
pub enum SimError {
    /// Frame skip must be at least 1.
    #[error("Invalid frame skip {0}: must be >= 1")]
    InvalidFrameSkip(i32),

    /// A behavior cannot be used as configured.
    #[error("Invalid behavior: {0}")]
    InvalidBehavior(String),

    /// Agent is positioned outside the supported map extent.
    ///
    /// Usually caused by stale or fogged position data upstream.
    #[error("Agent '{name}' at ({x}, {y}) should be inside the map")]
    PositionOutOfBounds {
        /// Display name of the rejected agent.
        name: String,
        /// X position in sub-tile units.
        x: i32,
        /// Y position in sub-tile units.
        y: i32,
    },

    /// Configuration data could not be parsed.
    #[error("Failed to parse simulator config: {0}")]
    Config(String),

    /// Snapshot encoding or decoding failed.
    #[error("Snapshot error: {0}")]
    Snapshot(String),
}
