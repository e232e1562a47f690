//! # Skirmish Core
//!
//! Deterministic combat outcome simulator for real-time strategy bots.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math in the frame loop (uses fixed-point)
//!
//! Given two opposing groups of agents, the [`simulator`] predicts how an
//! engagement plays out over a number of frames. Callers compare
//! [`evaluation`] scores before and after to decide whether to fight.
//!
//! ## Crate Structure
//!
//! - [`agent`] - Combat units, weapons and their stats
//! - [`behavior`] - Per-unit policies run once per frame
//! - [`collision`] - Tile occupancy for ground agents
//! - [`damage`] - Damage resolution and splash
//! - [`death`] - Reactions fired when agents die
//! - [`simulator`] - The frame loop
//! - [`snapshot`] - Portable simulator state
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod agent;
pub mod behavior;
pub mod collision;
pub mod config;
pub mod damage;
pub mod death;
pub mod error;
pub mod evaluation;
pub mod math;
mod movement;
pub mod simulator;
pub mod snapshot;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::agent::{
        Agent, AgentId, DamageType, SplashType, TargetingPriority, UnitSize, Weapon,
    };
    pub use crate::behavior::{Behavior, RoleBasedBehavior};
    pub use crate::config::{SimConfig, SimulatorBuilder};
    pub use crate::death::{DeathReaction, GroupView};
    pub use crate::error::{Result, SimError};
    pub use crate::evaluation::{health_and_halved_shield, health_and_shield, IntEvaluation};
    pub use crate::math::{Fixed, Shifted};
    pub use crate::simulator::Simulator;
    pub use crate::snapshot::Snapshot;
}
