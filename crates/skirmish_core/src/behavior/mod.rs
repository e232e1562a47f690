//! Per-unit policies deciding one agent's action for one frame.
//!
//! Every behavior shares one contract: it is given the index of the acting
//! agent in its own group plus both live groups, and returns whether the
//! agent is still active. `false` means the agent cannot act again given
//! the current state, which lets the simulator stop a stalled engagement.
//!
//! Behaviors only plan velocities and apply damage or healing. Removal of
//! dead agents and all movement happen later in the frame.

mod attacker;
mod healer;
mod repairer;
mod retreater;
mod suicider;

use serde::{Deserialize, Serialize};

use crate::agent::Agent;
use crate::error::{Result, SimError};

/// Squared range within which a healer restores health.
pub const MEDIC_HEAL_RANGE_SQUARED: i32 = 30 * 30;

/// Squared range within which a repairer restores health.
pub const REPAIR_RANGE_SQUARED: i32 = 5 * 5;

/// A per-unit policy.
///
/// `RoleBased` picks one of its slots per agent from the agent's role
/// flags; the other variants run the same policy for every agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Behavior {
    /// Pick a target, close in, fire.
    Attacker,
    /// Heal injured organic allies.
    Healer,
    /// Repair damaged mechanical allies. Yields when nobody needs repair.
    Repairer,
    /// Run into the nearest enemy and detonate.
    Suicider,
    /// Stay out of enemy weapon range.
    Retreater,
    /// Dispatch by role flags.
    RoleBased(RoleBasedBehavior),
}

impl Default for Behavior {
    fn default() -> Self {
        Self::RoleBased(RoleBasedBehavior::default())
    }
}

impl Behavior {
    /// Run this policy for `allies[agent_index]`.
    ///
    /// `allies` is the acting agent's own group; both slices are the
    /// simulator's live groups and must not be resized by the callee.
    pub fn sim_unit(
        &self,
        frame_skip: i32,
        agent_index: usize,
        allies: &mut [Agent],
        enemies: &mut [Agent],
    ) -> bool {
        match self {
            Self::Attacker => attacker::sim_unit(frame_skip, agent_index, allies, enemies),
            Self::Healer => healer::sim_unit(frame_skip, agent_index, allies),
            Self::Repairer => repairer::sim_unit(frame_skip, agent_index, allies),
            Self::Suicider => suicider::sim_unit(frame_skip, agent_index, allies, enemies),
            Self::Retreater => retreater::sim_unit(frame_skip, agent_index, allies, enemies),
            Self::RoleBased(dispatcher) => {
                dispatcher.sim_unit(frame_skip, agent_index, allies, enemies)
            }
        }
    }

    /// Reject configurations that cannot run.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::RoleBased(dispatcher) => dispatcher.validate(),
            _ => Ok(()),
        }
    }
}

/// Routes each agent to exactly one slot, checked in this order:
///
/// 1. suicide units go to the suicider slot
/// 2. healers go to the healer slot
/// 3. repairers go to the repairer slot, and stop there if it reports active
/// 4. everyone else goes to the attacker slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleBasedBehavior {
    suicider: Box<Behavior>,
    healer: Box<Behavior>,
    repairer: Box<Behavior>,
    attacker: Box<Behavior>,
}

impl Default for RoleBasedBehavior {
    fn default() -> Self {
        Self {
            suicider: Box::new(Behavior::Suicider),
            healer: Box::new(Behavior::Healer),
            repairer: Box::new(Behavior::Repairer),
            attacker: Box::new(Behavior::Attacker),
        }
    }
}

impl RoleBasedBehavior {
    /// Replace the suicider slot.
    #[must_use]
    pub fn with_suicider(mut self, behavior: Behavior) -> Self {
        self.suicider = Box::new(behavior);
        self
    }

    /// Replace the healer slot.
    #[must_use]
    pub fn with_healer(mut self, behavior: Behavior) -> Self {
        self.healer = Box::new(behavior);
        self
    }

    /// Replace the repairer slot.
    #[must_use]
    pub fn with_repairer(mut self, behavior: Behavior) -> Self {
        self.repairer = Box::new(behavior);
        self
    }

    /// Replace the attacker slot.
    #[must_use]
    pub fn with_attacker(mut self, behavior: Behavior) -> Self {
        self.attacker = Box::new(behavior);
        self
    }

    fn sim_unit(
        &self,
        frame_skip: i32,
        agent_index: usize,
        allies: &mut [Agent],
        enemies: &mut [Agent],
    ) -> bool {
        let agent = &allies[agent_index];
        if agent.is_suicider {
            return self.suicider.sim_unit(frame_skip, agent_index, allies, enemies);
        }
        if agent.is_healer {
            return self.healer.sim_unit(frame_skip, agent_index, allies, enemies);
        }
        if agent.is_repairer && self.repairer.sim_unit(frame_skip, agent_index, allies, enemies) {
            return true;
        }
        self.attacker.sim_unit(frame_skip, agent_index, allies, enemies)
    }

    fn validate(&self) -> Result<()> {
        let slots = [
            ("suicider", &self.suicider),
            ("healer", &self.healer),
            ("repairer", &self.repairer),
            ("attacker", &self.attacker),
        ];
        for (slot, behavior) in slots {
            if matches!(**behavior, Behavior::RoleBased(_)) {
                return Err(SimError::InvalidBehavior(format!(
                    "{slot} slot cannot hold another role dispatcher"
                )));
            }
        }
        Ok(())
    }
}
