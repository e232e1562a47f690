//! The frame loop.
//!
//! Each frame runs four phases over both sides, in this order:
//!
//! 1. **Act**: every agent's behavior runs once, side A completely before
//!    side B, each side back to front
//! 2. **Reap**: dead agents leave their group and the collision grid, and
//!    their death reactions fire
//! 3. **Regenerate**: cooldowns, timers, shields, energy and health advance
//! 4. **Move**: planned velocities are applied against bounds and tile
//!    occupancy
//!
//! The ordering is part of the contract: outcomes are reproducible bit for
//! bit only if it is preserved.
//!
//! # Example
//!
//! ```
//! use skirmish_core::agent::{Agent, Weapon};
//! use skirmish_core::evaluation::health_and_shield;
//! use skirmish_core::simulator::Simulator;
//!
//! let mut sim = Simulator::default();
//! sim.add_agent_a(
//!     Agent::new("Zealot")
//!         .with_max_health(100)
//!         .with_max_shields(60)
//!         .with_melee(true)
//!         .with_ground_weapon(Weapon::new(16, 15, 22))
//!         .with_position(100, 100),
//! )?;
//! sim.add_agent_b(Agent::new("Probe").with_max_health(20).with_position(110, 100))?;
//!
//! let before = sim.eval_to_int(health_and_shield);
//! sim.simulate(24);
//! let after = sim.eval_to_int(health_and_shield);
//! assert!(after.delta() > before.delta());
//! # Ok::<(), skirmish_core::error::SimError>(())
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use tracing::{debug, trace};

use crate::agent::{Agent, AgentId};
use crate::behavior::Behavior;
use crate::collision::{in_bounds, CollisionGrid};
use crate::config::SimulatorBuilder;
use crate::death;
use crate::error::{Result, SimError};
use crate::evaluation::IntEvaluation;
use crate::math::{raw, Shifted};
use crate::snapshot::Snapshot;

/// Frames simulated by [`Simulator::simulate_default`], four game seconds.
pub const DEFAULT_FRAMES: i32 = 96;

/// Shield regeneration per frame.
const SHIELD_REGEN: Shifted = raw(7);

/// Energy regeneration per frame.
const ENERGY_REGEN: Shifted = raw(8);

/// Health regeneration per frame for regenerating agents.
const HEALTH_REGEN: Shifted = raw(4);

/// Two opposing groups of agents plus the collision grid they share.
///
/// Not meant for concurrent use: run one simulator per worker, seeded from
/// a [`Snapshot`].
#[derive(Debug, Clone)]
pub struct Simulator {
    player_a: Vec<Agent>,
    player_b: Vec<Agent>,
    collision: CollisionGrid,
    player_a_behavior: Behavior,
    player_b_behavior: Behavior,
    frame_skip: i32,
    next_id: u32,
}

impl Default for Simulator {
    fn default() -> Self {
        Self::from_parts(1, Behavior::default(), Behavior::default())
    }
}

impl Simulator {
    /// Start configuring a simulator.
    #[must_use]
    pub fn builder() -> SimulatorBuilder {
        SimulatorBuilder::default()
    }

    /// Assemble a simulator from validated parts.
    pub(crate) fn from_parts(
        frame_skip: i32,
        player_a_behavior: Behavior,
        player_b_behavior: Behavior,
    ) -> Self {
        Self {
            player_a: Vec::new(),
            player_b: Vec::new(),
            collision: CollisionGrid::new(),
            player_a_behavior,
            player_b_behavior,
            frame_skip,
            next_id: 0,
        }
    }

    /// Frames advanced per step.
    #[must_use]
    pub fn frame_skip(&self) -> i32 {
        self.frame_skip
    }

    /// Agents of side A.
    #[must_use]
    pub fn agents_a(&self) -> &[Agent] {
        &self.player_a
    }

    /// Agents of side B.
    #[must_use]
    pub fn agents_b(&self) -> &[Agent] {
        &self.player_b
    }

    /// Collision grid shared by both sides.
    #[must_use]
    pub fn collision(&self) -> &CollisionGrid {
        &self.collision
    }

    /// Add an agent to side A.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::PositionOutOfBounds`] if the agent is off the
    /// map. The simulator is left unchanged.
    pub fn add_agent_a(&mut self, agent: Agent) -> Result<AgentId> {
        check_bounds(&agent)?;
        Ok(enlist(&mut self.player_a, agent, &mut self.collision, &mut self.next_id))
    }

    /// Add an agent to side B.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::PositionOutOfBounds`] if the agent is off the
    /// map. The simulator is left unchanged.
    pub fn add_agent_b(&mut self, agent: Agent) -> Result<AgentId> {
        check_bounds(&agent)?;
        Ok(enlist(&mut self.player_b, agent, &mut self.collision, &mut self.next_id))
    }

    /// Remove an agent from side A, releasing its tile.
    pub fn remove_agent_a(&mut self, id: AgentId) -> Option<Agent> {
        withdraw(&mut self.player_a, id, &mut self.collision)
    }

    /// Remove an agent from side B, releasing its tile.
    pub fn remove_agent_b(&mut self, id: AgentId) -> Option<Agent> {
        withdraw(&mut self.player_b, id, &mut self.collision)
    }

    /// Drop both groups and their collision footprint.
    pub fn reset(&mut self) {
        self.collision.clear();
        self.player_a.clear();
        self.player_b.clear();
        self.next_id = 0;
    }

    /// Sum a scoring function over both sides.
    pub fn eval_to_int<F>(&self, score: F) -> IntEvaluation
    where
        F: Fn(&Agent) -> i32,
    {
        IntEvaluation::of(&self.player_a, &self.player_b, score)
    }

    /// Simulate [`DEFAULT_FRAMES`] frames.
    pub fn simulate_default(&mut self) -> i32 {
        self.simulate(DEFAULT_FRAMES)
    }

    /// Simulate `frames` frames, rounded up to a multiple of the frame skip.
    ///
    /// Stops early once a side is empty or nobody on either side is active.
    /// Returns the frames left over: 0 when the full count ran. With
    /// `frames <= 0` the loop only ends on elimination or stalemate, so
    /// the caller must be sure one of them happens.
    pub fn simulate(&mut self, frames: i32) -> i32 {
        let requested = frames;
        let frame_skip = i64::from(self.frame_skip);
        // Widened so rounding up near i32::MAX cannot overflow
        let mut frames = i64::from(frames);
        if frames > 0 {
            frames += (frame_skip - frames).rem_euclid(frame_skip);
        }

        while frames != 0 && !self.player_a.is_empty() && !self.player_b.is_empty() {
            frames = frames.saturating_sub(frame_skip);
            if !self.step() {
                break;
            }
        }
        let frames = i32::try_from(frames).unwrap_or(if frames > 0 { i32::MAX } else { i32::MIN });

        debug!(
            requested,
            frames_left = frames,
            survivors_a = self.player_a.len(),
            survivors_b = self.player_b.len(),
            "Simulation finished"
        );

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            debug!(state_hash = hash, "Simulation state hash");
        }

        frames
    }

    /// One step of `frame_skip` frames. Returns false on stalemate.
    fn step(&mut self) -> bool {
        let frame_skip = self.frame_skip;

        let active_a = act(
            &self.player_a_behavior,
            frame_skip,
            &mut self.player_a,
            &mut self.player_b,
        );
        let active_b = act(
            &self.player_b_behavior,
            frame_skip,
            &mut self.player_b,
            &mut self.player_a,
        );

        reap(&mut self.player_a, &mut self.collision, &mut self.next_id);
        reap(&mut self.player_b, &mut self.collision, &mut self.next_id);

        regenerate(&mut self.player_a, frame_skip);
        regenerate(&mut self.player_b, frame_skip);

        apply_movement(&mut self.player_a, &mut self.collision);
        apply_movement(&mut self.player_b, &mut self.collision);

        active_a || active_b
    }

    /// Deterministic hash over both groups.
    ///
    /// Two simulators given identical inputs must agree on this after any
    /// number of frames.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.frame_skip.hash(&mut hasher);

        for group in [&self.player_a, &self.player_b] {
            group.len().hash(&mut hasher);
            for agent in group {
                agent.id.hash(&mut hasher);
                agent.x.hash(&mut hasher);
                agent.y.hash(&mut hasher);
                agent.health.to_bits().hash(&mut hasher);
                agent.shields.to_bits().hash(&mut hasher);
                agent.energy.to_bits().hash(&mut hasher);
                agent.cooldown.hash(&mut hasher);
                agent.sleep_timer.hash(&mut hasher);
                agent.stim_timer.hash(&mut hasher);
                agent.burrowed.hash(&mut hasher);
            }
        }

        hasher.finish()
    }

    /// Capture both groups for replay on another simulator.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.frame_skip, self.player_a.clone(), self.player_b.clone())
    }

    /// Replace the current state with a snapshot.
    ///
    /// Agent ids are kept, except unassigned (zero) and repeated ones, which
    /// get fresh ids after the highest kept one. Ids stay unique either way.
    ///
    /// # Errors
    ///
    /// Fails on a version mismatch, an invalid frame skip or an off-map
    /// agent. The simulator is left unchanged on error.
    pub fn restore(&mut self, snapshot: &Snapshot) -> Result<()> {
        snapshot.check_version()?;
        if snapshot.frame_skip < 1 {
            return Err(SimError::InvalidFrameSkip(snapshot.frame_skip));
        }
        for agent in snapshot.agents_a.iter().chain(&snapshot.agents_b) {
            check_bounds(agent)?;
        }

        let mut seen = HashSet::new();
        let keep: Vec<bool> = snapshot
            .agents_a
            .iter()
            .chain(&snapshot.agents_b)
            .map(|agent| agent.id != AgentId::default() && seen.insert(agent.id))
            .collect();
        let highest = seen.iter().map(|id| id.0).max().unwrap_or(0);

        self.reset();
        self.frame_skip = snapshot.frame_skip;
        self.next_id = highest;
        let (keep_a, keep_b) = keep.split_at(snapshot.agents_a.len());
        for (agent, &kept) in snapshot.agents_a.iter().zip(keep_a) {
            readmit(
                &mut self.player_a,
                agent.clone(),
                kept,
                &mut self.collision,
                &mut self.next_id,
            );
        }
        for (agent, &kept) in snapshot.agents_b.iter().zip(keep_b) {
            readmit(
                &mut self.player_b,
                agent.clone(),
                kept,
                &mut self.collision,
                &mut self.next_id,
            );
        }
        Ok(())
    }
}

fn check_bounds(agent: &Agent) -> Result<()> {
    if in_bounds(agent.x, agent.y) {
        Ok(())
    } else {
        Err(SimError::PositionOutOfBounds {
            name: agent.name.clone(),
            x: agent.x,
            y: agent.y,
        })
    }
}

/// Assign the next id and place the agent.
fn enlist(
    group: &mut Vec<Agent>,
    mut agent: Agent,
    collision: &mut CollisionGrid,
    next_id: &mut u32,
) -> AgentId {
    *next_id += 1;
    agent.id = AgentId(*next_id);
    let id = agent.id;
    place(group, agent, collision);
    id
}

/// Place a restored agent, renumbering it unless its id is kept.
fn readmit(
    group: &mut Vec<Agent>,
    agent: Agent,
    keep_id: bool,
    collision: &mut CollisionGrid,
    next_id: &mut u32,
) {
    if keep_id {
        place(group, agent, collision);
    } else {
        let id = enlist(group, agent, collision, next_id);
        trace!(id = id.0, "Restored agent renumbered");
    }
}

fn place(group: &mut Vec<Agent>, agent: Agent, collision: &mut CollisionGrid) {
    if !agent.is_flyer {
        collision.occupy(agent.x, agent.y);
    }
    group.push(agent);
}

fn withdraw(group: &mut Vec<Agent>, id: AgentId, collision: &mut CollisionGrid) -> Option<Agent> {
    let index = group.iter().position(|agent| agent.id == id)?;
    let agent = group.swap_remove(index);
    if !agent.is_flyer {
        collision.vacate(agent.x, agent.y);
    }
    Some(agent)
}

/// Run `behavior` for every agent of `allies`, back to front.
///
/// Disabled agents count as active without acting. Agents killed earlier
/// in the same pass still act; they are only removed by [`reap`].
fn act(behavior: &Behavior, frame_skip: i32, allies: &mut [Agent], enemies: &mut [Agent]) -> bool {
    let mut active = false;
    for index in (0..allies.len()).rev() {
        if allies[index].is_disabled() {
            active = true;
            continue;
        }
        active |= behavior.sim_unit(frame_skip, index, allies, enemies);
    }
    active
}

/// Remove dead agents and fire their death reactions.
///
/// Repeats while reactions fired, since a reaction may kill survivors that
/// were already passed over.
fn reap(group: &mut Vec<Agent>, collision: &mut CollisionGrid, next_id: &mut u32) {
    loop {
        let mut reacted = false;
        let mut index = 0;
        while index < group.len() {
            if group[index].is_alive() {
                index += 1;
                continue;
            }

            let dead = group.swap_remove(index);
            if !dead.is_flyer {
                collision.vacate(dead.x, dead.y);
            }
            trace!(id = dead.id.0, name = dead.name.as_str(), x = dead.x, y = dead.y, "Agent died");

            let (spawned, fired) = death::react(&dead, group);
            for agent in spawned {
                let id = enlist(group, agent, collision, next_id);
                trace!(id = id.0, source = dead.id.0, "Death reaction spawned agent");
            }
            reacted |= fired;
        }
        if !reacted {
            break;
        }
    }
}

fn regenerate(group: &mut [Agent], frame_skip: i32) {
    let shield_regen = SHIELD_REGEN.saturating_mul_int(frame_skip);
    let energy_regen = ENERGY_REGEN.saturating_mul_int(frame_skip);
    let health_regen = HEALTH_REGEN.saturating_mul_int(frame_skip);

    for agent in group.iter_mut() {
        agent.cooldown = (agent.cooldown - frame_skip).max(0);
        agent.sleep_timer = (agent.sleep_timer - frame_skip).max(0);
        agent.stim_timer = (agent.stim_timer - frame_skip).max(0);

        agent.shields = agent.shields.saturating_add(shield_regen).min(agent.max_shields);

        // Plague never takes the last health point
        let plague = agent.plague_damage.saturating_mul_int(frame_skip);
        if agent.health.saturating_sub(plague) >= Shifted::ONE {
            agent.health -= plague;
        }
        if agent.regenerates_health {
            agent.heal(health_regen);
        }

        agent.energy = agent.energy.saturating_add(energy_regen).min(agent.max_energy);
        agent.healed_this_frame = false;

        debug_assert!(
            agent.health >= Shifted::ZERO && agent.health <= agent.max_health,
            "health out of bounds for {}",
            agent.name
        );
        debug_assert!(agent.shields >= Shifted::ZERO && agent.shields <= agent.max_shields);
        debug_assert!(agent.cooldown >= 0);
    }
}

/// Apply planned velocities. Off-map moves and moves into a full tile are
/// dropped for this frame.
fn apply_movement(group: &mut [Agent], collision: &mut CollisionGrid) {
    for agent in group.iter_mut().rev() {
        let (vx, vy) = agent.velocity();
        agent.halt();
        if vx == 0 && vy == 0 {
            continue;
        }

        let (x, y) = (agent.x + vx, agent.y + vy);
        if !in_bounds(x, y) {
            continue;
        }
        if agent.is_flyer || collision.try_move((agent.x, agent.y), (x, y)) {
            agent.x = x;
            agent.y = y;
        }
    }
}
