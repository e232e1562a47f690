//! Agent data model: one combat unit taking part in a simulation.
//!
//! An [`Agent`] is pure state. It is built fully-formed through the `with_*`
//! builder methods and then handed to a
//! [`Simulator`](crate::simulator::Simulator), which assigns its
//! [`AgentId`]. Behaviors and the simulator mutate the crate-visible fields
//! directly; outside callers only get accessors and a few vital setters.
//!
//! # Example
//!
//! ```
//! use skirmish_core::agent::{Agent, Weapon};
//!
//! let marine = Agent::new("Marine")
//!     .with_max_health(40)
//!     .with_ground_weapon(Weapon::new(6, 128, 15))
//!     .with_position(100, 100);
//!
//! assert_eq!(marine.health(), 40);
//! assert!(marine.is_alive());
//! ```

use serde::{Deserialize, Serialize};

use crate::death::DeathReaction;
use crate::math::{fixed_serde, points, raw, shifted_serde, Fixed, Shifted};

/// Frames a burrow or unburrow transition keeps the unit busy.
pub const BURROW_FRAMES: i32 = 24;

/// Frames a stim lasts.
pub const STIM_FRAMES: i32 = 37;

/// Health paid for one stim, in whole points.
pub const STIM_HEALTH_COST: i32 = 10;

/// Stable identifier assigned by the simulator on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AgentId(pub u32);

/// Weak reference to an agent in a group.
///
/// The index is only a hint: groups are reordered by removals, so the
/// reference is checked against the id before use and falls back to a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentRef {
    /// Index where the agent was last seen.
    pub index: usize,
    /// Identity of the referenced agent.
    pub id: AgentId,
}

impl AgentRef {
    /// Reference the agent at `index` in `group`.
    #[must_use]
    pub fn new(index: usize, group: &[Agent]) -> Self {
        Self {
            index,
            id: group[index].id,
        }
    }

    /// Find the current index of the referenced agent, if it still exists.
    ///
    /// Relies on ids being unique within the simulator, which insertion,
    /// death spawns and [`Simulator::restore`] all maintain.
    ///
    /// [`Simulator::restore`]: crate::simulator::Simulator::restore
    #[must_use]
    pub fn resolve(&self, group: &[Agent]) -> Option<usize> {
        if group.get(self.index).is_some_and(|agent| agent.id == self.id) {
            return Some(self.index);
        }
        group.iter().position(|agent| agent.id == self.id)
    }
}

/// Damage type of a weapon, deciding the size multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DamageType {
    /// Full damage to small units, reduced against medium and large.
    Concussive,
    /// Full damage to large units, reduced against small and medium.
    Explosive,
    /// Full damage against everything.
    #[default]
    Normal,
}

/// Size class of a unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum UnitSize {
    /// Small units (infantry, small critters).
    Small,
    /// Medium units (light vehicles).
    Medium,
    /// Large units (heavy vehicles, buildings).
    Large,
    /// No size modifiers apply.
    #[default]
    Irrelevant,
}

/// How a weapon's damage spreads beyond the primary target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SplashType {
    /// Single target only.
    #[default]
    None,
    /// Radial falloff around the target.
    Radial,
    /// Radial falloff around the target, enemies only.
    RadialEnemy,
    /// Along the line from attacker through the target.
    Line,
    /// Jumps to nearby enemies with decaying damage.
    Bounce,
}

/// Targeting priority tier. Higher tiers are always preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum TargetingPriority {
    /// Only attacked when nothing else is available.
    Low,
    /// Harmless units such as workers or buildings.
    Medium,
    /// Anything that can fight back.
    #[default]
    Highest,
}

/// A weapon profile against one target class (ground or air).
///
/// Ranges are stored squared so per-frame range checks need no roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Weapon {
    #[serde(with = "shifted_serde")]
    pub(crate) damage: Shifted,
    pub(crate) damage_type: DamageType,
    pub(crate) max_range: i32,
    pub(crate) min_range: i32,
    pub(crate) min_range_squared: i32,
    pub(crate) max_range_squared: i32,
    pub(crate) splash_type: SplashType,
    pub(crate) inner_splash_radius: i32,
    pub(crate) inner_splash_radius_squared: i32,
    pub(crate) median_splash_radius_squared: i32,
    pub(crate) outer_splash_radius_squared: i32,
    pub(crate) hits: i32,
    pub(crate) cooldown: i32,
}

impl Weapon {
    /// Single-hit weapon with the given damage in whole points.
    #[must_use]
    pub fn new(damage: i32, max_range: i32, cooldown: i32) -> Self {
        Self {
            damage: points(damage),
            max_range,
            max_range_squared: max_range * max_range,
            hits: 1,
            cooldown,
            ..Self::default()
        }
    }

    /// Set the damage type.
    #[must_use]
    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    /// Set a minimum range below which the weapon cannot fire.
    #[must_use]
    pub fn with_min_range(mut self, min_range: i32) -> Self {
        self.min_range = min_range;
        self.min_range_squared = min_range * min_range;
        self
    }

    /// Set the number of hits per attack. Armor applies once per hit.
    #[must_use]
    pub fn with_hits(mut self, hits: i32) -> Self {
        self.hits = hits;
        self
    }

    /// Set the splash shape and its inner, median and outer radii.
    #[must_use]
    pub fn with_splash(mut self, splash_type: SplashType, inner: i32, median: i32, outer: i32) -> Self {
        self.splash_type = splash_type;
        self.inner_splash_radius = inner;
        self.inner_splash_radius_squared = inner * inner;
        self.median_splash_radius_squared = median * median;
        self.outer_splash_radius_squared = outer * outer;
        self
    }

    /// Damage per attack in whole points.
    #[must_use]
    pub fn damage(&self) -> i32 {
        self.damage.to_num()
    }

    /// Maximum range.
    #[must_use]
    pub fn max_range(&self) -> i32 {
        self.max_range
    }

    /// Minimum range, zero if the weapon has none.
    #[must_use]
    pub fn min_range(&self) -> i32 {
        self.min_range
    }

    /// Frames between attacks.
    #[must_use]
    pub fn cooldown(&self) -> i32 {
        self.cooldown
    }

    /// Whether this weapon can deal damage at all.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.damage > Shifted::ZERO
    }

    /// Whether a target at `distance_squared` is inside `[min, max]` range.
    #[must_use]
    pub fn in_range(&self, distance_squared: i32) -> bool {
        distance_squared >= self.min_range_squared && distance_squared <= self.max_range_squared
    }
}

/// One combat unit.
///
/// Identity is the [`AgentId`], never the stats: two agents with identical
/// stats are still distinct participants, so `Agent` has no `PartialEq`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub(crate) id: AgentId,
    pub(crate) name: String,

    // Role flags
    pub(crate) is_flyer: bool,
    pub(crate) is_healer: bool,
    pub(crate) is_repairer: bool,
    pub(crate) is_mechanic: bool,
    pub(crate) is_suicider: bool,
    pub(crate) is_melee: bool,
    pub(crate) is_kiter: bool,
    pub(crate) is_organic: bool,
    pub(crate) regenerates_health: bool,
    pub(crate) priority: TargetingPriority,
    pub(crate) size: UnitSize,

    // Vitals
    #[serde(with = "shifted_serde")]
    pub(crate) health: Shifted,
    #[serde(with = "shifted_serde")]
    pub(crate) max_health: Shifted,
    #[serde(with = "shifted_serde")]
    pub(crate) shields: Shifted,
    #[serde(with = "shifted_serde")]
    pub(crate) max_shields: Shifted,
    #[serde(with = "shifted_serde")]
    pub(crate) energy: Shifted,
    #[serde(with = "shifted_serde")]
    pub(crate) max_energy: Shifted,

    // Combat
    pub(crate) ground_weapon: Weapon,
    pub(crate) air_weapon: Weapon,
    pub(crate) cooldown: i32,
    #[serde(with = "shifted_serde")]
    pub(crate) armor: Shifted,
    pub(crate) shield_upgrades: i32,
    #[serde(with = "shifted_serde")]
    pub(crate) construction_rate: Shifted,
    pub(crate) stop_frames: i32,
    pub(crate) can_stim: bool,
    pub(crate) burrowed_attacker: bool,
    pub(crate) can_burrow: bool,

    // Kinetics
    pub(crate) x: i32,
    pub(crate) y: i32,
    pub(crate) vx: i32,
    pub(crate) vy: i32,
    #[serde(with = "fixed_serde")]
    pub(crate) speed: Fixed,
    pub(crate) elevation: i32,

    // Status
    pub(crate) locked_down: bool,
    pub(crate) stasised: bool,
    pub(crate) burrowed: bool,
    pub(crate) detected: bool,
    pub(crate) protected_by_dark_swarm: bool,
    pub(crate) stim_timer: i32,
    pub(crate) sleep_timer: i32,
    #[serde(with = "shifted_serde")]
    pub(crate) plague_damage: Shifted,
    pub(crate) healed_this_frame: bool,
    pub(crate) restore_target: Option<AgentRef>,
    pub(crate) attack_target: Option<AgentRef>,

    // Lifecycle
    pub(crate) carrier: Option<AgentId>,
    pub(crate) death_reaction: DeathReaction,
}

impl Agent {
    /// A detected, unarmed agent with no vitals. Configure it with the
    /// `with_*` methods.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: AgentId::default(),
            name: name.into(),
            is_flyer: false,
            is_healer: false,
            is_repairer: false,
            is_mechanic: false,
            is_suicider: false,
            is_melee: false,
            is_kiter: false,
            is_organic: false,
            regenerates_health: false,
            priority: TargetingPriority::default(),
            size: UnitSize::default(),
            health: Shifted::ZERO,
            max_health: Shifted::ZERO,
            shields: Shifted::ZERO,
            max_shields: Shifted::ZERO,
            energy: Shifted::ZERO,
            max_energy: Shifted::ZERO,
            ground_weapon: Weapon::default(),
            air_weapon: Weapon::default(),
            cooldown: 0,
            armor: Shifted::ZERO,
            shield_upgrades: 0,
            construction_rate: Shifted::ZERO,
            stop_frames: 0,
            can_stim: false,
            burrowed_attacker: false,
            can_burrow: false,
            x: 0,
            y: 0,
            vx: 0,
            vy: 0,
            speed: Fixed::ZERO,
            elevation: 0,
            locked_down: false,
            stasised: false,
            burrowed: false,
            detected: true,
            protected_by_dark_swarm: false,
            stim_timer: 0,
            sleep_timer: 0,
            plague_damage: Shifted::ZERO,
            healed_this_frame: false,
            restore_target: None,
            attack_target: None,
            carrier: None,
            death_reaction: DeathReaction::None,
        }
    }

    // ------------------------------------------------------------------
    // Builders
    // ------------------------------------------------------------------

    /// Set the position in sub-tile units.
    #[must_use]
    pub fn with_position(mut self, x: i32, y: i32) -> Self {
        self.x = x;
        self.y = y;
        self
    }

    /// Set max health and fill current health to it.
    #[must_use]
    pub fn with_max_health(mut self, max_health: i32) -> Self {
        self.max_health = points(max_health);
        self.health = self.max_health;
        self
    }

    /// Set current health, capped at max health.
    #[must_use]
    pub fn with_health(mut self, health: i32) -> Self {
        self.set_health(health);
        self
    }

    /// Set max shields and fill current shields to it.
    #[must_use]
    pub fn with_max_shields(mut self, max_shields: i32) -> Self {
        self.max_shields = points(max_shields);
        self.shields = self.max_shields;
        self
    }

    /// Set current shields, capped at max shields.
    #[must_use]
    pub fn with_shields(mut self, shields: i32) -> Self {
        self.set_shields(shields);
        self
    }

    /// Set max energy and fill current energy to it.
    #[must_use]
    pub fn with_max_energy(mut self, max_energy: i32) -> Self {
        self.max_energy = points(max_energy);
        self.energy = self.max_energy;
        self
    }

    /// Set current energy, capped at max energy.
    #[must_use]
    pub fn with_energy(mut self, energy: i32) -> Self {
        self.set_energy(energy);
        self
    }

    /// Set armor in whole points.
    #[must_use]
    pub fn with_armor(mut self, armor: i32) -> Self {
        self.armor = points(armor);
        self
    }

    /// Set the shield upgrade level.
    #[must_use]
    pub fn with_shield_upgrades(mut self, shield_upgrades: i32) -> Self {
        self.shield_upgrades = shield_upgrades;
        self
    }

    /// Set the weapon used against ground targets.
    #[must_use]
    pub fn with_ground_weapon(mut self, weapon: Weapon) -> Self {
        self.ground_weapon = weapon;
        self
    }

    /// Set the weapon used against air targets.
    #[must_use]
    pub fn with_air_weapon(mut self, weapon: Weapon) -> Self {
        self.air_weapon = weapon;
        self
    }

    /// Set the movement speed per frame. Zero makes the agent immobile.
    #[must_use]
    pub fn with_speed(mut self, speed: Fixed) -> Self {
        self.speed = speed;
        self
    }

    /// Set the elevation level.
    #[must_use]
    pub fn with_elevation(mut self, elevation: i32) -> Self {
        self.elevation = elevation;
        self
    }

    /// Set the size class.
    #[must_use]
    pub fn with_size(mut self, size: UnitSize) -> Self {
        self.size = size;
        self
    }

    /// Set the targeting priority other units use against this agent.
    #[must_use]
    pub fn with_priority(mut self, priority: TargetingPriority) -> Self {
        self.priority = priority;
        self
    }

    /// Mark as a flying unit. Flyers do not occupy collision tiles.
    #[must_use]
    pub fn with_flyer(mut self, is_flyer: bool) -> Self {
        self.is_flyer = is_flyer;
        self
    }

    /// Mark as a healer of organic allies.
    #[must_use]
    pub fn with_healer(mut self, is_healer: bool) -> Self {
        self.is_healer = is_healer;
        self
    }

    /// Mark as able to repair mechanical allies at the given rate, in raw
    /// shifted units per frame.
    #[must_use]
    pub fn with_repairer(mut self, construction_rate: i32) -> Self {
        self.is_repairer = true;
        self.construction_rate = raw(construction_rate);
        self
    }

    /// Mark as mechanical (repairable).
    #[must_use]
    pub fn with_mechanic(mut self, is_mechanic: bool) -> Self {
        self.is_mechanic = is_mechanic;
        self
    }

    /// Mark as a suicide unit.
    #[must_use]
    pub fn with_suicider(mut self, is_suicider: bool) -> Self {
        self.is_suicider = is_suicider;
        self
    }

    /// Mark as melee. Melee attacks ignore dark swarm and elevation.
    #[must_use]
    pub fn with_melee(mut self, is_melee: bool) -> Self {
        self.is_melee = is_melee;
        self
    }

    /// Mark as a kiter that backs off while reloading.
    #[must_use]
    pub fn with_kiter(mut self, is_kiter: bool) -> Self {
        self.is_kiter = is_kiter;
        self
    }

    /// Mark as organic (healable).
    #[must_use]
    pub fn with_organic(mut self, is_organic: bool) -> Self {
        self.is_organic = is_organic;
        self
    }

    /// Enable passive health regeneration.
    #[must_use]
    pub fn with_health_regen(mut self, regenerates_health: bool) -> Self {
        self.regenerates_health = regenerates_health;
        self
    }

    /// Frames the agent stays busy after each attack.
    #[must_use]
    pub fn with_stop_frames(mut self, stop_frames: i32) -> Self {
        self.stop_frames = stop_frames;
        self
    }

    /// Allow the agent to stim before attacking.
    #[must_use]
    pub fn with_stim(mut self, can_stim: bool) -> Self {
        self.can_stim = can_stim;
        self
    }

    /// Agent must be burrowed to attack and unburrowed to move.
    #[must_use]
    pub fn with_burrowed_attacker(mut self, burrowed_attacker: bool) -> Self {
        self.burrowed_attacker = burrowed_attacker;
        self.can_burrow |= burrowed_attacker;
        self
    }

    /// Set the burrowed state.
    #[must_use]
    pub fn with_burrowed(mut self, burrowed: bool) -> Self {
        self.burrowed = burrowed;
        self
    }

    /// Set whether enemies can see this agent.
    #[must_use]
    pub fn with_detected(mut self, detected: bool) -> Self {
        self.detected = detected;
        self
    }

    /// Set the locked-down state.
    #[must_use]
    pub fn with_locked_down(mut self, locked_down: bool) -> Self {
        self.locked_down = locked_down;
        self
    }

    /// Set the stasis state.
    #[must_use]
    pub fn with_stasised(mut self, stasised: bool) -> Self {
        self.stasised = stasised;
        self
    }

    /// Set plague damage per frame, in raw shifted units.
    #[must_use]
    pub fn with_plague(mut self, damage_per_frame: i32) -> Self {
        self.plague_damage = raw(damage_per_frame);
        self
    }

    /// Mark as standing under a dark swarm cloud.
    #[must_use]
    pub fn with_dark_swarm(mut self, protected: bool) -> Self {
        self.protected_by_dark_swarm = protected;
        self
    }

    /// Set remaining stim frames.
    #[must_use]
    pub fn with_stim_timer(mut self, frames: i32) -> Self {
        self.stim_timer = frames;
        self
    }

    /// Set frames until the next attack.
    #[must_use]
    pub fn with_cooldown(mut self, frames: i32) -> Self {
        self.cooldown = frames;
        self
    }

    /// Set frames the agent stays busy.
    #[must_use]
    pub fn with_sleep_timer(mut self, frames: i32) -> Self {
        self.sleep_timer = frames;
        self
    }

    /// Attach to a carrier. The agent dies with a carrier that has
    /// [`DeathReaction::KillDependents`].
    #[must_use]
    pub fn with_carrier(mut self, carrier: AgentId) -> Self {
        self.carrier = Some(carrier);
        self
    }

    /// Set what happens when this agent dies.
    #[must_use]
    pub fn with_death_reaction(mut self, reaction: DeathReaction) -> Self {
        self.death_reaction = reaction;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Identifier assigned by the simulator. Zero before insertion.
    #[must_use]
    pub fn id(&self) -> AgentId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position in sub-tile units.
    #[must_use]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Velocity accumulated this frame.
    #[must_use]
    pub fn velocity(&self) -> (i32, i32) {
        (self.vx, self.vy)
    }

    /// Movement speed per frame.
    #[must_use]
    pub fn speed(&self) -> Fixed {
        self.speed
    }

    /// Current health in whole points, rounded down.
    #[must_use]
    pub fn health(&self) -> i32 {
        self.health.to_num()
    }

    /// Max health in whole points.
    #[must_use]
    pub fn max_health(&self) -> i32 {
        self.max_health.to_num()
    }

    /// Current shields in whole points, rounded down.
    #[must_use]
    pub fn shields(&self) -> i32 {
        self.shields.to_num()
    }

    /// Max shields in whole points.
    #[must_use]
    pub fn max_shields(&self) -> i32 {
        self.max_shields.to_num()
    }

    /// Current energy in whole points, rounded down.
    #[must_use]
    pub fn energy(&self) -> i32 {
        self.energy.to_num()
    }

    /// Max energy in whole points.
    #[must_use]
    pub fn max_energy(&self) -> i32 {
        self.max_energy.to_num()
    }

    /// Frames until the next attack.
    #[must_use]
    pub fn cooldown(&self) -> i32 {
        self.cooldown
    }

    /// Frames the agent stays busy.
    #[must_use]
    pub fn sleep_timer(&self) -> i32 {
        self.sleep_timer
    }

    /// Remaining stim frames.
    #[must_use]
    pub fn stim_timer(&self) -> i32 {
        self.stim_timer
    }

    /// Weapon used against ground targets.
    #[must_use]
    pub fn ground_weapon(&self) -> &Weapon {
        &self.ground_weapon
    }

    /// Weapon used against air targets.
    #[must_use]
    pub fn air_weapon(&self) -> &Weapon {
        &self.air_weapon
    }

    /// Targeting priority tier.
    #[must_use]
    pub fn priority(&self) -> TargetingPriority {
        self.priority
    }

    /// Carrier this agent depends on.
    #[must_use]
    pub fn carrier(&self) -> Option<AgentId> {
        self.carrier
    }

    /// Death reaction of this agent.
    #[must_use]
    pub fn death_reaction(&self) -> &DeathReaction {
        &self.death_reaction
    }

    /// Ally this agent healed or repaired most recently.
    #[must_use]
    pub fn restore_target(&self) -> Option<AgentId> {
        self.restore_target.map(|target| target.id)
    }

    /// Enemy this agent attacked or chased most recently.
    #[must_use]
    pub fn attack_target(&self) -> Option<AgentId> {
        self.attack_target.map(|target| target.id)
    }

    /// An agent is alive while it has at least one whole health point.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health >= Shifted::ONE
    }

    /// Whether the agent flies.
    #[must_use]
    pub fn is_flyer(&self) -> bool {
        self.is_flyer
    }

    /// Whether the agent heals organic allies.
    #[must_use]
    pub fn is_healer(&self) -> bool {
        self.is_healer
    }

    /// Whether the agent repairs mechanical allies.
    #[must_use]
    pub fn is_repairer(&self) -> bool {
        self.is_repairer
    }

    /// Whether the agent is mechanical.
    #[must_use]
    pub fn is_mechanic(&self) -> bool {
        self.is_mechanic
    }

    /// Whether the agent is a suicide unit.
    #[must_use]
    pub fn is_suicider(&self) -> bool {
        self.is_suicider
    }

    /// Whether the agent is organic.
    #[must_use]
    pub fn is_organic(&self) -> bool {
        self.is_organic
    }

    /// Whether the agent is burrowed.
    #[must_use]
    pub fn is_burrowed(&self) -> bool {
        self.burrowed
    }

    /// Whether the agent is locked down.
    #[must_use]
    pub fn is_locked_down(&self) -> bool {
        self.locked_down
    }

    /// Whether the agent is in stasis.
    #[must_use]
    pub fn is_stasised(&self) -> bool {
        self.stasised
    }

    /// Whether stim is active.
    #[must_use]
    pub fn is_stimmed(&self) -> bool {
        self.stim_timer > 0
    }

    /// Whether the agent was healed during the current frame.
    #[must_use]
    pub fn was_healed_this_frame(&self) -> bool {
        self.healed_this_frame
    }

    // ------------------------------------------------------------------
    // Mutators
    // ------------------------------------------------------------------

    /// Set health in whole points, clamped to `[0, max]`.
    pub fn set_health(&mut self, health: i32) {
        self.health = points(health.max(0)).min(self.max_health);
    }

    /// Set shields in whole points, clamped to `[0, max]`.
    pub fn set_shields(&mut self, shields: i32) {
        self.shields = points(shields.max(0)).min(self.max_shields);
    }

    /// Set energy in whole points, clamped to `[0, max]`.
    pub fn set_energy(&mut self, energy: i32) {
        self.energy = points(energy.max(0)).min(self.max_energy);
    }

    /// Drop health to zero. The agent is removed in the next reap.
    pub fn kill(&mut self) {
        self.health = Shifted::ZERO;
    }

    /// Set the locked-down state.
    pub fn set_locked_down(&mut self, locked_down: bool) {
        self.locked_down = locked_down;
    }

    /// Set the stasis state.
    pub fn set_stasised(&mut self, stasised: bool) {
        self.stasised = stasised;
    }

    // ------------------------------------------------------------------
    // Crate internals used by behaviors and the simulator
    // ------------------------------------------------------------------

    /// Weapon this agent uses against `target`.
    pub(crate) fn weapon_vs(&self, target: &Agent) -> &Weapon {
        if target.is_flyer {
            &self.air_weapon
        } else {
            &self.ground_weapon
        }
    }

    /// Locked down, in stasis or busy: counts as active but does not act.
    pub(crate) fn is_disabled(&self) -> bool {
        self.locked_down || self.stasised || self.sleep_timer > 0
    }

    /// Whether this agent can be picked as an attack target.
    pub(crate) fn is_targetable(&self) -> bool {
        self.is_alive() && self.detected && !self.stasised
    }

    pub(crate) fn is_damaged(&self) -> bool {
        self.health < self.max_health
    }

    /// Speed including the stim bonus.
    pub(crate) fn effective_speed(&self) -> Fixed {
        if self.is_stimmed() {
            self.speed * Fixed::from_num(1.5)
        } else {
            self.speed
        }
    }

    /// Restore health, capped at max.
    pub(crate) fn heal(&mut self, amount: Shifted) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Consume health, floored at zero.
    pub(crate) fn consume_health(&mut self, amount: Shifted) {
        self.health = (self.health - amount).max(Shifted::ZERO);
    }

    /// Consume energy, floored at zero.
    pub(crate) fn consume_energy(&mut self, amount: Shifted) {
        self.energy = (self.energy - amount).max(Shifted::ZERO);
    }

    pub(crate) fn stim(&mut self) {
        self.stim_timer = STIM_FRAMES;
        self.consume_health(points(STIM_HEALTH_COST));
    }

    /// Flip the burrow state. Returns false if the agent cannot burrow.
    pub(crate) fn toggle_burrow(&mut self) -> bool {
        if !self.can_burrow {
            return false;
        }
        self.burrowed = !self.burrowed;
        self.sleep_timer = BURROW_FRAMES;
        true
    }

    /// Stop any planned movement.
    pub(crate) fn halt(&mut self) {
        self.vx = 0;
        self.vy = 0;
    }
}

/// Squared distance between two agents.
#[must_use]
pub fn distance_squared(a: &Agent, b: &Agent) -> i32 {
    crate::math::distance_squared(a.x, a.y, b.x, b.y)
}
