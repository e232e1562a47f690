//! Test fixtures and helpers.
//!
//! Agent archetypes with classic unit stats, for consistent testing.
//! Ranges and positions are in sub-tile units; every fixture starts at the
//! origin, move it with `with_position`.

use fixed::types::I32F32;
use skirmish_core::agent::{Agent, DamageType, SplashType, TargetingPriority, UnitSize, Weapon};
use skirmish_core::death::DeathReaction;

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Ranged infantry that can stim.
#[must_use]
pub fn marine() -> Agent {
    let rifle = Weapon::new(6, 128, 15);
    Agent::new("Marine")
        .with_max_health(40)
        .with_size(UnitSize::Small)
        .with_organic(true)
        .with_stim(true)
        .with_ground_weapon(rifle)
        .with_air_weapon(rifle)
        .with_speed(fixed(4))
}

/// Organic healer with a full energy pool.
#[must_use]
pub fn medic() -> Agent {
    Agent::new("Medic")
        .with_max_health(60)
        .with_size(UnitSize::Small)
        .with_organic(true)
        .with_healer(true)
        .with_max_energy(200)
        .with_priority(TargetingPriority::Medium)
        .with_speed(fixed(4))
}

/// Mechanical worker that repairs.
#[must_use]
pub fn scv() -> Agent {
    Agent::new("SCV")
        .with_max_health(60)
        .with_size(UnitSize::Small)
        .with_mechanic(true)
        .with_repairer(128)
        .with_melee(true)
        .with_ground_weapon(Weapon::new(5, 10, 15))
        .with_priority(TargetingPriority::Medium)
        .with_speed(fixed_f(4.92))
}

/// Fast regenerating melee unit.
#[must_use]
pub fn zergling() -> Agent {
    Agent::new("Zergling")
        .with_max_health(35)
        .with_size(UnitSize::Small)
        .with_organic(true)
        .with_health_regen(true)
        .with_melee(true)
        .with_ground_weapon(Weapon::new(5, 15, 8))
        .with_speed(fixed_f(5.49))
}

/// Ranged explosive attacker.
#[must_use]
pub fn hydralisk() -> Agent {
    let spines = Weapon::new(10, 128, 15).with_damage_type(DamageType::Explosive);
    Agent::new("Hydralisk")
        .with_max_health(80)
        .with_size(UnitSize::Medium)
        .with_organic(true)
        .with_health_regen(true)
        .with_ground_weapon(spines)
        .with_air_weapon(spines)
        .with_speed(fixed_f(3.66))
}

/// Flyer whose attack bounces to nearby enemies.
#[must_use]
pub fn mutalisk() -> Agent {
    let glaive = Weapon::new(9, 96, 30).with_splash(SplashType::Bounce, 0, 0, 0);
    Agent::new("Mutalisk")
        .with_max_health(120)
        .with_size(UnitSize::Small)
        .with_organic(true)
        .with_flyer(true)
        .with_health_regen(true)
        .with_ground_weapon(glaive)
        .with_air_weapon(glaive)
        .with_speed(fixed_f(6.67))
}

/// Shielded melee unit hitting twice per attack.
#[must_use]
pub fn zealot() -> Agent {
    Agent::new("Zealot")
        .with_max_health(100)
        .with_max_shields(60)
        .with_armor(1)
        .with_size(UnitSize::Small)
        .with_organic(true)
        .with_melee(true)
        .with_ground_weapon(Weapon::new(16, 15, 22).with_hits(2))
        .with_speed(fixed(4))
}

/// Immobile artillery with a minimum range and radial splash.
#[must_use]
pub fn sieged_tank() -> Agent {
    let cannon = Weapon::new(70, 384, 75)
        .with_damage_type(DamageType::Explosive)
        .with_min_range(64)
        .with_splash(SplashType::Radial, 10, 25, 40);
    Agent::new("Siege Tank")
        .with_max_health(150)
        .with_armor(1)
        .with_size(UnitSize::Large)
        .with_mechanic(true)
        .with_ground_weapon(cannon)
}

/// Structure releasing four marines when destroyed.
#[must_use]
pub fn bunker() -> Agent {
    Agent::new("Bunker")
        .with_max_health(350)
        .with_armor(1)
        .with_size(UnitSize::Large)
        .with_mechanic(true)
        .with_priority(TargetingPriority::Medium)
        .with_death_reaction(DeathReaction::Spawn(vec![marine(); 4]))
}

/// Flying suicide unit that only hits air.
#[must_use]
pub fn scourge() -> Agent {
    Agent::new("Scourge")
        .with_max_health(25)
        .with_size(UnitSize::Small)
        .with_organic(true)
        .with_flyer(true)
        .with_suicider(true)
        .with_air_weapon(Weapon::new(110, 3, 0))
        .with_speed(fixed_f(6.67))
}

/// `count` copies of `agent` in a row along x, `spacing` apart.
#[must_use]
pub fn line_of(agent: &Agent, count: i32, origin: (i32, i32), spacing: i32) -> Vec<Agent> {
    (0..count)
        .map(|i| agent.clone().with_position(origin.0 + i * spacing, origin.1))
        .collect()
}
