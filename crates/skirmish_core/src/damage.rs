//! Damage resolution: direct hits, shields, armor, size modifiers and splash.
//!
//! Damage is applied in this order:
//! 1. Ranged hits are cancelled by dark swarm and scaled by elevation
//! 2. Shields absorb first, minus the target's shield upgrades
//! 3. Overflow loses armor once per hit, then the size modifier applies
//! 4. Health always loses at least half a point per hit that reaches it

use crate::agent::{distance_squared, Agent, DamageType, SplashType, UnitSize, Weapon};
use crate::math::{raw, Shifted};

/// Least damage a hit that reaches health can deal.
const MIN_DAMAGE: Shifted = raw(128);

/// Ranged attack against higher ground (136/256).
const HIGH_GROUND_FACTOR: Shifted = raw(136);

/// Every ranged hit is scaled by 255/256.
const RANGED_HIT_FACTOR: Shifted = raw(255);

/// Bounce jumps reach this far along each axis.
const BOUNCE_RANGE: i32 = 96;

/// Extra targets a bouncing attack can hit.
const MAX_BOUNCES: usize = 2;

impl DamageType {
    /// Damage multiplier of this damage type against a unit size.
    #[must_use]
    pub fn modifier_vs(self, size: UnitSize) -> Shifted {
        let percent = match (self, size) {
            (DamageType::Concussive, UnitSize::Medium) => 50,
            (DamageType::Concussive, UnitSize::Large) => 25,
            (DamageType::Explosive, UnitSize::Small) => 50,
            (DamageType::Explosive, UnitSize::Medium) => 75,
            _ => 100,
        };

        Shifted::from_num(percent) / Shifted::from_num(100)
    }
}

/// Fire `weapon` at `enemies[target_index]`, including splash.
///
/// Resets the attacker's cooldown (halved while stimmed) and keeps it
/// busy for its stop frames.
pub(crate) fn attack(attacker: &mut Agent, weapon: &Weapon, target_index: usize, enemies: &mut [Agent]) {
    attacker.sleep_timer = attacker.stop_frames;
    attacker.cooldown = if attacker.is_stimmed() {
        weapon.cooldown / 2
    } else {
        weapon.cooldown
    };

    deal_direct_damage(attacker, weapon, &mut enemies[target_index]);
    match weapon.splash_type {
        SplashType::None => {}
        SplashType::Radial | SplashType::RadialEnemy => {
            deal_radial_splash(weapon, target_index, enemies);
        }
        SplashType::Line => deal_line_splash((attacker.x, attacker.y), weapon, target_index, enemies),
        SplashType::Bounce => deal_bounce_damage(weapon, target_index, enemies),
    }
}

fn deal_direct_damage(attacker: &Agent, weapon: &Weapon, target: &mut Agent) {
    let mut damage = weapon.damage;

    if !attacker.is_melee {
        if target.protected_by_dark_swarm {
            return;
        }
        if attacker.elevation < target.elevation {
            damage *= HIGH_GROUND_FACTOR;
        }
        damage *= RANGED_HIT_FACTOR;
    }

    apply_damage(target, weapon.damage_type, damage, weapon.hits);
}

/// Apply one attack's damage to `target`.
pub fn apply_damage(target: &mut Agent, damage_type: DamageType, damage: Shifted, hits: i32) {
    let mut damage = damage;

    if target.shields > Shifted::ZERO {
        let absorbed = (damage - Shifted::from_num(target.shield_upgrades)).max(Shifted::ZERO);
        if absorbed < target.shields {
            target.shields -= absorbed;
            return;
        }
        damage = absorbed - target.shields;
        target.shields = Shifted::ZERO;
    }

    if damage <= Shifted::ZERO {
        return;
    }

    let after_armor = damage - target.armor.saturating_mul_int(hits);
    let dealt = after_armor * damage_type.modifier_vs(target.size);
    target.consume_health(dealt.max(MIN_DAMAGE));
}

fn deal_radial_splash(weapon: &Weapon, target_index: usize, enemies: &mut [Agent]) {
    let main = &enemies[target_index];
    let (cx, cy, is_flyer) = (main.x, main.y, main.is_flyer);

    for (index, enemy) in enemies.iter_mut().enumerate() {
        if index == target_index || enemy.is_flyer != is_flyer {
            continue;
        }
        let d2 = crate::math::distance_squared(cx, cy, enemy.x, enemy.y);
        let damage = if d2 <= weapon.inner_splash_radius_squared {
            weapon.damage
        } else if enemy.burrowed {
            continue;
        } else if d2 <= weapon.median_splash_radius_squared {
            weapon.damage / 2
        } else if d2 <= weapon.outer_splash_radius_squared {
            weapon.damage / 4
        } else {
            continue;
        };
        apply_damage(enemy, weapon.damage_type, damage, weapon.hits);
    }
}

fn deal_line_splash(source: (i32, i32), weapon: &Weapon, target_index: usize, enemies: &mut [Agent]) {
    let main = &enemies[target_index];
    let is_flyer = main.is_flyer;
    let (sx, sy) = (i64::from(source.0), i64::from(source.1));
    let mut dx = i64::from(main.x) - sx;
    let dy = i64::from(main.y) - sy;
    if dx == 0 && dy == 0 {
        // Fire along x when stacked on the target
        dx = 1;
    }
    let delta_squared = dx * dx + dy * dy;
    let reach = i64::from(weapon.max_range + weapon.inner_splash_radius);
    let inner_squared = i64::from(weapon.inner_splash_radius_squared);

    for (index, enemy) in enemies.iter_mut().enumerate() {
        if index == target_index || enemy.is_flyer != is_flyer {
            continue;
        }
        let ex = i64::from(enemy.x) - sx;
        let ey = i64::from(enemy.y) - sy;
        if ex * ex + ey * ey > reach * reach {
            continue;
        }
        let dot = ex * dx + ey * dy;
        if dot < 0 {
            continue;
        }
        let px = dot * dx / delta_squared - ex;
        let py = dot * dy / delta_squared - ey;
        if px * px + py * py <= inner_squared {
            apply_damage(enemy, weapon.damage_type, weapon.damage, weapon.hits);
        }
    }
}

fn deal_bounce_damage(weapon: &Weapon, target_index: usize, enemies: &mut [Agent]) {
    let main = &enemies[target_index];
    let mut last = (main.x, main.y);
    let mut damage = weapon.damage;
    let mut bounces = 0;

    for (index, enemy) in enemies.iter_mut().enumerate() {
        if index == target_index || !enemy.is_alive() {
            continue;
        }
        let dx = (enemy.x - last.0).abs();
        let dy = (enemy.y - last.1).abs();
        if dx <= BOUNCE_RANGE && dy <= BOUNCE_RANGE && (dx > 0 || dy > 0) {
            last = (enemy.x, enemy.y);
            damage = damage / 3;
            apply_damage(enemy, weapon.damage_type, damage, weapon.hits);
            bounces += 1;
            if bounces == MAX_BOUNCES {
                break;
            }
        }
    }
}

/// Whether `target` is close enough for `attacker` to hit right now.
#[must_use]
pub fn can_hit(attacker: &Agent, target: &Agent) -> bool {
    let weapon = attacker.weapon_vs(target);
    weapon.is_armed() && weapon.in_range(distance_squared(attacker, target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::points;

    fn target(health: i32) -> Agent {
        Agent::new("Target").with_max_health(health)
    }

    fn melee(damage: i32) -> (Agent, Weapon) {
        let weapon = Weapon::new(damage, 16, 22);
        let agent = Agent::new("Melee").with_melee(true).with_ground_weapon(weapon);
        (agent, weapon)
    }

    #[test]
    fn test_modifier_table() {
        assert_eq!(DamageType::Normal.modifier_vs(UnitSize::Large), Shifted::ONE);
        assert_eq!(DamageType::Concussive.modifier_vs(UnitSize::Small), Shifted::ONE);
        assert_eq!(
            DamageType::Concussive.modifier_vs(UnitSize::Large),
            Shifted::from_num(0.25)
        );
        assert_eq!(
            DamageType::Explosive.modifier_vs(UnitSize::Small),
            Shifted::from_num(0.5)
        );
        assert_eq!(DamageType::Explosive.modifier_vs(UnitSize::Large), Shifted::ONE);
    }

    #[test]
    fn test_shields_absorb_first() {
        let mut unit = target(40).with_max_shields(20);
        apply_damage(&mut unit, DamageType::Normal, points(10), 1);
        assert_eq!(unit.shields(), 10);
        assert_eq!(unit.health(), 40);
    }

    #[test]
    fn test_shield_overflow_reaches_health() {
        let mut unit = target(40).with_max_shields(20).with_shields(5);
        apply_damage(&mut unit, DamageType::Normal, points(10), 1);
        assert_eq!(unit.shields(), 0);
        assert_eq!(unit.health(), 35);
    }

    #[test]
    fn test_shield_upgrades_reduce_absorbed() {
        let mut unit = target(40).with_max_shields(20).with_shield_upgrades(1);
        apply_damage(&mut unit, DamageType::Normal, points(10), 1);
        assert_eq!(unit.shields(), 11);
    }

    #[test]
    fn test_armor_per_hit() {
        let mut unit = target(40).with_armor(1);
        apply_damage(&mut unit, DamageType::Normal, points(6), 1);
        assert_eq!(unit.health(), 35);

        let mut unit = target(40).with_armor(1);
        apply_damage(&mut unit, DamageType::Normal, points(10), 2);
        assert_eq!(unit.health(), 32);
    }

    #[test]
    fn test_minimum_damage() {
        let mut unit = target(40).with_armor(10);
        apply_damage(&mut unit, DamageType::Normal, points(6), 1);
        assert_eq!(unit.health, points(40) - MIN_DAMAGE);
    }

    #[test]
    fn test_size_reduction() {
        let mut tank = target(150).with_size(UnitSize::Large);
        apply_damage(&mut tank, DamageType::Concussive, points(20), 1);
        assert_eq!(tank.health(), 145);

        let mut ling = target(35).with_size(UnitSize::Small);
        apply_damage(&mut ling, DamageType::Explosive, points(20), 1);
        assert_eq!(ling.health(), 25);
    }

    #[test]
    fn test_health_never_negative() {
        let mut unit = target(5);
        apply_damage(&mut unit, DamageType::Normal, points(500), 1);
        assert_eq!(unit.health, Shifted::ZERO);
        assert!(!unit.is_alive());
    }

    #[test]
    fn test_ranged_hit_scaled() {
        let weapon = Weapon::new(6, 128, 15);
        let mut shooter = Agent::new("Ranged").with_ground_weapon(weapon);
        let mut enemies = vec![target(40)];
        attack(&mut shooter, &weapon, 0, &mut enemies);
        // 6 * 255/256 = 1530 raw
        assert_eq!(enemies[0].health, points(40) - raw(1530));
    }

    #[test]
    fn test_melee_hit_exact() {
        let (mut attacker, weapon) = melee(6);
        let mut enemies = vec![target(40)];
        attack(&mut attacker, &weapon, 0, &mut enemies);
        assert_eq!(enemies[0].health(), 34);
    }

    #[test]
    fn test_dark_swarm_blocks_ranged_only() {
        let weapon = Weapon::new(6, 128, 15);
        let mut shooter = Agent::new("Ranged").with_ground_weapon(weapon);
        let mut enemies = vec![target(40).with_dark_swarm(true)];
        attack(&mut shooter, &weapon, 0, &mut enemies);
        assert_eq!(enemies[0].health(), 40);

        let (mut attacker, weapon) = melee(6);
        attack(&mut attacker, &weapon, 0, &mut enemies);
        assert_eq!(enemies[0].health(), 34);
    }

    #[test]
    fn test_high_ground_penalty() {
        let weapon = Weapon::new(10, 128, 15);
        let mut low = Agent::new("Low").with_ground_weapon(weapon);
        let mut enemies = vec![target(40).with_elevation(1), target(40)];
        attack(&mut low, &weapon, 0, &mut enemies);
        attack(&mut low, &weapon, 1, &mut enemies);

        let uphill = points(40) - enemies[0].health;
        let level = points(40) - enemies[1].health;
        assert!(uphill < level);
        assert!(uphill > Shifted::from_num(5) && uphill < Shifted::from_num(6));
    }

    #[test]
    fn test_attack_sets_cooldown_and_sleep() {
        let (attacker, weapon) = melee(6);
        let mut attacker = attacker.with_stop_frames(2);
        let mut enemies = vec![target(40)];
        attack(&mut attacker, &weapon, 0, &mut enemies);
        assert_eq!(attacker.cooldown(), 22);
        assert_eq!(attacker.sleep_timer(), 2);

        let mut stimmed = attacker.with_stim_timer(10);
        attack(&mut stimmed, &weapon, 0, &mut enemies);
        assert_eq!(stimmed.cooldown(), 11);
    }

    #[test]
    fn test_radial_splash_falloff() {
        let weapon = Weapon::new(20, 16, 30).with_splash(SplashType::RadialEnemy, 5, 15, 25);
        let mut attacker = Agent::new("Splash").with_melee(true).with_ground_weapon(weapon);
        let mut enemies = vec![
            target(30).with_position(100, 100),
            target(30).with_position(110, 100),
            target(30).with_position(100, 120),
            target(30).with_position(200, 200),
        ];
        attack(&mut attacker, &weapon, 0, &mut enemies);

        assert_eq!(enemies[0].health(), 10);
        // Median radius: half damage
        assert_eq!(enemies[1].health(), 20);
        // Outer radius: quarter damage
        assert_eq!(enemies[2].health(), 25);
        assert_eq!(enemies[3].health(), 30);
    }

    #[test]
    fn test_splash_stays_on_target_layer() {
        let weapon = Weapon::new(20, 16, 30).with_splash(SplashType::Radial, 5, 15, 25);
        let mut attacker = Agent::new("Splash").with_melee(true).with_ground_weapon(weapon);
        let mut enemies = vec![
            target(30).with_position(100, 100),
            target(30).with_position(101, 100).with_flyer(true),
        ];
        attack(&mut attacker, &weapon, 0, &mut enemies);
        assert_eq!(enemies[1].health(), 30);
    }

    #[test]
    fn test_burrowed_only_takes_inner_splash() {
        let weapon = Weapon::new(20, 16, 30).with_splash(SplashType::Radial, 5, 15, 25);
        let mut attacker = Agent::new("Splash").with_melee(true).with_ground_weapon(weapon);
        let mut enemies = vec![
            target(30).with_position(100, 100),
            target(30).with_position(110, 100).with_burrowed(true),
            target(30).with_position(102, 100).with_burrowed(true),
        ];
        attack(&mut attacker, &weapon, 0, &mut enemies);
        assert_eq!(enemies[1].health(), 30);
        assert_eq!(enemies[2].health(), 10);
    }

    #[test]
    fn test_line_splash_hits_behind_target() {
        let weapon = Weapon::new(20, 64, 37).with_splash(SplashType::Line, 20, 20, 20);
        let mut attacker = Agent::new("Lurker")
            .with_melee(true)
            .with_position(0, 0)
            .with_ground_weapon(weapon);
        let mut enemies = vec![
            target(50).with_position(50, 0),
            target(50).with_position(70, 0),
            target(50).with_position(70, 40),
            target(50).with_position(-20, 0),
        ];
        attack(&mut attacker, &weapon, 0, &mut enemies);

        assert_eq!(enemies[0].health(), 30);
        assert_eq!(enemies[1].health(), 30);
        assert_eq!(enemies[2].health(), 50);
        assert_eq!(enemies[3].health(), 50);
    }

    #[test]
    fn test_bounce_decays() {
        let weapon = Weapon::new(27, 96, 30).with_splash(SplashType::Bounce, 0, 0, 0);
        let mut attacker = Agent::new("Mutalisk").with_melee(true).with_ground_weapon(weapon);
        let mut enemies = vec![
            target(100).with_position(100, 100),
            target(100).with_position(150, 100),
            target(100).with_position(200, 100),
            target(100).with_position(250, 100),
        ];
        attack(&mut attacker, &weapon, 0, &mut enemies);

        assert_eq!(enemies[0].health(), 73);
        assert_eq!(enemies[1].health(), 91);
        assert_eq!(enemies[2].health(), 97);
        assert_eq!(enemies[3].health(), 100);
    }

    #[test]
    fn test_can_hit() {
        let marine = Agent::new("Marine").with_ground_weapon(Weapon::new(6, 128, 15));
        let near = target(40).with_position(100, 0);
        let far = target(40).with_position(200, 0);
        let air = target(40).with_position(10, 0).with_flyer(true);

        assert!(can_hit(&marine, &near));
        assert!(!can_hit(&marine, &far));
        assert!(!can_hit(&marine, &air));
    }
}
