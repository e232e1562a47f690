//! Target selection, firing and combat movement for armed units.

use std::cmp::Ordering;

use crate::agent::{distance_squared, Agent, AgentRef, TargetingPriority, Weapon};
use crate::damage;
use crate::math::{distance_from_squared, Fixed};
use crate::movement::{move_away_from, move_toward};

pub(super) fn sim_unit(
    frame_skip: i32,
    agent_index: usize,
    allies: &mut [Agent],
    enemies: &mut [Agent],
) -> bool {
    let Some((target_index, d2)) = select_target(&allies[agent_index], enemies) else {
        allies[agent_index].attack_target = None;
        return false;
    };

    let target_ref = AgentRef::new(target_index, enemies);
    let agent = &mut allies[agent_index];
    agent.attack_target = Some(target_ref);
    let weapon = *agent.weapon_vs(&enemies[target_index]);

    if d2 <= weapon.max_range_squared {
        if agent.burrowed_attacker != agent.burrowed {
            return agent.toggle_burrow();
        }
        if agent.cooldown <= 0 {
            if agent.can_stim && !agent.is_stimmed() && agent.health > agent.max_health / 2 {
                agent.stim();
            }
            damage::attack(agent, &weapon, target_index, enemies);
            return true;
        }
    }

    combat_move(agent, frame_skip, enemies, target_index, d2, &weapon)
}

/// Keep the previous target while it stays valid and in range, otherwise
/// scan for the best one: higher priority first, then nearer.
fn select_target(agent: &Agent, enemies: &[Agent]) -> Option<(usize, i32)> {
    if let Some(index) = agent.attack_target.and_then(|target| target.resolve(enemies)) {
        let enemy = &enemies[index];
        if enemy.is_targetable() && damage::can_hit(agent, enemy) {
            return Some((index, distance_squared(agent, enemy)));
        }
    }

    let mut selected: Option<(usize, i32)> = None;
    for (index, enemy) in enemies.iter().enumerate() {
        if !enemy.is_targetable() {
            continue;
        }
        let weapon = agent.weapon_vs(enemy);
        if !weapon.is_armed() {
            continue;
        }
        let d2 = distance_squared(agent, enemy);
        if d2 < weapon.min_range_squared {
            continue;
        }
        let better = match selected {
            None => true,
            Some((current, current_d2)) => match enemy.priority.cmp(&enemies[current].priority) {
                Ordering::Greater => true,
                Ordering::Equal => d2 < current_d2,
                Ordering::Less => false,
            },
        };
        if better {
            selected = Some((index, d2));
            // Can hit a top priority target right now
            if d2 <= weapon.max_range_squared && enemy.priority == TargetingPriority::Highest {
                break;
            }
        }
    }
    selected
}

/// Movement while not firing this frame. Returns whether the agent is
/// still active.
fn combat_move(
    agent: &mut Agent,
    frame_skip: i32,
    enemies: &[Agent],
    target_index: usize,
    d2: i32,
    weapon: &Weapon,
) -> bool {
    let out_of_range = d2 > weapon.max_range_squared;
    if agent.speed == Fixed::ZERO {
        return !out_of_range;
    }
    if agent.burrowed {
        return !out_of_range || agent.toggle_burrow();
    }

    if agent.is_kiter && weapon.min_range_squared > 0 {
        if let Some((threat, threat_d2)) = nearest_inside(agent, enemies, weapon.min_range_squared) {
            let position = enemies[threat].position();
            move_away_from(agent, frame_skip, position, distance_from_squared(threat_d2), weapon.min_range);
            return true;
        }
    }

    let target = &enemies[target_index];
    let enemy_weapon = target.weapon_vs(agent);
    let distance = distance_from_squared(d2);
    let should_kite = agent.is_kiter
        && agent.cooldown > 0
        && enemy_weapon.max_range_squared <= d2
        && target.speed < agent.effective_speed();

    if should_kite {
        move_away_from(agent, frame_skip, target.position(), distance, weapon.max_range);
    } else if out_of_range || enemy_weapon.min_range_squared > 0 {
        move_toward(agent, frame_skip, target.position(), distance, weapon.max_range);
    }
    true
}

fn nearest_inside(agent: &Agent, enemies: &[Agent], range_squared: i32) -> Option<(usize, i32)> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| enemy.is_alive())
        .map(|(index, enemy)| (index, distance_squared(agent, enemy)))
        .filter(|&(_, d2)| d2 < range_squared)
        .min_by_key(|&(index, d2)| (d2, index))
}
